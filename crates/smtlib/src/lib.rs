//! # symbridge-smtlib
//!
//! SMT-LIB2 abstract syntax: sorts, terms, commands and scripts, with a
//! `Display` implementation for each that produces solver-ready text.
//!
//! Term trees are built by the caller; this crate only represents and prints
//! them.

pub mod command;
pub mod formatter;
pub mod script;
pub mod sort;
pub mod term;

pub use command::Command;
pub use script::Script;
pub use sort::Sort;
pub use term::Term;
