//! # symbridge-solver
//!
//! The boundary between a symbolic-execution engine and external SMT
//! solvers: problems are checked against a solver's capability table,
//! encoded as SMT-LIB2, and the solver's textual reply is decoded back into
//! typed values.
//!
//! ## Usage
//!
//! ```
//! use symbridge_smtlib::term::Term;
//! use symbridge_solver::{
//!     Kind, NamedSymVar, Problem, QueryMode, SolverConfig, SolverKind, SymRef, classify, encode,
//! };
//!
//! let x = SymRef::new(0, Kind::unsigned(8));
//! let out = SymRef::new(1, Kind::unsigned(1));
//! let mut problem = Problem::new(QueryMode::Satisfiability, out.clone(), SolverConfig::new(SolverKind::Z3));
//! problem.add_input(NamedSymVar::exists(x, "x"));
//! problem.add_assignment(out, Term::BitVecLit(1.into(), 1));
//!
//! let program = encode(&problem).unwrap();
//! println!("{}", program.script());
//!
//! let reply = ["sat", "((s0 #x0a))"];
//! let result = classify(&reply, &problem.inputs).unwrap();
//! assert_eq!(result.model().unwrap().get("x").unwrap().to_string(), "10");
//! ```

pub mod capability;
pub mod config;
pub mod encoder;
pub mod error;
pub mod extract;
pub mod kind;
pub mod model;
pub mod objective;
pub mod outcome;
pub mod problem;
pub mod result;
pub mod sexpr;
pub mod value;

// Re-export primary types for ergonomic use
pub use capability::gate;
pub use config::{SolverCapabilities, SolverConfig, SolverKind};
pub use encoder::{ProtocolProgram, ProtocolVersion, encode, to_smtlib};
pub use error::SolverError;
pub use extract::{Binding, ExtractMode, InputIndex, extract_model_value};
pub use kind::{Kind, NamedSymVar, NodeId, Quantifier, SymRef, UninterpretedSort};
pub use model::Model;
pub use objective::{ObjectiveBinding, extract_objectives};
pub use outcome::classify;
pub use problem::{Direction, Objective, Problem, QueryMode};
pub use result::SolverResult;
pub use sexpr::{SExpr, SExprError, parse_sexpr};
pub use value::{ConstantValue, GeneralizedValue};
