//! SMT-LIB2 text formatting for AST types.
//!
//! Implements `Display` for [`Sort`], [`Term`], [`Command`], and [`Script`],
//! producing valid SMT-LIB2 output that can be parsed by solvers such as Z3.

use std::fmt;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed};

use crate::command::Command;
use crate::script::Script;
use crate::sort::Sort;
use crate::term::Term;

/// Characters allowed in a simple (unquoted) SMT-LIB symbol besides
/// ASCII letters and digits.
const SYMBOL_PUNCTUATION: &str = "~!@$%^&*_-+=<>.?/";

/// Whether `name` can be written without `|...|` quoting.
pub fn is_simple_symbol(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        None => false,
        Some(c) if c.is_ascii_digit() => false,
        Some(c) => {
            let ok = |c: char| c.is_ascii_alphanumeric() || SYMBOL_PUNCTUATION.contains(c);
            ok(c) && chars.all(ok)
        }
    }
}

/// Write a symbol, quoting it with `|...|` when needed.
fn fmt_symbol(name: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if is_simple_symbol(name) {
        write!(f, "{name}")
    } else {
        write!(f, "|{name}|")
    }
}

// ---------------------------------------------------------------------------
// Sort
// ---------------------------------------------------------------------------

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sort::Bool => write!(f, "Bool"),
            Sort::Int => write!(f, "Int"),
            Sort::Real => write!(f, "Real"),
            Sort::BitVec(width) => write!(f, "(_ BitVec {width})"),
            Sort::Float(e, s) => write!(f, "(_ FloatingPoint {e} {s})"),
            Sort::Array(index, element) => write!(f, "(Array {index} {element})"),
            Sort::Uninterpreted(name) => fmt_symbol(name, f),
        }
    }
}

// ---------------------------------------------------------------------------
// Term
// ---------------------------------------------------------------------------

/// Format a bitvector literal. Values are wrapped into `[0, 2^width)`, so
/// negative values come out in two's complement.
fn fmt_bv_lit(value: &BigInt, width: u32, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let modulus = BigInt::one() << width;
    let unsigned = ((value % &modulus) + &modulus) % &modulus;
    write!(f, "(_ bv{unsigned} {width})")
}

/// Format a non-negative integer as an SMT-LIB decimal (`5.0`).
fn fmt_real_numeral(value: &BigInt, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{value}.0")
}

/// Format a real literal: `2.0`, `(/ 1.0 3.0)`, `(- 2.0)`, `(- (/ 1.0 3.0))`.
fn fmt_real_lit(value: &BigRational, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let magnitude = value.abs();
    if value.is_negative() {
        write!(f, "(- ")?;
    }
    if magnitude.is_integer() {
        fmt_real_numeral(magnitude.numer(), f)?;
    } else {
        write!(f, "(/ ")?;
        fmt_real_numeral(magnitude.numer(), f)?;
        write!(f, " ")?;
        fmt_real_numeral(magnitude.denom(), f)?;
        write!(f, ")")?;
    }
    if value.is_negative() {
        write!(f, ")")?;
    }
    Ok(())
}

/// Write a binary SMT-LIB operator: `(op lhs rhs)`.
fn fmt_binop(op: &str, lhs: &Term, rhs: &Term, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "({op} {lhs} {rhs})")
}

/// Write sorted variable bindings: `((x Sort) (y Sort) ...)`.
fn fmt_sorted_vars(vars: &[(String, Sort)], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "(")?;
    for (i, (name, sort)) in vars.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "(")?;
        fmt_symbol(name, f)?;
        write!(f, " {sort})")?;
    }
    write!(f, ")")
}

/// Write a space-separated list of terms.
fn fmt_term_list(terms: &[Term], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, t) in terms.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{t}")?;
    }
    Ok(())
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // --- Literals ---
            Term::BoolLit(true) => write!(f, "true"),
            Term::BoolLit(false) => write!(f, "false"),
            Term::IntLit(n) => {
                if n.is_negative() {
                    // SMT-LIB represents negative integers as `(- N)`
                    write!(f, "(- {})", n.abs())
                } else {
                    write!(f, "{n}")
                }
            }
            Term::BitVecLit(value, width) => fmt_bv_lit(value, *width, f),
            Term::RealLit(value) => fmt_real_lit(value, f),

            // --- Floating point ---
            Term::FpNaN(e, s) => write!(f, "(_ NaN {e} {s})"),
            Term::FpPosInf(e, s) => write!(f, "(_ +oo {e} {s})"),
            Term::FpNegInf(e, s) => write!(f, "(_ -oo {e} {s})"),
            Term::FpPosZero(e, s) => write!(f, "(_ +zero {e} {s})"),
            Term::FpNegZero(e, s) => write!(f, "(_ -zero {e} {s})"),
            Term::FpFromBits(sign, exp, sig, eb, sb) => write!(
                f,
                "(fp #b{sign} #b{exp:0ew$b} #b{sig:0sw$b})",
                ew = *eb as usize,
                sw = sb.saturating_sub(1) as usize
            ),

            // --- Variables ---
            Term::Const(name) => fmt_symbol(name, f),

            // --- Boolean operations ---
            Term::Not(inner) => write!(f, "(not {inner})"),
            Term::And(terms) => {
                if terms.is_empty() {
                    write!(f, "true")
                } else {
                    write!(f, "(and ")?;
                    fmt_term_list(terms, f)?;
                    write!(f, ")")
                }
            }
            Term::Or(terms) => {
                if terms.is_empty() {
                    write!(f, "false")
                } else {
                    write!(f, "(or ")?;
                    fmt_term_list(terms, f)?;
                    write!(f, ")")
                }
            }
            Term::Implies(lhs, rhs) => fmt_binop("=>", lhs, rhs, f),

            // --- Core ---
            Term::Eq(lhs, rhs) => fmt_binop("=", lhs, rhs, f),
            Term::Distinct(terms) => {
                write!(f, "(distinct ")?;
                fmt_term_list(terms, f)?;
                write!(f, ")")
            }
            Term::Ite(cond, then_branch, else_branch) => {
                write!(f, "(ite {cond} {then_branch} {else_branch})")
            }

            // --- Arrays ---
            Term::Select(arr, idx) => fmt_binop("select", arr, idx, f),
            Term::Store(arr, idx, val) => write!(f, "(store {arr} {idx} {val})"),
            Term::ConstArray(sort, value) => write!(f, "((as const {sort}) {value})"),

            // --- Quantifiers ---
            Term::Forall(vars, body) => {
                write!(f, "(forall ")?;
                fmt_sorted_vars(vars, f)?;
                write!(f, " {body})")
            }
            Term::Exists(vars, body) => {
                write!(f, "(exists ")?;
                fmt_sorted_vars(vars, f)?;
                write!(f, " {body})")
            }

            // --- Let bindings ---
            Term::Let(bindings, body) => {
                write!(f, "(let (")?;
                for (i, (name, term)) in bindings.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "(")?;
                    fmt_symbol(name, f)?;
                    write!(f, " {term})")?;
                }
                write!(f, ") {body})")
            }

            // --- Function application ---
            Term::App(name, args) => {
                if args.is_empty() {
                    fmt_symbol(name, f)
                } else {
                    write!(f, "(")?;
                    fmt_symbol(name, f)?;
                    write!(f, " ")?;
                    fmt_term_list(args, f)?;
                    write!(f, ")")
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::SetLogic(logic) => write!(f, "(set-logic {logic})"),
            Command::SetOption(key, value) => write!(f, "(set-option :{key} {value})"),
            Command::DeclareSort(name, arity) => {
                write!(f, "(declare-sort ")?;
                fmt_symbol(name, f)?;
                write!(f, " {arity})")
            }
            Command::DeclareEnum(name, elements) => {
                write!(f, "(declare-datatypes ((")?;
                fmt_symbol(name, f)?;
                write!(f, " 0)) ((")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "(")?;
                    fmt_symbol(element, f)?;
                    write!(f, ")")?;
                }
                write!(f, ")))")
            }
            Command::DeclareFun(name, param_sorts, return_sort) => {
                write!(f, "(declare-fun ")?;
                fmt_symbol(name, f)?;
                write!(f, " (")?;
                for (i, s) in param_sorts.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{s}")?;
                }
                write!(f, ") {return_sort})")
            }
            Command::DefineFun(name, params, return_sort, body) => {
                write!(f, "(define-fun ")?;
                fmt_symbol(name, f)?;
                write!(f, " ")?;
                fmt_sorted_vars(params, f)?;
                write!(f, " {return_sort} {body})")
            }
            Command::Assert(term) => write!(f, "(assert {term})"),
            Command::CheckSat => write!(f, "(check-sat)"),
            Command::GetValue(terms) => {
                write!(f, "(get-value (")?;
                fmt_term_list(terms, f)?;
                write!(f, "))")
            }
            Command::Maximize(term) => write!(f, "(maximize {term})"),
            Command::Minimize(term) => write!(f, "(minimize {term})"),
            Command::GetObjectives => write!(f, "(get-objectives)"),
            Command::Comment(text) => {
                for (i, line) in text.lines().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "; {line}")?;
                }
                Ok(())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Script
// ---------------------------------------------------------------------------

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, cmd) in self.commands().iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{cmd}")?;
        }
        Ok(())
    }
}

// ===========================================================================
// Tests
// ===========================================================================
