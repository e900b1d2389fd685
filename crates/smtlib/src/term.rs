use num_bigint::BigInt;
use num_rational::BigRational;

use crate::sort::Sort;

/// SMT-LIB term (expression) representation.
///
/// Operators without a dedicated variant are written as [`Term::App`].
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    // === Literals ===
    /// Boolean literal
    BoolLit(bool),
    /// Integer literal (unbounded)
    IntLit(BigInt),
    /// Bitvector literal with value and width. Negative values are written
    /// in two's complement.
    BitVecLit(BigInt, u32),
    /// Real literal
    RealLit(BigRational),

    // === Floating-point literals ===
    /// IEEE 754 NaN: `(_ NaN eb sb)`
    FpNaN(u32, u32),
    /// Positive infinity: `(_ +oo eb sb)`
    FpPosInf(u32, u32),
    /// Negative infinity: `(_ -oo eb sb)`
    FpNegInf(u32, u32),
    /// Positive zero: `(_ +zero eb sb)`
    FpPosZero(u32, u32),
    /// Negative zero: `(_ -zero eb sb)`
    FpNegZero(u32, u32),
    /// Bit representation: `(fp sign exp sig)` with eb, sb
    FpFromBits(u8, u64, u64, u32, u32),

    // === Variables ===
    /// Named constant/variable reference
    Const(String),

    // === Boolean operations ===
    /// Logical NOT
    Not(Box<Term>),
    /// Logical AND (n-ary)
    And(Vec<Term>),
    /// Logical OR (n-ary)
    Or(Vec<Term>),
    /// Logical implication: `(=> a b)`
    Implies(Box<Term>, Box<Term>),

    // === Core ===
    /// Equality: `(= a b)`
    Eq(Box<Term>, Box<Term>),
    /// Distinct: `(distinct a b ...)`
    Distinct(Vec<Term>),
    /// If-then-else: `(ite cond then else)`
    Ite(Box<Term>, Box<Term>, Box<Term>),

    // === Array operations ===
    /// `(select array index)`
    Select(Box<Term>, Box<Term>),
    /// `(store array index value)`
    Store(Box<Term>, Box<Term>, Box<Term>),
    /// Constant array: `((as const (Array I E)) value)`
    ConstArray(Sort, Box<Term>),

    // === Quantifiers ===
    /// `(forall ((x Sort) ...) body)`
    Forall(Vec<(String, Sort)>, Box<Term>),
    /// `(exists ((x Sort) ...) body)`
    Exists(Vec<(String, Sort)>, Box<Term>),

    // === Let bindings ===
    /// `(let ((x t) ...) body)`
    Let(Vec<(String, Term)>, Box<Term>),

    // === Function application ===
    /// `(f arg1 arg2 ...)`
    App(String, Vec<Term>),
}

impl Term {
    pub fn constant(name: impl Into<String>) -> Self {
        Term::Const(name.into())
    }

    pub fn app(name: impl Into<String>, args: Vec<Term>) -> Self {
        Term::App(name.into(), args)
    }

    pub fn not(term: Term) -> Self {
        Term::Not(Box::new(term))
    }

    pub fn eq(lhs: Term, rhs: Term) -> Self {
        Term::Eq(Box::new(lhs), Box::new(rhs))
    }

    /// Conjunction that collapses to its single operand when there is only one.
    pub fn and(mut terms: Vec<Term>) -> Self {
        if terms.len() == 1 {
            terms.remove(0)
        } else {
            Term::And(terms)
        }
    }
}
