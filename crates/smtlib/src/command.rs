use crate::sort::Sort;
use crate::term::Term;

/// SMT-LIB command representation.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `(set-logic LOGIC)`
    SetLogic(String),
    /// `(set-option :key value)`
    SetOption(String, String),
    /// `(declare-sort name arity)`
    DeclareSort(String, u32),
    /// `(declare-datatypes ((name 0)) (((c1) (c2) ...)))`: an enumeration
    /// with one nullary constructor per element.
    DeclareEnum(String, Vec<String>),
    /// `(declare-fun name (param_sorts...) return_sort)`
    DeclareFun(String, Vec<Sort>, Sort),
    /// `(define-fun name ((param sort)...) return_sort body)`
    DefineFun(String, Vec<(String, Sort)>, Sort, Term),
    /// `(assert term)`
    Assert(Term),
    /// `(check-sat)`
    CheckSat,
    /// `(get-value (terms...))`
    GetValue(Vec<Term>),
    /// `(maximize term)`
    Maximize(Term),
    /// `(minimize term)`
    Minimize(Term),
    /// `(get-objectives)`
    GetObjectives,
    /// `; comment`
    Comment(String),
}
