//! Typed values from `((<ref> <value>))` model lines.
//!
//! Value shapes vary by solver. Each shape is handled by one matcher in
//! [`RULES`], tried in order; the first matcher that claims the value wins.

use std::collections::HashMap;

use crate::error::SolverError;
use crate::kind::{Kind, NamedSymVar, NodeId};
use crate::sexpr::SExpr;
use crate::value::ConstantValue;

/// What to do with a value no rule accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractMode {
    /// Report it as [`SolverError::UnmatchedValue`].
    Strict,
    /// Produce no binding.
    Permissive,
}

/// A decoded model value for one input.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub id: NodeId,
    pub name: String,
    pub value: ConstantValue,
}

/// Declared inputs keyed by node id. Built once per decode call.
#[derive(Debug, Clone)]
pub struct InputIndex<'a> {
    by_id: HashMap<NodeId, Vec<&'a NamedSymVar>>,
}

impl<'a> InputIndex<'a> {
    pub fn new(inputs: &'a [NamedSymVar]) -> Self {
        let mut by_id: HashMap<NodeId, Vec<&'a NamedSymVar>> = HashMap::new();
        for input in inputs {
            by_id.entry(input.sym.id).or_default().push(input);
        }
        Self { by_id }
    }

    /// Resolve a wire reference to the input it names.
    ///
    /// Returns `Ok(None)` when `reference` is not an `s<digits>` symbol or
    /// names no input, and an error when it names more than one.
    pub fn resolve(
        &self,
        reference: &str,
        line: &str,
    ) -> Result<Option<&'a NamedSymVar>, SolverError> {
        let Some(id) = NodeId::from_symbol(reference) else {
            return Ok(None);
        };
        match self.by_id.get(&id).map(Vec::as_slice) {
            None | Some([]) => Ok(None),
            Some([single]) => Ok(Some(*single)),
            Some(many) => Err(SolverError::AmbiguousReference {
                reference: reference.to_string(),
                line: line.to_string(),
                matches: many.iter().map(|v| v.to_string()).collect(),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.by_id.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Outcome of one matcher.
#[derive(Debug)]
enum Matched<'t> {
    /// Not this matcher's shape; try the next one.
    No,
    Value(ConstantValue),
    /// Right shape, but the value is invalid for the kind.
    Malformed(String),
    /// Run the rules again on a subterm.
    Reextract(&'t SExpr),
}

type Rule = for<'t> fn(&Kind, &'t SExpr) -> Matched<'t>;

/// Value matchers, in priority order.
const RULES: &[(&str, Rule)] = &[
    ("integer", integer),
    ("real", real),
    ("real cast", real_cast),
    ("uninterpreted", uninterpreted),
    ("double", double),
    ("float", float),
    ("lambda", lambda),
];

fn integer<'t>(kind: &Kind, value: &'t SExpr) -> Matched<'t> {
    if !kind.is_integral() {
        return Matched::No;
    }
    match value {
        SExpr::Int(n) | SExpr::BitVec { value: n, .. } => {
            Matched::Value(ConstantValue::integer(kind, n.clone()))
        }
        _ => Matched::No,
    }
}

fn real<'t>(kind: &Kind, value: &'t SExpr) -> Matched<'t> {
    match (kind, value) {
        (Kind::Real, SExpr::Decimal(d)) => Matched::Value(ConstantValue::Real(d.clone())),
        (Kind::Real, SExpr::Int(n)) => Matched::Value(ConstantValue::Real(
            num_rational::BigRational::from_integer(n.clone()),
        )),
        _ => Matched::No,
    }
}

/// Some solvers answer with a rational for an input that is not real-kinded
/// (after `to_real` coercions in the asserted formula). The value is kept
/// as an algebraic real rather than rejected.
fn real_cast<'t>(_kind: &Kind, value: &'t SExpr) -> Matched<'t> {
    match value {
        SExpr::Decimal(d) => Matched::Value(ConstantValue::Real(d.clone())),
        _ => Matched::No,
    }
}

fn uninterpreted<'t>(kind: &Kind, value: &'t SExpr) -> Matched<'t> {
    let (Kind::Uninterpreted(sort), SExpr::Symbol(element)) = (kind, value) else {
        return Matched::No;
    };
    let index = match &sort.elements {
        Some(_) => match sort.index_of(element) {
            Some(i) => Some(i),
            None => {
                return Matched::Malformed(format!(
                    "{element} is not an element of sort {}",
                    sort.name
                ));
            }
        },
        None => None,
    };
    Matched::Value(ConstantValue::Uninterpreted {
        sort: sort.clone(),
        element: element.clone(),
        index,
    })
}

fn double<'t>(kind: &Kind, value: &'t SExpr) -> Matched<'t> {
    match (kind, value) {
        (Kind::Double, SExpr::Double(x)) => Matched::Value(ConstantValue::Double(*x)),
        _ => Matched::No,
    }
}

fn float<'t>(kind: &Kind, value: &'t SExpr) -> Matched<'t> {
    match (kind, value) {
        (Kind::Float, SExpr::Float(x)) => Matched::Value(ConstantValue::Float(*x)),
        _ => Matched::No,
    }
}

/// Z3 occasionally prints a constant as `(LAMBDA (...) body)`; only the
/// final operand carries the value.
fn lambda<'t>(_kind: &Kind, value: &'t SExpr) -> Matched<'t> {
    match value.as_app() {
        Some([head, .., last]) if head.is_symbol("LAMBDA") => Matched::Reextract(last),
        _ => Matched::No,
    }
}

/// Strip `(as <value> <sort>)`.
fn strip_annotation(value: &SExpr) -> &SExpr {
    match value.as_app() {
        Some([as_, inner, _sort]) if as_.is_symbol("as") => inner,
        _ => value,
    }
}

/// The wire reference at the head of a model pair: `s3`, or the head of an
/// application such as `(s3 x)`.
pub(crate) fn reference_of(head: &SExpr) -> Option<&str> {
    match head {
        SExpr::Symbol(s) => Some(s),
        SExpr::App(items) => items.first().and_then(SExpr::as_symbol),
        _ => None,
    }
}

/// Extract the binding from one `(<ref> <value>)` pair.
pub(crate) fn extract_pair(
    items: &[SExpr],
    inputs: &InputIndex<'_>,
    line: &str,
    mode: ExtractMode,
) -> Result<Option<Binding>, SolverError> {
    let Some(reference) = items.first().and_then(reference_of) else {
        return Ok(None);
    };
    let Some(var) = inputs.resolve(reference, line)? else {
        return Ok(None);
    };

    let unmatched = |subtree: &SExpr| match mode {
        ExtractMode::Strict => Err(SolverError::UnmatchedValue {
            name: var.to_string(),
            line: line.to_string(),
            subtree: subtree.to_string(),
        }),
        ExtractMode::Permissive => Ok(None),
    };

    let [_, value] = items else {
        return unmatched(&SExpr::App(items.to_vec()));
    };

    let mut current = strip_annotation(value);
    'reextract: loop {
        for (rule, matcher) in RULES {
            match matcher(var.kind(), current) {
                Matched::No => continue,
                Matched::Value(value) => {
                    tracing::trace!(input = %var, rule, value = %value, "decoded model value");
                    return Ok(Some(Binding {
                        id: var.sym.id,
                        name: var.name.clone(),
                        value,
                    }));
                }
                Matched::Malformed(reason) => {
                    return Err(SolverError::InvalidValue {
                        name: var.to_string(),
                        line: line.to_string(),
                        reason,
                    });
                }
                Matched::Reextract(inner) => {
                    current = strip_annotation(inner);
                    continue 'reextract;
                }
            }
        }
        return unmatched(current);
    }
}

/// Extract the binding carried by one parsed model line `((<ref> <value>))`.
///
/// References that name no declared input yield `Ok(None)`, as do lines of
/// any other shape.
pub fn extract_model_value(
    tree: &SExpr,
    inputs: &InputIndex<'_>,
    line: &str,
    mode: ExtractMode,
) -> Result<Option<Binding>, SolverError> {
    match tree.as_app() {
        Some([SExpr::App(pair)]) => extract_pair(pair, inputs, line, mode),
        _ => Ok(None),
    }
}
