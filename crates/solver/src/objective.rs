//! Values from `(objectives ...)` replies of optimizing solvers.

use crate::error::SolverError;
use crate::extract::{ExtractMode, InputIndex, extract_pair, reference_of};
use crate::kind::{Kind, NamedSymVar};
use crate::sexpr::SExpr;
use crate::value::GeneralizedValue;

/// The optimal value reported for one objective tracker.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectiveBinding {
    pub name: String,
    pub value: GeneralizedValue,
}

/// `(* -1 <atom>)`
fn is_negated(value: &SExpr, atom: &str) -> bool {
    matches!(value.as_app(), Some([mul, minus_one, a])
        if mul.is_symbol("*") && minus_one.is_int(-1) && a.is_symbol(atom))
}

/// `(* (to_real -1) <atom>)`
fn is_real_negated(value: &SExpr, atom: &str) -> bool {
    let Some([mul, coeff, a]) = value.as_app() else {
        return false;
    };
    let to_real_minus_one = matches!(coeff.as_app(), Some([f, n])
        if f.is_symbol("to_real") && n.is_int(-1));
    mul.is_symbol("*") && to_real_minus_one && a.is_symbol(atom)
}

/// Infinite and infinitesimal objective values.
fn generalized(var: &NamedSymVar, value: &SExpr) -> Option<GeneralizedValue> {
    let kind = var.kind().clone();
    let numeric = kind.is_unbounded_int() || kind.is_real();

    if numeric && value.is_symbol("oo") {
        return Some(GeneralizedValue::PositiveInfinity(kind));
    }
    if numeric && is_negated(value, "oo") {
        return Some(GeneralizedValue::NegativeInfinity(kind));
    }
    if kind == Kind::Real && value.is_symbol("epsilon") {
        return Some(GeneralizedValue::PositiveEpsilon(kind));
    }
    if kind == Kind::Real && is_real_negated(value, "epsilon") {
        return Some(GeneralizedValue::NegativeEpsilon(kind));
    }
    None
}

/// Decode a parsed `(objectives <item>*)` reply.
///
/// Each item is first tried as an ordinary model pair; items that are not
/// are matched against the infinity and epsilon forms. An item matching
/// neither is an error.
pub fn extract_objectives(
    tree: &SExpr,
    inputs: &InputIndex<'_>,
    line: &str,
) -> Result<Vec<ObjectiveBinding>, SolverError> {
    let items = match tree.as_app() {
        Some([head, items @ ..]) if head.is_symbol("objectives") => items,
        _ => {
            return Err(SolverError::MalformedObjectives {
                line: line.to_string(),
                parsed: tree.to_string(),
            });
        }
    };

    let mut bindings = Vec::with_capacity(items.len());
    for item in items {
        let unmatched = || SolverError::UnmatchedObjective {
            line: line.to_string(),
            parsed: tree.to_string(),
            item: item.to_string(),
        };
        let pair = item.as_app().ok_or_else(unmatched)?;

        if let Some(binding) = extract_pair(pair, inputs, line, ExtractMode::Permissive)? {
            bindings.push(ObjectiveBinding {
                name: binding.name,
                value: GeneralizedValue::Regular(binding.value),
            });
            continue;
        }

        let var = match pair.first().and_then(reference_of) {
            Some(reference) => inputs.resolve(reference, line)?,
            None => None,
        };
        let value = match (var, pair) {
            (Some(var), [_, value]) => generalized(var, value).map(|v| (var, v)),
            _ => None,
        };
        let (var, value) = value.ok_or_else(unmatched)?;
        tracing::trace!(input = %var, value = %value, "decoded objective value");
        bindings.push(ObjectiveBinding {
            name: var.name.clone(),
            value,
        });
    }
    Ok(bindings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::SymRef;
    use crate::sexpr::parse_sexpr;
    use crate::value::ConstantValue;
    use num_bigint::BigInt;

    fn inputs() -> Vec<NamedSymVar> {
        vec![
            NamedSymVar::exists(SymRef::new(1, Kind::UnboundedInt), "cost"),
            NamedSymVar::exists(SymRef::new(2, Kind::Real), "gain"),
            NamedSymVar::exists(SymRef::new(3, Kind::unsigned(8)), "bits"),
        ]
    }

    fn decode(line: &str) -> Result<Vec<ObjectiveBinding>, SolverError> {
        let inputs = inputs();
        let index = InputIndex::new(&inputs);
        extract_objectives(&parse_sexpr(line).unwrap(), &index, line)
    }

    fn values(line: &str) -> Vec<(String, GeneralizedValue)> {
        decode(line)
            .unwrap()
            .into_iter()
            .map(|b| (b.name, b.value))
            .collect()
    }

    #[test]
    fn regular_values() {
        let got = values("(objectives (s1 5) (s3 #x0f))");
        assert_eq!(
            got,
            vec![
                (
                    "cost".to_string(),
                    GeneralizedValue::Regular(ConstantValue::integer(
                        &Kind::UnboundedInt,
                        BigInt::from(5)
                    ))
                ),
                (
                    "bits".to_string(),
                    GeneralizedValue::Regular(ConstantValue::integer(
                        &Kind::unsigned(8),
                        BigInt::from(15)
                    ))
                ),
            ]
        );
    }

    #[test]
    fn infinities() {
        let got = values("(objectives (s1 oo) (s2 (* (- 1) oo)))");
        assert_eq!(
            got,
            vec![
                (
                    "cost".to_string(),
                    GeneralizedValue::PositiveInfinity(Kind::UnboundedInt)
                ),
                (
                    "gain".to_string(),
                    GeneralizedValue::NegativeInfinity(Kind::Real)
                ),
            ]
        );
    }

    #[test]
    fn real_infinities() {
        let got = values("(objectives (s2 oo) (s2 (* -1 oo)))");
        assert_eq!(
            got,
            vec![
                ("gain".to_string(), GeneralizedValue::PositiveInfinity(Kind::Real)),
                ("gain".to_string(), GeneralizedValue::NegativeInfinity(Kind::Real)),
            ]
        );
    }

    #[test]
    fn epsilons() {
        let got = values("(objectives (s2 epsilon) (s2 (* (to_real (- 1)) epsilon)))");
        assert_eq!(got[0].1, GeneralizedValue::PositiveEpsilon(Kind::Real));
        assert_eq!(got[1].1, GeneralizedValue::NegativeEpsilon(Kind::Real));
    }

    #[test]
    fn empty_objectives() {
        assert!(values("(objectives)").is_empty());
    }

    #[test]
    fn epsilon_for_integer_is_unmatched() {
        let err = decode("(objectives (s1 epsilon))").unwrap_err();
        assert_eq!(
            err,
            SolverError::UnmatchedObjective {
                line: "(objectives (s1 epsilon))".into(),
                parsed: "(objectives (s1 epsilon))".into(),
                item: "(s1 epsilon)".into(),
            }
        );
    }

    #[test]
    fn infinity_for_bitvector_is_unmatched() {
        assert!(matches!(
            decode("(objectives (s3 oo))"),
            Err(SolverError::UnmatchedObjective { .. })
        ));
    }

    #[test]
    fn unknown_reference_is_unmatched() {
        assert!(matches!(
            decode("(objectives (s9 oo))"),
            Err(SolverError::UnmatchedObjective { .. })
        ));
    }

    #[test]
    fn wrong_head_is_malformed() {
        assert!(matches!(
            decode("((s1 5))"),
            Err(SolverError::MalformedObjectives { .. })
        ));
    }
}
