//! Pre-flight check of a problem against a solver's capability table.

use crate::config::SolverCapabilities;
use crate::error::SolverError;
use crate::kind::{Kind, Quantifier};
use crate::problem::{Problem, QueryMode};

/// Decide whether `problem` can be sent to a solver with `caps`.
///
/// Feature checks run in a fixed order and the first failure is reported.
/// The universally-quantified-objective check runs last and reports every
/// offending objective at once.
pub fn gate(problem: &Problem, caps: &SolverCapabilities) -> Result<(), SolverError> {
    let kinds = problem.kinds();
    let has = |pred: fn(&Kind) -> bool| kinds.iter().any(pred);

    let needs_quantifiers = match problem.mode {
        QueryMode::Satisfiability => problem
            .inputs
            .iter()
            .any(|v| v.quantifier == Quantifier::Forall),
        QueryMode::Validity => problem
            .inputs
            .iter()
            .any(|v| v.quantifier == Quantifier::Exists),
    };

    let checks = [
        (
            has(Kind::is_unbounded_int),
            caps.supports_unbounded_ints,
            "unbounded integers",
        ),
        (has(Kind::is_real), caps.supports_reals, "algebraic reals"),
        (
            has(Kind::is_float),
            caps.supports_floats,
            "single-precision floating-point numbers",
        ),
        (
            has(Kind::is_double),
            caps.supports_doubles,
            "double-precision floating-point numbers",
        ),
        (needs_quantifiers, caps.supports_quantifiers, "quantifiers"),
        (
            has(Kind::is_uninterpreted),
            caps.supports_uninterpreted_sorts,
            "uninterpreted sorts",
        ),
        (
            problem.is_optimization(),
            caps.supports_optimization,
            "optimization routines",
        ),
    ];

    if let Some((_, _, feature)) = checks
        .iter()
        .find(|(required, supported, _)| *required && !*supported)
    {
        return Err(SolverError::UnsupportedFeature {
            solver: caps.name.clone(),
            feature: (*feature).to_string(),
        });
    }

    let universal_objectives: Vec<String> = problem
        .objectives
        .iter()
        .filter(|obj| {
            let (a, b) = &obj.operands;
            problem.inputs.iter().any(|v| {
                v.quantifier == Quantifier::Forall && (v.sym.id == a.id || v.sym.id == b.id)
            })
        })
        .map(|obj| obj.name.clone())
        .collect();

    if !universal_objectives.is_empty() {
        return Err(SolverError::UnsupportedOptimization {
            solver: caps.name.clone(),
            objectives: universal_objectives,
        });
    }

    tracing::debug!(solver = %caps.name, kinds = kinds.len(), "capability gate passed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SolverConfig, SolverKind};
    use crate::kind::{NamedSymVar, SymRef, UninterpretedSort};
    use crate::problem::{Direction, Objective};

    fn problem(mode: QueryMode) -> Problem {
        Problem::new(
            mode,
            SymRef::new(99, Kind::unsigned(1)),
            SolverConfig::new(SolverKind::Z3),
        )
    }

    fn with_input(kind: Kind) -> Problem {
        let mut p = problem(QueryMode::Satisfiability);
        p.add_input(NamedSymVar::exists(SymRef::new(0, kind), "x"));
        p
    }

    fn feature_of(err: SolverError) -> String {
        match err {
            SolverError::UnsupportedFeature { feature, .. } => feature,
            other => panic!("expected UnsupportedFeature, got {other:?}"),
        }
    }

    #[test]
    fn bitvector_problem_passes_everywhere() {
        let p = with_input(Kind::unsigned(32));
        assert!(gate(&p, &SolverCapabilities::none("ABC")).is_ok());
        assert!(gate(&p, &SolverKind::Z3.capabilities()).is_ok());
    }

    #[test]
    fn each_feature_is_named() {
        let none = SolverCapabilities::none("ABC");
        let cases = [
            (Kind::UnboundedInt, "unbounded integers"),
            (Kind::Real, "algebraic reals"),
            (Kind::Float, "single-precision floating-point numbers"),
            (Kind::Double, "double-precision floating-point numbers"),
            (
                Kind::Uninterpreted(UninterpretedSort::opaque("Q")),
                "uninterpreted sorts",
            ),
        ];
        for (kind, feature) in cases {
            let err = gate(&with_input(kind), &none).unwrap_err();
            assert!(err.to_string().contains("ABC"));
            assert_eq!(feature_of(err), feature);
        }
    }

    #[test]
    fn first_failing_check_wins() {
        let mut p = with_input(Kind::Double);
        p.add_input(NamedSymVar::exists(SymRef::new(1, Kind::UnboundedInt), "n"));
        let err = gate(&p, &SolverCapabilities::none("ABC")).unwrap_err();
        assert_eq!(feature_of(err), "unbounded integers");
    }

    #[test]
    fn quantifiers_depend_on_mode() {
        let caps = SolverCapabilities {
            supports_quantifiers: false,
            ..SolverKind::Z3.capabilities()
        };

        let mut sat = problem(QueryMode::Satisfiability);
        sat.add_input(NamedSymVar::exists(SymRef::new(0, Kind::unsigned(8)), "x"));
        assert!(gate(&sat, &caps).is_ok());
        sat.add_input(NamedSymVar::forall(SymRef::new(1, Kind::unsigned(8)), "y"));
        assert_eq!(feature_of(gate(&sat, &caps).unwrap_err()), "quantifiers");

        let mut valid = problem(QueryMode::Validity);
        valid.add_input(NamedSymVar::forall(SymRef::new(0, Kind::unsigned(8)), "x"));
        assert!(gate(&valid, &caps).is_ok());
        valid.add_input(NamedSymVar::exists(SymRef::new(1, Kind::unsigned(8)), "y"));
        assert_eq!(feature_of(gate(&valid, &caps).unwrap_err()), "quantifiers");
    }

    #[test]
    fn optimization_requires_support() {
        let mut p = with_input(Kind::UnboundedInt);
        let x = p.inputs[0].sym.clone();
        p.add_objective(Objective {
            name: "goal".into(),
            direction: Direction::Maximize,
            operands: (x.clone(), x),
        });
        let err = gate(&p, &SolverKind::Cvc5.capabilities()).unwrap_err();
        assert_eq!(feature_of(err), "optimization routines");
        assert!(gate(&p, &SolverKind::Z3.capabilities()).is_ok());
    }

    #[test]
    fn universal_objectives_are_all_listed() {
        let mut p = problem(QueryMode::Satisfiability);
        let x = SymRef::new(0, Kind::UnboundedInt);
        let y = SymRef::new(1, Kind::UnboundedInt);
        let z = SymRef::new(2, Kind::UnboundedInt);
        p.add_input(NamedSymVar::exists(x.clone(), "x"));
        p.add_input(NamedSymVar::forall(y.clone(), "y"));
        p.add_input(NamedSymVar::forall(z.clone(), "z"));
        for (name, a, b) in [("ok", &x, &x), ("bad1", &y, &x), ("bad2", &x, &z)] {
            p.add_objective(Objective {
                name: name.into(),
                direction: Direction::Minimize,
                operands: (a.clone(), b.clone()),
            });
        }

        let err = gate(&p, &SolverKind::Z3.capabilities()).unwrap_err();
        assert_eq!(
            err,
            SolverError::UnsupportedOptimization {
                solver: "Z3".into(),
                objectives: vec!["bad1".into(), "bad2".into()],
            }
        );
    }

    #[test]
    fn inputs_pushed_directly_are_gated() {
        let mut p = problem(QueryMode::Satisfiability);
        p.inputs.push(NamedSymVar::exists(SymRef::new(0, Kind::Real), "r"));
        let err = gate(&p, &SolverKind::Abc.capabilities()).unwrap_err();
        assert_eq!(feature_of(err), "algebraic reals");
    }

}
