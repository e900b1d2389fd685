//! End-to-end tests: encode a problem, answer its postlude the way a solver
//! would, and decode the reply.

use num_bigint::BigInt;
use num_rational::BigRational;

use symbridge_smtlib::command::Command;
use symbridge_smtlib::term::Term;

use symbridge_solver::{
    ConstantValue, Direction, GeneralizedValue, Kind, NamedSymVar, Objective, Problem, QueryMode,
    SolverConfig, SolverError, SolverKind, SolverResult, SymRef, UninterpretedSort, classify,
    encode, parse_sexpr,
};

// ---- Helpers ----

fn out() -> SymRef {
    SymRef::new(1000, Kind::unsigned(1))
}

fn problem_with(inputs: &[(SymRef, &str)]) -> Problem {
    let mut problem = Problem::new(
        QueryMode::Satisfiability,
        out(),
        SolverConfig::new(SolverKind::Z3),
    );
    problem.add_comment("round-trip fixture");
    for (sym, name) in inputs {
        problem.add_input(NamedSymVar::exists(sym.clone(), *name));
    }
    problem.add_assignment(out(), Term::BitVecLit(BigInt::from(1), 1));
    problem
}

/// The name queried by a `(get-value (sN))` command.
fn queried(cmd: &Command) -> Option<String> {
    match cmd {
        Command::GetValue(terms) => match terms.as_slice() {
            [Term::Const(name)] => Some(name.clone()),
            _ => None,
        },
        _ => None,
    }
}

// ============================================================
// Encode -> reply -> decode
// ============================================================

#[test]
fn every_input_kind_round_trips() {
    let color = UninterpretedSort::enumerated("Color", vec!["Red".into(), "Green".into()]);
    let cases: Vec<(SymRef, &str, ConstantValue)> = vec![
        (
            SymRef::new(0, Kind::signed(8)),
            "i8",
            ConstantValue::integer(&Kind::signed(8), BigInt::from(-1)),
        ),
        (
            SymRef::new(1, Kind::unsigned(32)),
            "w32",
            ConstantValue::integer(&Kind::unsigned(32), BigInt::from(0xdead_beef_u32)),
        ),
        (
            SymRef::new(2, Kind::UnboundedInt),
            "n",
            ConstantValue::integer(&Kind::UnboundedInt, BigInt::from(-12345)),
        ),
        (
            SymRef::new(3, Kind::Real),
            "third",
            ConstantValue::Real(BigRational::new(BigInt::from(-1), BigInt::from(3))),
        ),
        (SymRef::new(4, Kind::Float), "f", ConstantValue::Float(-2.5)),
        (SymRef::new(5, Kind::Double), "d", ConstantValue::Double(0.1)),
        (SymRef::new(6, Kind::Float), "nan", ConstantValue::Float(f32::NAN)),
        (SymRef::new(7, Kind::Double), "negzero", ConstantValue::Double(-0.0)),
        (
            SymRef::new(8, Kind::Uninterpreted(color.clone())),
            "c",
            ConstantValue::Uninterpreted {
                sort: color,
                element: "Green".into(),
                index: Some(1),
            },
        ),
    ];

    let inputs: Vec<(SymRef, &str)> = cases.iter().map(|(s, n, _)| (s.clone(), *n)).collect();
    let problem = problem_with(&inputs);
    let program = encode(&problem).unwrap();

    // A solver answers each get-value with `((sN <literal>))`.
    let mut reply = vec!["sat".to_string()];
    for cmd in program.postlude.commands() {
        let name = queried(cmd).expect("postlude should only query values");
        let (_, _, value) = cases
            .iter()
            .find(|(sym, _, _)| sym.name() == name)
            .expect("queried name should be an input");
        reply.push(format!("(({name} {}))", value.to_term()));
    }

    let result = classify(&reply, &problem.inputs).unwrap();
    let model = result.model().expect("sat reply should carry a model");
    assert_eq!(model.len(), cases.len());
    for (sym, name, expected) in &cases {
        let got = model.get(name).unwrap_or_else(|| panic!("missing {name}"));
        assert_eq!(got, expected, "value of {name}");
        assert_eq!(got.kind(), sym.kind, "kind of {name}");
    }
}

#[test]
fn emitted_commands_are_single_sexprs() {
    let problem = problem_with(&[
        (SymRef::new(0, Kind::unsigned(8)), "x"),
        (SymRef::new(1, Kind::Real), "r"),
    ]);
    let script = encode(&problem).unwrap().script();
    for cmd in script.commands() {
        if matches!(cmd, Command::Comment(_)) {
            continue;
        }
        let text = cmd.to_string();
        assert!(parse_sexpr(&text).is_ok(), "cannot re-read {text}");
    }
    assert!(script.to_string().starts_with("; round-trip fixture\n"));
}

#[test]
fn undeclared_references_are_ignored() {
    let problem = problem_with(&[(SymRef::new(0, Kind::unsigned(8)), "x")]);
    let reply = ["sat", "((s0 #x0a))", "((s77 #x01))", "((table0 #x01))"];
    let result = classify(&reply, &problem.inputs).unwrap();
    let model = result.model().unwrap();
    assert_eq!(model.len(), 1);
    assert_eq!(model.to_string(), "x = 10 :: Word8\n");
}

#[test]
fn ambiguous_reply_is_fatal() {
    let mut problem = problem_with(&[(SymRef::new(0, Kind::unsigned(8)), "x")]);
    problem.add_input(NamedSymVar::exists(SymRef::new(0, Kind::unsigned(8)), "alias"));
    let err = classify(&["sat", "((s0 #x0a))"], &problem.inputs).unwrap_err();
    match err {
        SolverError::AmbiguousReference { matches, .. } => {
            assert_eq!(matches, vec!["s0 (x)", "s0 (alias)"]);
        }
        other => panic!("expected AmbiguousReference, got {other:?}"),
    }
}

#[test]
fn optimization_round_trip() {
    let cost = SymRef::new(0, Kind::UnboundedInt);
    let tracker = SymRef::new(1, Kind::UnboundedInt);
    let mut problem = problem_with(&[(cost.clone(), "cost"), (tracker.clone(), "best")]);
    problem.add_objective(Objective {
        name: "best".into(),
        direction: Direction::Minimize,
        operands: (cost, tracker),
    });

    let program = encode(&problem).unwrap();
    assert_eq!(
        program.postlude.commands().last(),
        Some(&Command::GetObjectives)
    );

    let reply = ["sat", "((s0 (- 4)))", "((s1 (- 4)))", "(objectives (s1 (* (- 1) oo)))"];
    let result = classify(&reply, &problem.inputs).unwrap();
    let model = result.model().unwrap();
    assert_eq!(
        model.get("cost"),
        Some(&ConstantValue::integer(&Kind::UnboundedInt, BigInt::from(-4)))
    );
    assert_eq!(
        model.objective("best"),
        Some(&GeneralizedValue::NegativeInfinity(Kind::UnboundedInt))
    );
}

#[test]
fn unsupported_problem_produces_nothing() {
    let mut problem = problem_with(&[(SymRef::new(0, Kind::Double), "d")]);
    problem.config = SolverConfig::new(SolverKind::Yices);
    let err = encode(&problem).unwrap_err();
    assert_eq!(
        err,
        SolverError::UnsupportedFeature {
            solver: "Yices".into(),
            feature: "double-precision floating-point numbers".into(),
        }
    );
}

#[test]
fn capability_table_from_json() {
    let caps = symbridge_solver::SolverCapabilities::from_json(
        r#"{ "name": "Custom", "supports_unbounded_ints": true }"#,
    )
    .unwrap();
    let mut problem = problem_with(&[(SymRef::new(0, Kind::UnboundedInt), "n")]);
    problem.config = problem.config.clone().with_capabilities(caps);
    assert!(encode(&problem).is_ok());

    problem.add_input(NamedSymVar::exists(SymRef::new(1, Kind::Real), "r"));
    assert!(matches!(
        encode(&problem),
        Err(SolverError::UnsupportedFeature { feature, .. }) if feature == "algebraic reals"
    ));
}

#[test]
fn non_verdict_reply_is_proof_error() {
    let problem = problem_with(&[(SymRef::new(0, Kind::unsigned(8)), "x")]);
    let reply = ["(error \"unsupported\")"];
    assert_eq!(
        classify(&reply, &problem.inputs).unwrap(),
        SolverResult::ProofError(vec!["(error \"unsupported\")".to_string()])
    );
}
