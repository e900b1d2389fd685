//! SMT-LIB2 program generation for a gated problem.
//!
//! A program is split in two: the preamble declares everything and asserts
//! the query, the postlude retrieves the model once `(check-sat)` has
//! answered `sat` or `unknown`.

use std::collections::BTreeMap;
use std::fmt;

use num_bigint::BigInt;
use num_rational::BigRational;
use symbridge_smtlib::command::Command;
use symbridge_smtlib::script::Script;
use symbridge_smtlib::sort::Sort;
use symbridge_smtlib::term::Term;

use crate::capability::gate;
use crate::error::SolverError;
use crate::kind::{Kind, UninterpretedSort};
use crate::problem::{Direction, Problem, QueryMode, Table};
use crate::value::ConstantValue;

/// Output dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolVersion {
    SmtLib2,
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolVersion::SmtLib2 => write!(f, "SMTLib2"),
        }
    }
}

/// An encoded query.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolProgram {
    pub version: ProtocolVersion,
    pub preamble: Script,
    pub postlude: Script,
}

impl ProtocolProgram {
    /// The whole session: preamble, `(check-sat)`, postlude.
    pub fn script(&self) -> Script {
        let mut script = self.preamble.clone();
        script.push(Command::CheckSat);
        script.extend(self.postlude.commands().iter().cloned());
        script
    }
}

/// Encode `problem` in the given dialect. The problem is gated against its
/// configured capability table first; nothing is produced if that fails.
pub fn to_smtlib(version: ProtocolVersion, problem: &Problem) -> Result<ProtocolProgram, SolverError> {
    gate(problem, &problem.config.capabilities)?;

    let (preamble, postlude) = match version {
        ProtocolVersion::SmtLib2 => (preamble(problem)?, postlude(problem)),
    };

    tracing::debug!(
        %version,
        solver = %problem.config.kind,
        preamble = preamble.len(),
        postlude = postlude.len(),
        "encoded problem"
    );
    Ok(ProtocolProgram {
        version,
        preamble,
        postlude,
    })
}

/// Encode `problem` as SMT-LIB2.
pub fn encode(problem: &Problem) -> Result<ProtocolProgram, SolverError> {
    to_smtlib(ProtocolVersion::SmtLib2, problem)
}

/// Name of the function a skolemized input is declared as.
fn skolem_name(var: &str) -> String {
    format!("{var}_skolem")
}

/// Derive a `set-logic` value from the kinds a problem uses.
fn logic_for(problem: &Problem) -> String {
    let kinds = problem.kinds();
    let bv = kinds.iter().any(|k| matches!(k, Kind::Bounded { .. }));
    let int = kinds.iter().any(Kind::is_unbounded_int);
    let real = kinds.iter().any(Kind::is_real);
    let fp = kinds.iter().any(|k| k.is_float() || k.is_double());

    let theory = match (bv, int, real, fp) {
        (false, false, false, false) => "",
        (true, false, false, false) => "BV",
        (false, true, false, false) => "NIA",
        (false, false, true, false) => "NRA",
        (false, false, false, true) => "FP",
        (true, false, false, true) => "FPBV",
        _ => return "ALL".to_string(),
    };

    let mut logic = String::new();
    if problem.bound_inputs().next().is_none() {
        logic.push_str("QF_");
    }
    if !problem.arrays.is_empty() || !problem.tables.is_empty() {
        logic.push('A');
    }
    let uf = !problem.uninterpreted.is_empty()
        || kinds.iter().any(Kind::is_uninterpreted)
        || problem.inputs.iter().any(|v| !v.skolem_args.is_empty());
    if uf || theory.is_empty() {
        logic.push_str("UF");
    }
    logic.push_str(theory);
    logic
}

/// Uninterpreted sorts in use, by name. A name used with two different
/// element lists is rejected.
fn sorts_in_use(problem: &Problem) -> Result<BTreeMap<String, UninterpretedSort>, SolverError> {
    let mut sorts: BTreeMap<String, UninterpretedSort> = BTreeMap::new();
    for kind in problem.kinds() {
        let Kind::Uninterpreted(sort) = kind else {
            continue;
        };
        match sorts.get(&sort.name) {
            Some(seen) if *seen != sort => {
                return Err(SolverError::InvalidProblem(format!(
                    "sort {} is declared with conflicting elements",
                    sort.name
                )));
            }
            Some(_) => {}
            None => {
                sorts.insert(sort.name.clone(), sort);
            }
        }
    }
    Ok(sorts)
}

/// Literal used to index entry `i` of a table.
fn index_literal(table: &Table, i: usize) -> Result<Term, SolverError> {
    let i = BigInt::from(i);
    match &table.index {
        Kind::Bounded { width, .. } => Ok(Term::BitVecLit(i, *width)),
        Kind::UnboundedInt => Ok(Term::IntLit(i)),
        Kind::Real => Ok(Term::RealLit(BigRational::from_integer(i))),
        other => Err(SolverError::InvalidProblem(format!(
            "{} cannot be indexed by {other}",
            table.name()
        ))),
    }
}

/// `(= sOut #b1)`, negated in validity mode.
fn goal(problem: &Problem) -> Result<Term, SolverError> {
    let out = &problem.output;
    if !matches!(out.kind, Kind::Bounded { width: 1, .. }) {
        return Err(SolverError::InvalidProblem(format!(
            "output {out} has kind {}, expected a 1-bit value",
            out.kind
        )));
    }
    let holds = Term::eq(
        Term::constant(out.name()),
        Term::BitVecLit(BigInt::from(1), 1),
    );
    Ok(match problem.mode {
        QueryMode::Satisfiability => holds,
        QueryMode::Validity => Term::not(holds),
    })
}

/// Ties each objective's tracker input to the value it tracks.
fn tracker_equalities(problem: &Problem) -> Vec<Term> {
    problem
        .objectives
        .iter()
        .map(|obj| {
            let (value, tracker) = &obj.operands;
            Term::eq(Term::constant(tracker.name()), Term::constant(value.name()))
        })
        .collect()
}

fn preamble(problem: &Problem) -> Result<Script, SolverError> {
    let config = &problem.config;
    let mut script = Script::new();

    // Header
    if config.emit_comments {
        for comment in &problem.comments {
            script.push(Command::Comment(comment.clone()));
        }
    }
    script.push(Command::SetOption(
        "produce-models".to_string(),
        "true".to_string(),
    ));
    for (key, value) in &config.options {
        script.push(Command::SetOption(key.clone(), value.clone()));
    }
    let logic = config.logic.clone().unwrap_or_else(|| logic_for(problem));
    script.push(Command::SetLogic(logic));

    // Sorts
    for (name, sort) in sorts_in_use(problem)? {
        match sort.elements {
            Some(elements) => script.push(Command::DeclareEnum(name, elements)),
            None => script.push(Command::DeclareSort(name, 0)),
        }
    }

    // Free inputs
    for var in problem.free_inputs() {
        let sort = var.kind().to_sort();
        if var.skolem_args.is_empty() {
            script.push(Command::DeclareFun(var.sym.name(), vec![], sort));
        } else {
            let params = var.skolem_args.iter().map(|a| a.kind.to_sort()).collect();
            script.push(Command::DeclareFun(skolem_name(&var.sym.name()), params, sort));
        }
    }

    // Constants
    for (sym, value) in &problem.constants {
        let sort = sym.kind.to_sort();
        match value {
            ConstantValue::Uninterpreted { index: None, .. } => {
                script.push(Command::DeclareFun(sym.name(), vec![], sort));
            }
            _ => script.push(Command::DefineFun(sym.name(), vec![], sort, value.to_term())),
        }
    }

    // Tables
    for table in &problem.tables {
        let name = table.name();
        script.push(Command::DeclareFun(
            name.clone(),
            vec![table.index.to_sort()],
            table.element.to_sort(),
        ));
        for (i, entry) in table.entries.iter().enumerate() {
            let at = Term::app(name.clone(), vec![index_literal(table, i)?]);
            script.push(Command::Assert(Term::eq(at, entry.clone())));
        }
    }

    // Arrays
    for array in &problem.arrays {
        let sort = Sort::array(array.index.to_sort(), array.element.to_sort());
        script.push(Command::DeclareFun(array.name(), vec![], sort.clone()));
        if let Some(initial) = &array.initial {
            script.push(Command::Assert(Term::eq(
                Term::constant(array.name()),
                Term::ConstArray(sort, Box::new(initial.clone())),
            )));
        }
    }

    // Uninterpreted functions and constants
    for function in &problem.uninterpreted {
        script.push(Command::DeclareFun(
            function.name.clone(),
            function.params.iter().map(Kind::to_sort).collect(),
            function.result.to_sort(),
        ));
    }

    for axiom in &problem.axioms {
        script.push(Command::Comment(format!("axiom: {}", axiom.name)));
        script.push(Command::Assert(axiom.term.clone()));
    }

    // Formula
    let goal = goal(problem)?;
    let bound: Vec<(String, Sort)> = problem
        .bound_inputs()
        .map(|v| (v.sym.name(), v.kind().to_sort()))
        .collect();

    if bound.is_empty() {
        for assignment in &problem.assignments {
            script.push(Command::DefineFun(
                assignment.target.name(),
                vec![],
                assignment.target.kind.to_sort(),
                assignment.term.clone(),
            ));
        }
        for constraint in &problem.constraints {
            script.push(Command::Assert(constraint.clone()));
        }
        for tracker in tracker_equalities(problem) {
            script.push(Command::Assert(tracker));
        }
        script.push(Command::Assert(goal));
    } else {
        let mut conjuncts = problem.constraints.clone();
        conjuncts.extend(tracker_equalities(problem));
        conjuncts.push(goal);
        let mut body = Term::and(conjuncts);

        // Assignments are sequential, so each gets its own `let`.
        for assignment in problem.assignments.iter().rev() {
            body = Term::Let(
                vec![(assignment.target.name(), assignment.term.clone())],
                Box::new(body),
            );
        }
        let skolems: Vec<(String, Term)> = problem
            .free_inputs()
            .filter(|v| !v.skolem_args.is_empty())
            .map(|v| {
                let args = v
                    .skolem_args
                    .iter()
                    .map(|a| Term::constant(a.name()))
                    .collect();
                (v.sym.name(), Term::app(skolem_name(&v.sym.name()), args))
            })
            .collect();
        if !skolems.is_empty() {
            body = Term::Let(skolems, Box::new(body));
        }
        script.push(Command::Assert(Term::Forall(bound, Box::new(body))));
    }

    for obj in &problem.objectives {
        let tracker = Term::constant(obj.operands.1.name());
        script.push(match obj.direction {
            Direction::Maximize => Command::Maximize(tracker),
            Direction::Minimize => Command::Minimize(tracker),
        });
    }

    Ok(script)
}

fn postlude(problem: &Problem) -> Script {
    let mut script = Script::new();
    for var in problem.free_inputs().filter(|v| v.skolem_args.is_empty()) {
        script.push(Command::GetValue(vec![Term::constant(var.sym.name())]));
    }
    if problem.is_optimization() {
        script.push(Command::GetObjectives);
    }
    script
}
