//! The constraint problem handed over by the symbolic engine.
//!
//! Terms inside the problem are already-encoded SMT-LIB trees that refer to
//! symbolic values by their wire names (`s<id>`). This crate declares,
//! orders and wraps them; it never looks inside.

use std::collections::HashSet;

use symbridge_smtlib::term::Term;

use crate::config::SolverConfig;
use crate::kind::{Kind, NamedSymVar, Quantifier, SymRef};
use crate::value::ConstantValue;

/// Whether the output is checked for satisfiability or for validity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    Satisfiability,
    Validity,
}

impl QueryMode {
    /// Polarity of inputs declared at top level (and reported in models).
    pub fn free_quantifier(&self) -> Quantifier {
        match self {
            QueryMode::Satisfiability => Quantifier::Exists,
            QueryMode::Validity => Quantifier::Forall,
        }
    }
}

/// A lookup table `table<id>`: `entries[i]` is the value at index `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub id: usize,
    pub index: Kind,
    pub element: Kind,
    pub entries: Vec<Term>,
}

impl Table {
    pub fn name(&self) -> String {
        format!("table{}", self.id)
    }
}

/// An SMT array `array_<id>`, optionally filled with one initial value.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayDecl {
    pub id: usize,
    pub index: Kind,
    pub element: Kind,
    pub initial: Option<Term>,
}

impl ArrayDecl {
    pub fn name(&self) -> String {
        format!("array_{}", self.id)
    }
}

/// An uninterpreted function; a constant when `params` is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct UninterpretedFn {
    pub name: String,
    pub params: Vec<Kind>,
    pub result: Kind,
}

/// A user axiom, asserted verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct Axiom {
    pub name: String,
    pub term: Term,
}

/// `target := term`, one step of the derived-value sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub target: SymRef,
    pub term: Term,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Maximize,
    Minimize,
}

/// An optimization goal.
///
/// `operands.0` is the optimized expression; `operands.1` is the tracker,
/// a free input named like the objective that the encoder constrains equal
/// to the expression, so the solver reports the objective under a
/// declared reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    pub name: String,
    pub direction: Direction,
    pub operands: (SymRef, SymRef),
}

/// Everything the encoder needs to emit one query.
#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    pub mode: QueryMode,
    pub comments: Vec<String>,
    /// Declared inputs, in quantifier-prefix order.
    pub inputs: Vec<NamedSymVar>,
    pub constants: Vec<(SymRef, ConstantValue)>,
    pub tables: Vec<Table>,
    pub arrays: Vec<ArrayDecl>,
    pub uninterpreted: Vec<UninterpretedFn>,
    pub axioms: Vec<Axiom>,
    pub assignments: Vec<Assignment>,
    /// Side constraints; hypotheses in validity mode.
    pub constraints: Vec<Term>,
    /// Boolean reference whose truth is queried.
    pub output: SymRef,
    pub config: SolverConfig,
    /// Empty when the query is not an optimization.
    pub objectives: Vec<Objective>,
    /// Kinds used outside any declaration, such as inside axioms.
    extra_kinds: HashSet<Kind>,
}

impl Problem {
    pub fn new(mode: QueryMode, output: SymRef, config: SolverConfig) -> Self {
        Self {
            mode,
            comments: Vec::new(),
            inputs: Vec::new(),
            constants: Vec::new(),
            tables: Vec::new(),
            arrays: Vec::new(),
            uninterpreted: Vec::new(),
            axioms: Vec::new(),
            assignments: Vec::new(),
            constraints: Vec::new(),
            output,
            config,
            objectives: Vec::new(),
            extra_kinds: HashSet::new(),
        }
    }

    /// Kinds of every value the problem mentions, collected from the
    /// declarations as they stand plus any kinds recorded with
    /// [`note_kind`](Self::note_kind).
    pub fn kinds(&self) -> HashSet<Kind> {
        let mut kinds = self.extra_kinds.clone();
        kinds.insert(self.output.kind.clone());
        for input in &self.inputs {
            kinds.insert(input.sym.kind.clone());
            kinds.extend(input.skolem_args.iter().map(|a| a.kind.clone()));
        }
        for (sym, value) in &self.constants {
            kinds.insert(sym.kind.clone());
            kinds.insert(value.kind());
        }
        for table in &self.tables {
            kinds.insert(table.index.clone());
            kinds.insert(table.element.clone());
        }
        for array in &self.arrays {
            kinds.insert(array.index.clone());
            kinds.insert(array.element.clone());
        }
        for function in &self.uninterpreted {
            kinds.extend(function.params.iter().cloned());
            kinds.insert(function.result.clone());
        }
        for assignment in &self.assignments {
            kinds.insert(assignment.target.kind.clone());
        }
        for objective in &self.objectives {
            kinds.insert(objective.operands.0.kind.clone());
            kinds.insert(objective.operands.1.kind.clone());
        }
        kinds
    }

    /// Record a kind that is used without being attached to a declared value.
    pub fn note_kind(&mut self, kind: Kind) {
        self.extra_kinds.insert(kind);
    }

    pub fn add_comment(&mut self, text: impl Into<String>) {
        self.comments.push(text.into());
    }

    pub fn add_input(&mut self, input: NamedSymVar) {
        self.inputs.push(input);
    }

    pub fn add_constant(&mut self, sym: SymRef, value: ConstantValue) {
        self.constants.push((sym, value));
    }

    pub fn add_table(&mut self, table: Table) {
        self.tables.push(table);
    }

    pub fn add_array(&mut self, array: ArrayDecl) {
        self.arrays.push(array);
    }

    pub fn add_uninterpreted(&mut self, function: UninterpretedFn) {
        self.uninterpreted.push(function);
    }

    pub fn add_axiom(&mut self, name: impl Into<String>, term: Term) {
        self.axioms.push(Axiom {
            name: name.into(),
            term,
        });
    }

    pub fn add_assignment(&mut self, target: SymRef, term: Term) {
        self.assignments.push(Assignment { target, term });
    }

    pub fn add_constraint(&mut self, term: Term) {
        self.constraints.push(term);
    }

    pub fn add_objective(&mut self, objective: Objective) {
        self.objectives.push(objective);
    }

    /// Inputs declared at top level for this query mode.
    pub fn free_inputs(&self) -> impl Iterator<Item = &NamedSymVar> {
        let free = self.mode.free_quantifier();
        self.inputs.iter().filter(move |v| v.quantifier == free)
    }

    /// Inputs that must be bound by a quantifier for this query mode.
    pub fn bound_inputs(&self) -> impl Iterator<Item = &NamedSymVar> {
        let free = self.mode.free_quantifier();
        self.inputs.iter().filter(move |v| v.quantifier != free)
    }

    pub fn is_optimization(&self) -> bool {
        !self.objectives.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SolverConfig, SolverKind};
    use crate::kind::UninterpretedSort;

    fn bool_out() -> SymRef {
        SymRef::new(100, Kind::unsigned(1))
    }

    #[test]
    fn kinds_are_collected_from_every_declaration() {
        let mut p = Problem::new(
            QueryMode::Satisfiability,
            bool_out(),
            SolverConfig::new(SolverKind::Z3),
        );
        p.add_input(NamedSymVar::exists(SymRef::new(0, Kind::Real), "r"));
        p.add_uninterpreted(UninterpretedFn {
            name: "f".into(),
            params: vec![Kind::Double],
            result: Kind::Uninterpreted(UninterpretedSort::opaque("Q")),
        });
        p.add_array(ArrayDecl {
            id: 0,
            index: Kind::UnboundedInt,
            element: Kind::Float,
            initial: None,
        });

        let kinds = p.kinds();
        assert!(kinds.contains(&Kind::unsigned(1)));
        assert!(kinds.contains(&Kind::Real));
        assert!(kinds.contains(&Kind::Double));
        assert!(kinds.contains(&Kind::UnboundedInt));
        assert!(kinds.contains(&Kind::Float));
        assert!(kinds.contains(&Kind::Uninterpreted(UninterpretedSort::opaque("Q"))));
    }

    #[test]
    fn kinds_follow_direct_field_edits() {
        let mut p = Problem::new(
            QueryMode::Satisfiability,
            bool_out(),
            SolverConfig::new(SolverKind::Z3),
        );
        p.inputs.push(NamedSymVar::exists(SymRef::new(0, Kind::Real), "r"));
        p.constants.push((SymRef::new(1, Kind::Double), ConstantValue::Double(0.5)));
        assert!(p.kinds().contains(&Kind::Real));
        assert!(p.kinds().contains(&Kind::Double));

        p.inputs.clear();
        assert!(!p.kinds().contains(&Kind::Real));

        p.note_kind(Kind::Float);
        assert!(p.kinds().contains(&Kind::Float));
    }

    #[test]
    fn free_and_bound_inputs_follow_mode() {
        let mut p = Problem::new(
            QueryMode::Satisfiability,
            bool_out(),
            SolverConfig::new(SolverKind::Z3),
        );
        p.add_input(NamedSymVar::exists(SymRef::new(0, Kind::unsigned(8)), "x"));
        p.add_input(NamedSymVar::forall(SymRef::new(1, Kind::unsigned(8)), "y"));

        let free: Vec<_> = p.free_inputs().map(|v| v.name.as_str()).collect();
        let bound: Vec<_> = p.bound_inputs().map(|v| v.name.as_str()).collect();
        assert_eq!(free, vec!["x"]);
        assert_eq!(bound, vec!["y"]);

        p.mode = QueryMode::Validity;
        let free: Vec<_> = p.free_inputs().map(|v| v.name.as_str()).collect();
        assert_eq!(free, vec!["y"]);
    }

    #[test]
    fn table_and_array_names() {
        let t = Table {
            id: 2,
            index: Kind::unsigned(8),
            element: Kind::unsigned(8),
            entries: vec![],
        };
        assert_eq!(t.name(), "table2");
        let a = ArrayDecl {
            id: 1,
            index: Kind::unsigned(8),
            element: Kind::unsigned(8),
            initial: None,
        };
        assert_eq!(a.name(), "array_1");
    }
}
