use crate::model::Model;

/// Outcome of one solver query.
#[derive(Debug, Clone, PartialEq)]
pub enum SolverResult {
    /// No assignment satisfies the query (in validity mode: the claim holds).
    Unsat,
    /// The solver gave up; the model is whatever it reported anyway.
    Unknown(Model),
    /// Satisfiable, with a model for the free inputs.
    Sat(Model),
    /// The solver reported a timeout.
    Timeout,
    /// The reply was not a recognized verdict. Carries the raw lines.
    ProofError(Vec<String>),
}

impl SolverResult {
    /// Returns `true` if the result is `Sat`.
    pub fn is_sat(&self) -> bool {
        matches!(self, SolverResult::Sat(_))
    }

    /// Returns `true` if the result is `Unsat`.
    pub fn is_unsat(&self) -> bool {
        matches!(self, SolverResult::Unsat)
    }

    /// Returns `true` if the result is `Unknown`.
    pub fn is_unknown(&self) -> bool {
        matches!(self, SolverResult::Unknown(_))
    }

    /// Returns the model of a `Sat` or `Unknown` result.
    pub fn model(&self) -> Option<&Model> {
        match self {
            SolverResult::Sat(model) | SolverResult::Unknown(model) => Some(model),
            _ => None,
        }
    }
}
