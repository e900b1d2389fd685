use thiserror::Error;

/// Errors raised while gating, encoding, or decoding solver traffic.
///
/// Every variant is fatal for the call that produced it. Replies the
/// classifier does not recognize are not errors; they become
/// [`SolverResult::ProofError`](crate::result::SolverResult::ProofError).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolverError {
    /// The problem needs a feature the solver's capability table denies.
    #[error("the chosen solver ({solver}) does not support {feature}")]
    UnsupportedFeature { solver: String, feature: String },

    /// One or more optimization objectives range over universally
    /// quantified inputs.
    #[error(
        "the chosen solver ({solver}) does not support optimization of universally quantified metric(s): {}",
        .objectives.join(", ")
    )]
    UnsupportedOptimization {
        solver: String,
        objectives: Vec<String>,
    },

    /// The problem descriptor is internally inconsistent.
    #[error("invalid problem: {0}")]
    InvalidProblem(String),

    /// A solver reply line is not a well-formed s-expression.
    #[error("cannot parse solver output line {line:?}: {reason}")]
    Syntax { line: String, reason: String },

    /// A reference in a reply matches more than one declared input.
    #[error("cannot uniquely identify value for {reference} in {line:?}; candidates: {}", .matches.join(", "))]
    AmbiguousReference {
        reference: String,
        line: String,
        matches: Vec<String>,
    },

    /// A value bound to a declared input has a shape no extraction rule
    /// accepts.
    #[error("cannot extract value for {name} from {line:?}; unmatched: {subtree}")]
    UnmatchedValue {
        name: String,
        line: String,
        subtree: String,
    },

    /// A value has the right shape but is not valid for its input's kind.
    #[error("invalid value for {name} in {line:?}: {reason}")]
    InvalidValue {
        name: String,
        line: String,
        reason: String,
    },

    /// An item of an `(objectives ...)` reply matches no objective form.
    #[error("cannot extract objective value from {line:?}; parsed: {parsed}; item: {item}")]
    UnmatchedObjective {
        line: String,
        parsed: String,
        item: String,
    },

    /// An objectives reply is not headed by `objectives`.
    #[error("malformed objectives reply {line:?}; parsed: {parsed}")]
    MalformedObjectives { line: String, parsed: String },

    /// Solver name not recognized.
    #[error("unknown solver: {0}. Valid options: z3, cvc5, yices, boolector, mathsat, abc")]
    UnknownSolver(String),

    /// A capability table or configuration could not be loaded.
    #[error("invalid solver configuration: {0}")]
    InvalidConfig(String),
}
