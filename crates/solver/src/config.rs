use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SolverError;

/// Supported SMT solver backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolverKind {
    /// Z3 from Microsoft Research.
    Z3,
    /// CVC5 from Stanford/Iowa.
    Cvc5,
    /// Yices2 from SRI International.
    Yices,
    Boolector,
    MathSat,
    /// ABC from Berkeley.
    Abc,
}

impl SolverKind {
    /// Built-in capability table for this solver.
    pub fn capabilities(&self) -> SolverCapabilities {
        let name = self.to_string();
        match self {
            SolverKind::Z3 => SolverCapabilities {
                name,
                supports_unbounded_ints: true,
                supports_reals: true,
                supports_floats: true,
                supports_doubles: true,
                supports_quantifiers: true,
                supports_uninterpreted_sorts: true,
                supports_optimization: true,
            },
            SolverKind::Cvc5 => SolverCapabilities {
                name,
                supports_unbounded_ints: true,
                supports_reals: true,
                supports_floats: true,
                supports_doubles: true,
                supports_quantifiers: true,
                supports_uninterpreted_sorts: true,
                supports_optimization: false,
            },
            SolverKind::Yices => SolverCapabilities {
                name,
                supports_unbounded_ints: true,
                supports_reals: true,
                supports_uninterpreted_sorts: true,
                ..SolverCapabilities::none(self.to_string())
            },
            SolverKind::Boolector => SolverCapabilities::none(name),
            SolverKind::MathSat => SolverCapabilities {
                name,
                supports_unbounded_ints: true,
                supports_reals: true,
                supports_floats: true,
                supports_doubles: true,
                supports_uninterpreted_sorts: true,
                ..SolverCapabilities::none(self.to_string())
            },
            SolverKind::Abc => SolverCapabilities::none(name),
        }
    }
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverKind::Z3 => write!(f, "Z3"),
            SolverKind::Cvc5 => write!(f, "CVC5"),
            SolverKind::Yices => write!(f, "Yices"),
            SolverKind::Boolector => write!(f, "Boolector"),
            SolverKind::MathSat => write!(f, "MathSAT"),
            SolverKind::Abc => write!(f, "ABC"),
        }
    }
}

impl std::str::FromStr for SolverKind {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "z3" => Ok(SolverKind::Z3),
            "cvc5" => Ok(SolverKind::Cvc5),
            "yices" | "yices2" | "yices-smt2" => Ok(SolverKind::Yices),
            "boolector" => Ok(SolverKind::Boolector),
            "mathsat" | "mathsat5" => Ok(SolverKind::MathSat),
            "abc" => Ok(SolverKind::Abc),
            _ => Err(SolverError::UnknownSolver(s.to_string())),
        }
    }
}

/// Declared feature support of a solver. Trusted as-is; nothing here
/// probes the installed binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverCapabilities {
    /// Display name used in diagnostics.
    pub name: String,
    #[serde(default)]
    pub supports_unbounded_ints: bool,
    #[serde(default)]
    pub supports_reals: bool,
    /// IEEE 754 single precision.
    #[serde(default)]
    pub supports_floats: bool,
    /// IEEE 754 double precision.
    #[serde(default)]
    pub supports_doubles: bool,
    #[serde(default)]
    pub supports_quantifiers: bool,
    #[serde(default)]
    pub supports_uninterpreted_sorts: bool,
    #[serde(default)]
    pub supports_optimization: bool,
}

impl SolverCapabilities {
    /// A table that only admits bit-vector problems.
    pub fn none(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            supports_unbounded_ints: false,
            supports_reals: false,
            supports_floats: false,
            supports_doubles: false,
            supports_quantifiers: false,
            supports_uninterpreted_sorts: false,
            supports_optimization: false,
        }
    }

    /// Load a capability table from JSON. Missing flags default to `false`.
    pub fn from_json(text: &str) -> Result<Self, SolverError> {
        serde_json::from_str(text).map_err(|e| SolverError::InvalidConfig(e.to_string()))
    }
}

/// Encoding configuration for one target solver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Which solver to target.
    pub kind: SolverKind,
    /// Capability table consulted by the gate.
    pub capabilities: SolverCapabilities,
    /// Explicit `set-logic`; derived from the problem when absent.
    #[serde(default)]
    pub logic: Option<String>,
    /// Additional `(set-option :key value)` pairs, emitted in order.
    #[serde(default)]
    pub options: Vec<(String, String)>,
    /// Emit the problem's comments at the top of the preamble.
    #[serde(default = "default_emit_comments")]
    pub emit_comments: bool,
}

fn default_emit_comments() -> bool {
    true
}

impl SolverConfig {
    /// Config for `kind` with its built-in capability table.
    pub fn new(kind: SolverKind) -> Self {
        Self {
            kind,
            capabilities: kind.capabilities(),
            logic: None,
            options: Vec::new(),
            emit_comments: default_emit_comments(),
        }
    }

    /// Replace the capability table.
    pub fn with_capabilities(mut self, capabilities: SolverCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Force a specific logic instead of deriving one.
    pub fn with_logic(mut self, logic: impl Into<String>) -> Self {
        self.logic = Some(logic.into());
        self
    }

    /// Add an extra solver option.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.push((key.into(), value.into()));
        self
    }

    pub fn with_comments(mut self, emit: bool) -> Self {
        self.emit_comments = emit;
        self
    }

    /// Load a full configuration from JSON.
    pub fn from_json(text: &str) -> Result<Self, SolverError> {
        serde_json::from_str(text).map_err(|e| SolverError::InvalidConfig(e.to_string()))
    }
}
