use std::fmt;

use crate::extract::Binding;
use crate::objective::ObjectiveBinding;
use crate::value::{ConstantValue, GeneralizedValue};

/// A model decoded from a `sat` or `unknown` reply.
///
/// Bindings are kept in reply order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Model {
    pub bindings: Vec<Binding>,
    /// Optimal values, when the reply carried an `(objectives ...)` line.
    pub objectives: Vec<ObjectiveBinding>,
}

impl Model {
    /// Create a new empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a model from decoded bindings.
    pub fn with_bindings(bindings: Vec<Binding>) -> Self {
        Self {
            bindings,
            objectives: Vec::new(),
        }
    }

    /// Look up an input's value by its user-facing name.
    pub fn get(&self, name: &str) -> Option<&ConstantValue> {
        self.bindings
            .iter()
            .find(|b| b.name == name)
            .map(|b| &b.value)
    }

    /// Look up an objective's optimal value by name.
    pub fn objective(&self, name: &str) -> Option<&GeneralizedValue> {
        self.objectives
            .iter()
            .find(|o| o.name == name)
            .map(|o| &o.value)
    }

    /// Return the number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Return whether the model has no bindings.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.bindings {
            writeln!(f, "{} = {} :: {}", b.name, b.value, b.value.kind())?;
        }
        for o in &self.objectives {
            writeln!(f, "{} = {} :: {}", o.name, o.value, o.value.kind())?;
        }
        Ok(())
    }
}
