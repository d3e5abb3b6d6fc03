//! External capability boundaries.
//!
//! The core consumes a dice-expression evaluator but never implements one:
//! the host system owns parsing and rolling. The trait keeps the pure logic
//! testable against a deterministic stub.

use crate::roll::RollContext;

/// Evaluates a dice/arithmetic formula against a variable context.
///
/// Implementations must be deterministic given formula + context + their own
/// dice source; the breakdown they return is echoed into usage reports.
pub trait FormulaEvaluator: Send + Sync {
    /// Evaluates `formula`, substituting `@name` variables from `context`.
    ///
    /// # Errors
    ///
    /// [`EvalError`] for syntax errors or unresolved variables. Evaluation
    /// failures indicate malformed item data or a missing context binding
    /// and propagate to the workflow caller uncaught.
    fn evaluate(&self, formula: &str, context: &RollContext) -> Result<EvaluatedRoll, EvalError>;
}

/// Total plus per-term breakdown of one evaluated formula.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EvaluatedRoll {
    pub total: i64,
    pub terms: Vec<RolledTerm>,
}

/// One evaluated term of the breakdown.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RolledTerm {
    /// The term's source text (after variable substitution).
    pub expression: String,

    pub total: i64,

    /// Individual die results, empty for constant terms.
    pub rolls: Vec<u32>,
}

/// Formula evaluation failure.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("cannot evaluate \"{formula}\": {message}")]
pub struct EvalError {
    pub formula: String,
    pub message: String,
}

impl EvalError {
    pub fn new(formula: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            formula: formula.into(),
            message: message.into(),
        }
    }
}
