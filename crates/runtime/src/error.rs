//! Workflow error taxonomy.
//!
//! Fatal configuration errors (wrong-kind capability queries, malformed
//! scaling or save data) and unexpected failures (evaluator errors, gateway
//! failures) surface here and propagate to the workflow caller uncaught.
//! Recoverable conditions - a player cancelling, a resource shortfall - are
//! not errors; they are reported as aborted outcomes instead.

use rules_core::consume::ConsumeError;
use rules_core::item::CapabilityError;
use rules_core::recharge::RechargeError;
use rules_core::save::SaveDcError;
use rules_core::{AreaError, EvalError, RollError};

/// Failure to persist a state update through the host gateway.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("failed to persist state update: {message}")]
pub struct GatewayError {
    pub message: String,
}

impl GatewayError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors that escape a workflow invocation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Capability(#[from] CapabilityError),

    #[error(transparent)]
    SaveDc(#[from] SaveDcError),

    #[error(transparent)]
    Roll(#[from] RollError),

    #[error(transparent)]
    Consume(#[from] ConsumeError),

    #[error(transparent)]
    Recharge(#[from] RechargeError),

    #[error(transparent)]
    Area(#[from] AreaError),

    #[error(transparent)]
    Evaluation(#[from] EvalError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
