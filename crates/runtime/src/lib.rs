//! Asynchronous orchestration of item usage.
//!
//! The `runtime` crate drives the ability-use workflow on top of the pure
//! decisions in `rules-core`: it collects the player's configuration through
//! a [`providers::ChoiceProvider`], persists planned mutations through a
//! [`providers::EntityGateway`], rolls through the host's formula evaluator,
//! and signals area placement to a [`providers::TemplatePlacer`]. The
//! structured [`report::UsageReport`] it produces is what the host chat/UI
//! layer renders.
pub mod error;
pub mod providers;
pub mod report;
pub mod workflow;

pub use error::{GatewayError, WorkflowError};
pub use providers::{ChoiceProvider, EntityGateway, MemoryGateway, TemplatePlacer, UsageChoice};
pub use report::{
    AbortReason, ConsumedResource, RollSummary, SaveSummary, UsageOutcome, UsageReport,
};
pub use workflow::{UsageOptions, UsageWorkflow, consume_resource, roll_recharge};
