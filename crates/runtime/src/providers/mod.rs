//! Provider traits for the external collaborators the workflow suspends on.
//!
//! The host system implements these against its own UI and persistence; the
//! [`memory`] module ships an in-memory gateway used by the integration
//! tests and by offline tooling.

pub mod memory;

pub use memory::MemoryGateway;

use async_trait::async_trait;
use rules_core::{AreaRequest, Item, StateUpdate};

use crate::error::GatewayError;

/// A player's answers from the usage-configuration dialog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UsageChoice {
    /// Spend the recharge / limited use.
    pub consume: bool,

    /// Place the item's area template on the scene.
    pub place_area: bool,
}

impl Default for UsageChoice {
    fn default() -> Self {
        Self {
            consume: true,
            place_area: false,
        }
    }
}

/// Collects the usage configuration from the player.
///
/// There is no timeout: a stalled dialog stalls the workflow, which is
/// acceptable because it is blocked on a human decision.
#[async_trait]
pub trait ChoiceProvider: Send + Sync {
    /// Returns the player's choice, or `None` if the dialog was dismissed.
    async fn collect_usage_choice(&self, item: &Item) -> Option<UsageChoice>;
}

/// Persists planned state updates.
///
/// Each call is atomic on the host side; there is no cross-call transaction.
#[async_trait]
pub trait EntityGateway: Send + Sync {
    async fn apply(&self, update: StateUpdate) -> Result<(), GatewayError>;
}

/// Places an area-effect template on the scene.
///
/// Fire-and-forget: the workflow does not wait for placement to finish.
pub trait TemplatePlacer: Send + Sync {
    fn place_area_effect(&self, item: &Item, request: AreaRequest);
}
