//! The binary d6 recharge check.
//!
//! A single atomic check per recharge cycle: one d6 against the item's
//! threshold. The roll result and success flag are always reported; only a
//! success re-enables the ability. Rolling the die itself happens through
//! the external evaluator - this module only decides.

use crate::error::{ErrorSeverity, RulesError};
use crate::item::{Item, ItemId};
use crate::mutation::StateUpdate;

/// Result of a recharge check.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RechargeOutcome {
    pub item: ItemId,

    /// The d6 result.
    pub roll: u32,

    /// Whether the roll met the threshold.
    pub recharged: bool,
}

impl RechargeOutcome {
    /// The persisted flag change, present only on success (a failed check
    /// leaves the charged flag untouched).
    pub fn update(&self) -> Option<StateUpdate> {
        self.recharged.then_some(StateUpdate::ItemRecharge {
            item: self.item,
            charged: true,
        })
    }
}

/// Errors raised by recharge checks.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RechargeError {
    /// The item has no recharge threshold configured.
    #[error("\"{name}\" has no recharge value")]
    NotConfigured { name: String },
}

impl RulesError for RechargeError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotConfigured { .. } => "RECHARGE_NOT_CONFIGURED",
        }
    }
}

/// Decides a recharge check from a rolled d6 result.
///
/// # Errors
///
/// [`RechargeError::NotConfigured`] if the item has no recharge threshold.
pub fn resolve_recharge(item: &Item, roll: u32) -> Result<RechargeOutcome, RechargeError> {
    let Some(recharge) = &item.usage.recharge else {
        return Err(RechargeError::NotConfigured {
            name: item.name.clone(),
        });
    };

    Ok(RechargeOutcome {
        item: item.id,
        roll,
        recharged: roll >= u32::from(recharge.threshold),
    })
}
