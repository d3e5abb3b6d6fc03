//! Resource-consumption planning.
//!
//! The pure half of resource consumption: validate that the resource an item
//! usage requires is configured and sufficient, and produce the
//! [`StateUpdate`] that deducts it. Persisting the update is the host's job
//! (see the runtime crate), which keeps this logic unit-testable without any
//! I/O stand-ins.
//!
//! # Phase gating
//!
//! Ammunition is consumed in the pre-attack phase; every other kind in the
//! pre-card phase. A call in the non-matching phase is a no-op success, not
//! an error - callers invoke the planner at both points unconditionally.
//!
//! # Failure atomicity
//!
//! Planning either fails (and nothing was deducted, because planning writes
//! nothing) or yields a single update. Sufficiency is checked before the
//! update is produced, so a shortfall can never partially consume.

use crate::actor::{ActorState, AttributeRef};
use crate::error::{ErrorSeverity, RulesError};
use crate::item::{ConsumeKind, ConsumeProfile, ConsumeTarget, Item, ItemKind};
use crate::mutation::StateUpdate;

// ============================================================================
// Phases & Plans
// ============================================================================

/// The two points of a usage at which consumption runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ConsumePhase {
    /// Immediately before the attack roll.
    Attack,

    /// Immediately before the usage card is played.
    Card,
}

/// A validated deduction, ready to persist.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ConsumptionPlan {
    pub kind: ConsumeKind,

    /// Display name of the consumed source (attribute name or item name).
    pub source: String,

    pub amount: u32,

    /// Value the source is left at after deduction (floored at 0).
    pub remaining: u32,

    /// The field change that commits the deduction.
    pub update: StateUpdate,

    /// The ammunition item consumed, if any - its damage rides along on the
    /// damage roll.
    pub ammo: Option<crate::item::ItemId>,
}

// ============================================================================
// Errors
// ============================================================================

/// Recoverable consumption failures. Each aborts the usage cleanly with no
/// mutation from the failing step. Serializable so aborted outcomes can be
/// handed to the host UI as-is.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error, serde::Serialize, serde::Deserialize)]
pub enum ConsumeError {
    /// A consumption kind is declared but no target reference is configured.
    #[error("\"{name}\" consumes {kind} but no target is configured")]
    MissingConsumeTarget { name: String, kind: ConsumeKind },

    /// The configured target reference cannot be resolved on the actor.
    #[error("\"{name}\" consumes {kind} but the target cannot be resolved")]
    ConsumeTargetNotFound { name: String, kind: ConsumeKind },

    /// The target resolves but holds less than the required amount.
    #[error(
        "\"{name}\" requires {amount} {kind} but only {available} remain on {source_name}"
    )]
    InsufficientResource {
        name: String,
        kind: ConsumeKind,
        source_name: String,
        available: u32,
        amount: u32,
    },
}

impl RulesError for ConsumeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::MissingConsumeTarget { .. } | Self::ConsumeTargetNotFound { .. } => {
                ErrorSeverity::Validation
            }
            Self::InsufficientResource { .. } => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingConsumeTarget { .. } => "CONSUME_MISSING_TARGET",
            Self::ConsumeTargetNotFound { .. } => "CONSUME_TARGET_NOT_FOUND",
            Self::InsufficientResource { .. } => "CONSUME_INSUFFICIENT_RESOURCE",
        }
    }
}

// ============================================================================
// Planning
// ============================================================================

/// The consumption an item usage actually performs.
///
/// A declared profile always wins. A superpower that declares nothing pays
/// its effective cost from the pool its power family draws from.
pub fn effective_consume(item: &Item) -> Option<ConsumeProfile> {
    if let Some(consume) = &item.usage.consume {
        return Some(consume.clone());
    }

    match &item.kind {
        ItemKind::Superpower(data) => {
            let pool = data.power_type.pool();
            Some(ConsumeProfile::new(
                ConsumeKind::Attribute,
                ConsumeTarget::Attribute(AttributeRef::from_pool(pool)),
                data.effective_cost(),
            ))
        }
        _ => None,
    }
}

/// Validates and plans the resource deduction for one usage phase.
///
/// Returns `Ok(None)` when the item consumes nothing, when the phase does
/// not match the consumption kind, or when the amount is zero.
///
/// # Errors
///
/// See [`ConsumeError`]. No state is touched on any error path.
pub fn plan_consumption(
    item: &Item,
    actor: &ActorState,
    phase: ConsumePhase,
) -> Result<Option<ConsumptionPlan>, ConsumeError> {
    let Some(consume) = effective_consume(item) else {
        return Ok(None);
    };

    // Ammunition is deducted when the attack is rolled; everything else when
    // the card is played.
    let expected_phase = match consume.kind {
        ConsumeKind::Ammunition => ConsumePhase::Attack,
        _ => ConsumePhase::Card,
    };
    if phase != expected_phase {
        return Ok(None);
    }

    if consume.amount == 0 {
        return Ok(None);
    }

    let Some(target) = consume.target else {
        return Err(ConsumeError::MissingConsumeTarget {
            name: item.name.clone(),
            kind: consume.kind,
        });
    };

    let not_found = || ConsumeError::ConsumeTargetNotFound {
        name: item.name.clone(),
        kind: consume.kind,
    };

    // Resolve the target to a display name, its current value, and which
    // field the deduction lands on.
    enum Source {
        Attribute(AttributeRef),
        Quantity(crate::item::ItemId),
        Uses(crate::item::ItemId),
    }

    let (source_name, current, source) = match (consume.kind, target) {
        (ConsumeKind::Attribute, ConsumeTarget::Attribute(attribute)) => (
            attribute.to_string(),
            actor.attribute(attribute),
            Source::Attribute(attribute),
        ),
        (ConsumeKind::Ammunition | ConsumeKind::Material, ConsumeTarget::Item(id)) => {
            let consumed = actor.item(id).ok_or_else(not_found)?;
            (
                consumed.name.clone(),
                consumed.usage.quantity,
                Source::Quantity(id),
            )
        }
        (ConsumeKind::Charges, ConsumeTarget::Item(id)) => {
            let consumed = actor.item(id).ok_or_else(not_found)?;
            let current = consumed.usage.uses.as_ref().map_or(0, |uses| uses.value);
            (consumed.name.clone(), current, Source::Uses(id))
        }
        // Kind/target mismatch (an attribute kind pointing at an item, or
        // vice versa) cannot be resolved.
        _ => return Err(not_found()),
    };

    if current < consume.amount {
        return Err(ConsumeError::InsufficientResource {
            name: item.name.clone(),
            kind: consume.kind,
            source_name,
            available: current,
            amount: consume.amount,
        });
    }

    let remaining = current.saturating_sub(consume.amount);
    let (update, ammo) = match source {
        Source::Attribute(attribute) => (
            StateUpdate::ActorAttribute {
                attribute,
                value: remaining,
            },
            None,
        ),
        Source::Quantity(id) => (
            StateUpdate::ItemQuantity {
                item: id,
                quantity: remaining,
            },
            (consume.kind == ConsumeKind::Ammunition).then_some(id),
        ),
        Source::Uses(id) => (
            StateUpdate::ItemUses {
                item: id,
                value: remaining,
            },
            None,
        ),
    };

    Ok(Some(ConsumptionPlan {
        kind: consume.kind,
        source: source_name,
        amount: consume.amount,
        remaining,
        update,
        ammo,
    }))
}
