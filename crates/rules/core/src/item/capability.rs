//! Item capability classification.
//!
//! Pure functions of item data. [`classify`] derives the flag set that
//! drives the ability-use workflow; [`ability_modifier`] resolves which
//! ability key feeds the item's rolls.
//!
//! Power-family predicates (`is_spell` and friends) fail loudly when asked
//! about a non-superpower: that query indicates malformed caller logic, not
//! a recoverable condition.

use crate::actor::{ActorState, Ability};
use crate::config::RulesConfig;
use crate::error::{ErrorSeverity, RulesError};

use super::{Item, ItemKind, PowerType};

bitflags::bitflags! {
    /// Capability flags derived from an item's declarative data.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Capabilities: u16 {
        /// Usage includes an attack roll.
        const ATTACK = 1 << 0;
        /// Usage includes a damage roll.
        const DAMAGE = 1 << 1;
        /// Usage lists non-damage effect parts.
        const EFFECTS = 1 << 2;
        /// Damage pipeline delivers healing instead.
        const HEALING = 1 << 3;
        /// Usage forces a saving throw.
        const SAVE = 1 << 4;
        /// A target specification exists.
        const TARGET = 1 << 5;
        /// The target is an area shape that can be placed on the scene.
        const PLACEABLE_AREA = 1 << 6;
    }
}

// Flags serialize in the human-readable `"ATTACK | DAMAGE"` form.
impl serde::Serialize for Capabilities {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        bitflags::serde::serialize(self, serializer)
    }
}

impl<'de> serde::Deserialize<'de> for Capabilities {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        bitflags::serde::deserialize(deserializer)
    }
}

/// Derives the capability flag set for an item.
pub fn classify(item: &Item) -> Capabilities {
    let usage = &item.usage;
    let mut caps = Capabilities::empty();

    if usage.action_type.is_attack() {
        caps |= Capabilities::ATTACK;
    }
    if !usage.damage.is_empty() {
        caps |= Capabilities::DAMAGE;
        if usage.action_type == super::ActionType::Heal {
            caps |= Capabilities::HEALING;
        }
    }
    if !usage.effects.is_empty() {
        caps |= Capabilities::EFFECTS;
    }
    if usage.save.is_some() {
        caps |= Capabilities::SAVE;
    }
    if let Some(target) = &usage.target {
        if target.target_type != super::TargetType::None {
            caps |= Capabilities::TARGET;
        }
        if target.target_type.is_scaling_area() {
            caps |= Capabilities::PLACEABLE_AREA;
        }
    }

    caps
}

/// Errors raised by capability queries.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CapabilityError {
    /// A power-family predicate was queried on a non-superpower item.
    #[error("cannot check the power family of a {kind} (\"{name}\" is not a superpower)")]
    NotASuperpower {
        name: String,
        kind: &'static str,
    },
}

impl RulesError for CapabilityError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotASuperpower { .. } => "CAPABILITY_NOT_A_SUPERPOWER",
        }
    }
}

impl Item {
    /// The power family of a superpower item.
    ///
    /// # Errors
    ///
    /// Fails with [`CapabilityError::NotASuperpower`] for any other kind;
    /// callers asking a weapon whether it is a spell have a logic bug that
    /// must surface, not default.
    pub fn power_type(&self) -> Result<PowerType, CapabilityError> {
        match &self.kind {
            ItemKind::Superpower(data) => Ok(data.power_type),
            other => Err(CapabilityError::NotASuperpower {
                name: self.name.clone(),
                kind: other.label(),
            }),
        }
    }

    /// True if this superpower is a spell.
    pub fn is_spell(&self) -> Result<bool, CapabilityError> {
        Ok(self.power_type()? == PowerType::Spell)
    }

    /// True if this superpower is a maneuver.
    pub fn is_maneuver(&self) -> Result<bool, CapabilityError> {
        Ok(self.power_type()? == PowerType::Maneuver)
    }

    /// True if this superpower is a concoction.
    pub fn is_concoction(&self) -> Result<bool, CapabilityError> {
        Ok(self.power_type()? == PowerType::Concoction)
    }
}

/// Resolves the ability key used by this item's rolls.
///
/// Resolution order:
/// 1. an ability declared directly on the item;
/// 2. for superpowers, the actor's maneuver ability for maneuvers and the
///    spellcasting ability otherwise;
/// 3. for tools, the configured default ability;
/// 4. for melee weapons, strength - or the higher of strength/dexterity for
///    finesse weapons; for ranged weapons, dexterity;
/// 5. otherwise `None` (including every unowned item without a declared
///    ability - there is no actor to infer from).
pub fn ability_modifier(
    item: &Item,
    actor: Option<&ActorState>,
) -> Result<Option<Ability>, CapabilityError> {
    if let Some(ability) = item.usage.ability {
        return Ok(Some(ability));
    }

    let Some(actor) = actor else {
        return Ok(None);
    };

    let ability = match &item.kind {
        ItemKind::Superpower(_) => {
            if item.is_maneuver()? {
                Some(actor.maneuver_ability)
            } else {
                Some(actor.spellcasting_ability)
            }
        }
        ItemKind::Tool(_) => Some(RulesConfig::DEFAULT_TOOL_ABILITY),
        ItemKind::Weapon(weapon) => {
            if weapon.category.is_ranged() {
                Some(Ability::Dex)
            } else if weapon.finesse {
                // Finesse: whichever of Str/Dex is numerically higher.
                if actor.abilities.dex >= actor.abilities.str {
                    Some(Ability::Dex)
                } else {
                    Some(Ability::Str)
                }
            } else {
                Some(Ability::Str)
            }
        }
        _ => None,
    };

    Ok(ability)
}
