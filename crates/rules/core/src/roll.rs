//! Roll composition.
//!
//! Builds the ordered term sequence and variable context for the rolls an
//! item can make: attack, damage, tool check, and the free-form "other"
//! formula. Terms join with `+` into one expression the external
//! [`crate::env::FormulaEvaluator`] can evaluate; every variable a term
//! references is present in the accompanying [`RollContext`].

use std::collections::BTreeMap;

use crate::actor::ActorState;
use crate::config::RulesConfig;
use crate::error::{ErrorSeverity, RulesError};
use crate::item::{ability_modifier, CapabilityError, Item, ItemKind};
use crate::scaling::{ScalingError, scale_superpower_damage};

// ============================================================================
// Roll Context
// ============================================================================

/// A value bound to a roll variable.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ContextValue {
    Number(i64),

    /// A formula fragment substituted textually (e.g. the joined attack
    /// bonus, or ammunition damage).
    Formula(String),
}

/// Variable bindings for one composed roll.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RollContext {
    pub values: BTreeMap<String, ContextValue>,
}

impl RollContext {
    pub fn insert_number(&mut self, key: impl Into<String>, value: i64) {
        self.values.insert(key.into(), ContextValue::Number(value));
    }

    pub fn insert_formula(&mut self, key: impl Into<String>, formula: impl Into<String>) {
        self.values
            .insert(key.into(), ContextValue::Formula(formula.into()));
    }

    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.values.get(key)
    }
}

/// What a composed roll is for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum RollKind {
    Attack,
    Damage,
    ToolCheck,
    Other,
}

/// A fully composed roll: ordered parts, the context they reference, and a
/// display flavor line.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RollSpec {
    pub kind: RollKind,
    pub parts: Vec<String>,
    pub context: RollContext,
    pub flavor: String,
}

impl RollSpec {
    /// The complete expression handed to the evaluator.
    pub fn formula(&self) -> String {
        self.parts.join(" + ")
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Errors raised while composing a roll.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RollError {
    /// The item's action type does not include an attack roll.
    #[error("\"{name}\" cannot make an attack roll")]
    NoAttack { name: String },

    /// The item has no damage parts to roll.
    #[error("\"{name}\" cannot make a damage roll")]
    NoDamage { name: String },

    /// Tool checks are only possible for tool items.
    #[error("\"{name}\" is not a tool")]
    NotATool { name: String },

    /// The item declares no free-form formula.
    #[error("\"{name}\" has no formula to roll")]
    NoFormula { name: String },

    #[error(transparent)]
    Capability(#[from] CapabilityError),

    #[error(transparent)]
    Scaling(#[from] ScalingError),
}

impl RulesError for RollError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Capability(err) => err.severity(),
            Self::Scaling(err) => err.severity(),
            _ => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NoAttack { .. } => "ROLL_NO_ATTACK",
            Self::NoDamage { .. } => "ROLL_NO_DAMAGE",
            Self::NotATool { .. } => "ROLL_NOT_A_TOOL",
            Self::NoFormula { .. } => "ROLL_NO_FORMULA",
            Self::Capability(err) => err.error_code(),
            Self::Scaling(err) => err.error_code(),
        }
    }
}

// ============================================================================
// Roll Data
// ============================================================================

/// Assembles the base variable context shared by every roll an item makes:
/// per-ability modifiers, `mod` (the resolved ability), `prof` (proficiency
/// scaled by the item's proficiency multiplier), and the item's effective
/// cost for formulas that reference it.
pub fn roll_data(item: &Item, actor: &ActorState) -> Result<RollContext, CapabilityError> {
    use strum::IntoEnumIterator;

    let mut context = RollContext::default();

    for ability in crate::actor::Ability::iter() {
        context.insert_number(ability.to_string(), i64::from(actor.abilities.get(ability)));
    }

    if let Some(ability) = ability_modifier(item, Some(actor))? {
        context.insert_number("mod", actor.abilities.get(ability) as i64);
    } else {
        context.insert_number("mod", 0);
    }

    let proficiency_multiplier = match &item.kind {
        ItemKind::Weapon(weapon) => u32::from(weapon.proficient),
        ItemKind::Tool(tool) => tool.proficiency,
        _ => 1,
    };
    context.insert_number(
        "prof",
        i64::from(proficiency_multiplier) * i64::from(actor.proficiency),
    );

    if let Some(data) = item.as_superpower() {
        context.insert_number("item.effectiveCost", i64::from(data.effective_cost()));
    }

    Ok(context)
}

// ============================================================================
// Composition
// ============================================================================

/// Composes the attack roll for an item.
///
/// Terms: the d20, the ability modifier, proficiency (unless the item is a
/// non-proficient weapon), and an attack-bonus term when the item or the
/// actor's per-action-type bonus table contributes one (the fragments join
/// with `+`, non-empty parts only).
pub fn compose_attack_roll(item: &Item, actor: &ActorState) -> Result<RollSpec, RollError> {
    if !item.usage.action_type.is_attack() {
        return Err(RollError::NoAttack {
            name: item.name.clone(),
        });
    }

    let mut context = roll_data(item, actor)?;
    let mut parts = vec!["1d20".to_string(), "@mod".to_string()];

    let proficient = match &item.kind {
        ItemKind::Weapon(weapon) => weapon.proficient,
        _ => true,
    };
    if proficient {
        parts.push("@prof".to_string());
    }

    let actor_bonus = actor
        .bonuses_for(item.usage.action_type)
        .and_then(|bonuses| bonuses.attack.as_deref());
    let fragments: Vec<&str> = [item.usage.attack_bonus.as_deref(), actor_bonus]
        .into_iter()
        .flatten()
        .filter(|fragment| !fragment.trim().is_empty())
        .collect();
    if !fragments.is_empty() {
        parts.push("@atk".to_string());
        context.insert_formula("atk", fragments.join(" + "));
    }

    Ok(RollSpec {
        kind: RollKind::Attack,
        parts,
        context,
        flavor: format!("{} - Attack Roll", item.name),
    })
}

/// Composes the damage roll for an item.
///
/// The item's damage parts (scaled per the superpower's scaling mode), the
/// actor's per-action-type damage bonus when nonzero, and finally the
/// consumed ammunition's damage, flavor-annotated with the ammunition name.
pub fn compose_damage_roll(
    item: &Item,
    actor: &ActorState,
    spent_cost_override: Option<u32>,
    ammo: Option<&Item>,
    config: &RulesConfig,
) -> Result<RollSpec, RollError> {
    if item.usage.damage.is_empty() {
        return Err(RollError::NoDamage {
            name: item.name.clone(),
        });
    }

    let mut context = roll_data(item, actor)?;
    let mut parts: Vec<String> = item
        .usage
        .damage
        .iter()
        .map(|part| part.formula.clone())
        .collect();

    if let Some(data) = item.as_superpower() {
        scale_superpower_damage(&mut parts, data, actor.level, spent_cost_override, config)?;
        if let Some(spent) = spent_cost_override {
            context.insert_number("item.effectiveCost", i64::from(spent.max(data.cost)));
        }
    }

    if let Some(bonus) = actor
        .bonuses_for(item.usage.action_type)
        .and_then(|bonuses| bonuses.damage.as_deref())
    {
        let trimmed = bonus.trim();
        // Keep formula bonuses and nonzero constants; drop empty and "0".
        if !trimmed.is_empty() && trimmed.parse::<i64>() != Ok(0) {
            parts.push(trimmed.to_string());
        }
    }

    let types: Vec<String> = item
        .usage
        .damage
        .iter()
        .map(|part| part.damage_type.to_string())
        .collect();
    let mut flavor = format!("{} - Damage Roll ({})", item.name, types.join(", "));

    if let Some(ammo) = ammo {
        let ammo_damage: Vec<&str> = ammo
            .usage
            .damage
            .iter()
            .map(|part| part.formula.as_str())
            .collect();
        if !ammo_damage.is_empty() {
            parts.push("@ammo".to_string());
            context.insert_formula("ammo", ammo_damage.join("+"));
            flavor.push_str(&format!(" [{}]", ammo.name));
        }
    }

    Ok(RollSpec {
        kind: RollKind::Damage,
        parts,
        context,
        flavor,
    })
}

/// Composes a tool check: d20 + ability modifier + proficiency.
pub fn compose_tool_check(item: &Item, actor: &ActorState) -> Result<RollSpec, RollError> {
    if !matches!(item.kind, ItemKind::Tool(_)) {
        return Err(RollError::NotATool {
            name: item.name.clone(),
        });
    }

    let context = roll_data(item, actor)?;
    Ok(RollSpec {
        kind: RollKind::ToolCheck,
        parts: vec![
            "1d20".to_string(),
            "@mod".to_string(),
            "@prof".to_string(),
        ],
        context,
        flavor: format!("{} - Tool Check", item.name),
    })
}

/// Composes the item's free-form "other" formula roll.
pub fn compose_other_formula(item: &Item, actor: &ActorState) -> Result<RollSpec, RollError> {
    let Some(formula) = &item.usage.other_formula else {
        return Err(RollError::NoFormula {
            name: item.name.clone(),
        });
    };

    let context = roll_data(item, actor)?;
    Ok(RollSpec {
        kind: RollKind::Other,
        parts: vec![formula.clone()],
        context,
        flavor: format!("{} - Other Formula", item.name),
    })
}
