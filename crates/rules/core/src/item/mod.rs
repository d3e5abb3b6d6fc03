//! Item data model.
//!
//! # Design: Base + Kind Pattern
//!
//! - [`Item`] holds the fields every kind shares: identity plus the
//!   declarative [`UsageProfile`] (action type, damage, save, targeting,
//!   uses, recharge, consumption).
//! - [`ItemKind`] is a closed sum with one variant per kind, carrying only
//!   the fields meaningful to that kind. Kind dispatch replaces "does this
//!   field exist" checks in the classifier.
//!
//! Display data (descriptions, icons) belongs to the host sheet layer and
//! never enters the core.

mod capability;
mod usage;

pub use capability::{Capabilities, CapabilityError, ability_modifier, classify};
pub use usage::{
    ActionType, ConsumeKind, ConsumeProfile, ConsumeTarget, DamagePart, DamageType, LimitedUses,
    Recharge, SaveProfile, SaveScaling, SaveType, TargetProfile, TargetType, UsePeriod,
};

use crate::actor::PoolKind;

// ============================================================================
// Item
// ============================================================================

/// Identifier for an item within its owning actor's inventory (or a
/// standalone unowned item).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ItemId(pub u32);

/// An item held by an actor (or standing alone, unowned, with reduced
/// capability: no ability modifier, no actor-derived save DC).
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub usage: UsageProfile,
    pub kind: ItemKind,
}

impl Item {
    pub fn new(id: ItemId, name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            id,
            name: name.into(),
            usage: UsageProfile::default(),
            kind,
        }
    }

    /// Sets the usage profile (builder pattern).
    #[must_use]
    pub fn with_usage(mut self, usage: UsageProfile) -> Self {
        self.usage = usage;
        self
    }

    /// The superpower data, if this item is a superpower.
    pub fn as_superpower(&self) -> Option<&SuperpowerData> {
        match &self.kind {
            ItemKind::Superpower(data) => Some(data),
            _ => None,
        }
    }

    /// The weapon data, if this item is a weapon.
    pub fn as_weapon(&self) -> Option<&WeaponData> {
        match &self.kind {
            ItemKind::Weapon(data) => Some(data),
            _ => None,
        }
    }

    /// The resource a superpower draws from, or `None` for other kinds.
    pub fn main_pool(&self) -> Option<PoolKind> {
        self.as_superpower().map(|data| data.power_type.pool())
    }
}

/// Declarative usage data shared by every kind. See [`usage`] for the
/// individual pieces.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UsageProfile {
    #[serde(default)]
    pub action_type: ActionType,

    /// Item-declared ability override for rolls. When absent the classifier
    /// infers the ability from the kind and the owning actor.
    pub ability: Option<crate::actor::Ability>,

    /// Ordered damage sequence; the first part is the primary term eligible
    /// for die-merging when scaled.
    #[serde(default)]
    pub damage: Vec<DamagePart>,

    /// Ordered non-damage effect formulas (conditions, riders).
    #[serde(default)]
    pub effects: Vec<String>,

    /// Free-form formula for miscellaneous rolls.
    pub other_formula: Option<String>,

    /// Item-level attack bonus fragment.
    pub attack_bonus: Option<String>,

    pub save: Option<SaveProfile>,
    pub target: Option<TargetProfile>,
    pub uses: Option<LimitedUses>,
    pub recharge: Option<Recharge>,
    pub consume: Option<ConsumeProfile>,

    /// Stack size for physical items.
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

impl Default for UsageProfile {
    fn default() -> Self {
        Self {
            action_type: ActionType::None,
            ability: None,
            damage: Vec::new(),
            effects: Vec::new(),
            other_formula: None,
            attack_bonus: None,
            save: None,
            target: None,
            uses: None,
            recharge: None,
            consume: None,
            quantity: 1,
        }
    }
}

// ============================================================================
// Item Kinds
// ============================================================================

/// Item kind with kind-specific data.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Weapon(WeaponData),

    /// Spell, maneuver, or concoction - draws from one of the three actor
    /// resource pools.
    Superpower(SuperpowerData),

    /// Class or racial feature.
    Feature(FeatureData),

    /// Wearable equipment.
    Equipment(EquipmentData),

    /// Consumable item (potions, scrolls, ammunition).
    Consumable(ConsumableData),

    /// Tool used for ability checks.
    Tool(ToolData),

    /// Inert loot.
    Loot,
}

impl ItemKind {
    /// Short lowercase label for logs and error messages.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Weapon(_) => "weapon",
            Self::Superpower(_) => "superpower",
            Self::Feature(_) => "feature",
            Self::Equipment(_) => "equipment",
            Self::Consumable(_) => "consumable",
            Self::Tool(_) => "tool",
            Self::Loot => "loot",
        }
    }
}

/// Weapon-specific data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WeaponData {
    pub category: WeaponCategory,

    /// Finesse weapons use the higher of strength/dexterity.
    #[serde(default)]
    pub finesse: bool,

    /// Non-proficient weapons drop the proficiency term from attack rolls.
    #[serde(default = "default_proficient")]
    pub proficient: bool,
}

fn default_proficient() -> bool {
    true
}

/// Weapon training categories.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    strum::EnumString,
)]
pub enum WeaponCategory {
    #[serde(rename = "simpleM")]
    #[strum(serialize = "simpleM")]
    SimpleMelee,
    #[serde(rename = "martialM")]
    #[strum(serialize = "martialM")]
    MartialMelee,
    #[serde(rename = "simpleR")]
    #[strum(serialize = "simpleR")]
    SimpleRanged,
    #[serde(rename = "martialR")]
    #[strum(serialize = "martialR")]
    MartialRanged,
}

impl WeaponCategory {
    pub const fn is_melee(&self) -> bool {
        matches!(self, Self::SimpleMelee | Self::MartialMelee)
    }

    pub const fn is_ranged(&self) -> bool {
        matches!(self, Self::SimpleRanged | Self::MartialRanged)
    }
}

/// Superpower-specific data: the power family, its cost, and how its damage
/// scales with level or extra spend.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SuperpowerData {
    pub power_type: PowerType,

    /// Base (minimum) resource cost.
    pub cost: u32,

    /// Cost actually paid for the current invocation. Always >= `cost` when
    /// set; ignored by tiered scaling.
    pub spent_cost: Option<u32>,

    #[serde(default)]
    pub scaling: ScalingProfile,
}

impl SuperpowerData {
    pub fn new(power_type: PowerType, cost: u32) -> Self {
        Self {
            power_type,
            cost,
            spent_cost: None,
            scaling: ScalingProfile::default(),
        }
    }

    /// The cost paid for the current invocation, falling back to the base
    /// cost when nothing extra was spent.
    pub fn effective_cost(&self) -> u32 {
        self.spent_cost.unwrap_or(self.cost).max(self.cost)
    }
}

/// The three superpower families. Each draws from exactly one actor pool.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PowerType {
    Spell,
    Maneuver,
    Concoction,
}

impl PowerType {
    /// The resource pool this power family draws from.
    pub const fn pool(&self) -> PoolKind {
        match self {
            Self::Spell => PoolKind::Mana,
            Self::Maneuver => PoolKind::Stamina,
            Self::Concoction => PoolKind::Catalysts,
        }
    }
}

/// How a superpower's damage/effect formula grows.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ScalingProfile {
    #[serde(default)]
    pub mode: ScalingMode,

    /// The per-application scaling formula (e.g. `1d8`). Required for the
    /// augment/enhance modes; tiered scaling falls back to the item's own
    /// damage parts when absent.
    pub formula: Option<String>,
}

/// Scaling modes for superpowers.
///
/// Unknown mode strings fail loudly at the data edge; see
/// [`crate::scaling::ScalingError`] for the runtime-side errors.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    strum::EnumString,
)]
pub enum ScalingMode {
    /// No scaling.
    #[default]
    #[serde(rename = "none")]
    #[strum(serialize = "none")]
    None,

    /// Cantrip-style growth keyed to character/monster level, independent of
    /// resource spent.
    #[serde(rename = "cantrip")]
    #[strum(serialize = "cantrip")]
    Tiered,

    /// Spell augmentation: pay more mana for more effect.
    #[serde(rename = "augment")]
    #[strum(serialize = "augment")]
    Augment,

    /// Maneuver enhancement: pay more stamina for more effect.
    #[serde(rename = "enhance")]
    #[strum(serialize = "enhance")]
    Enhance,
}

/// Feature-specific data.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FeatureData {
    /// Host-defined feature category label.
    pub feature_type: Option<String>,
}

/// Equipment-specific data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EquipmentData {
    pub defense: u32,
    pub soak: u32,
}

/// Consumable-specific data.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ConsumableData {
    /// Host-defined consumable category label (potion, scroll, ammo...).
    pub consumable_type: Option<String>,
}

/// Tool-specific data.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ToolData {
    /// Proficiency multiplier applied to the proficiency bonus (0 = not
    /// proficient, 1 = proficient).
    #[serde(default = "default_tool_proficiency")]
    pub proficiency: u32,
}

impl Default for ToolData {
    fn default() -> Self {
        Self { proficiency: 1 }
    }
}

fn default_tool_proficiency() -> u32 {
    1
}
