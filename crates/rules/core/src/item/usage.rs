//! Declarative usage data shared by every item kind.
//!
//! These types describe *what an item does when used*: its action type,
//! damage parts, saving throw, targeting, limited uses, recharge, and
//! resource consumption. They are plain data - all decision logic lives in
//! the classifier, the consumption planner, and the roll composer.

use crate::actor::AttributeRef;

use super::ItemId;

// ============================================================================
// Action Type
// ============================================================================

/// The kind of action an item performs when used.
///
/// The four attack variants are the only ones that produce an attack roll.
/// String forms match the host system's codes (`mwak`, `rwak`, ...).
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    strum::EnumString,
)]
pub enum ActionType {
    /// Melee weapon attack.
    #[serde(rename = "mwak")]
    #[strum(serialize = "mwak")]
    MeleeWeaponAttack,

    /// Ranged weapon attack.
    #[serde(rename = "rwak")]
    #[strum(serialize = "rwak")]
    RangedWeaponAttack,

    /// Melee spell attack.
    #[serde(rename = "msak")]
    #[strum(serialize = "msak")]
    MeleeSpellAttack,

    /// Ranged spell attack.
    #[serde(rename = "rsak")]
    #[strum(serialize = "rsak")]
    RangedSpellAttack,

    /// Healing instead of conventional damage.
    #[serde(rename = "heal")]
    #[strum(serialize = "heal")]
    Heal,

    /// Some other rollable action (utility formulas, checks).
    #[serde(rename = "other")]
    #[strum(serialize = "other")]
    Other,

    /// No action at all.
    #[default]
    #[serde(rename = "none")]
    #[strum(serialize = "none")]
    None,
}

impl ActionType {
    /// Returns true for the four action types that produce an attack roll.
    pub const fn is_attack(&self) -> bool {
        matches!(
            self,
            Self::MeleeWeaponAttack
                | Self::RangedWeaponAttack
                | Self::MeleeSpellAttack
                | Self::RangedSpellAttack
        )
    }
}

// ============================================================================
// Damage
// ============================================================================

/// One entry of an item's ordered damage sequence: a dice formula plus the
/// damage type it deals. The first part is the "primary" term eligible for
/// die-merging when the formula is scaled.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DamagePart {
    pub formula: String,
    pub damage_type: DamageType,
}

impl DamagePart {
    pub fn new(formula: impl Into<String>, damage_type: DamageType) -> Self {
        Self {
            formula: formula.into(),
            damage_type,
        }
    }
}

/// Damage types dealt by items.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DamageType {
    Acid,
    Bludgeoning,
    Cold,
    Fire,
    Force,
    Lightning,
    Necrotic,
    Piercing,
    Poison,
    Psychic,
    Radiant,
    Slashing,
    Thunder,
    /// Healing rides through the damage pipeline with its own type.
    Healing,
}

// ============================================================================
// Saving Throws
// ============================================================================

/// The saving throw an item forces, and how its DC is derived.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SaveProfile {
    /// Which defense the target saves with.
    pub save_type: SaveType,

    /// How the DC is derived.
    pub scaling: SaveScaling,

    /// Stored DC, used only when `scaling` is [`SaveScaling::FlatDc`].
    pub dc: Option<i32>,
}

/// Defenses a target can save with.
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
pub enum SaveType {
    Fortitude,
    Reflex,
    Will,
}

/// Source from which a save DC is derived.
///
/// Unknown strings fail loudly at the data edge (serde / `FromStr`); the
/// interior code never sees an unrecognized scaling source.
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
pub enum SaveScaling {
    /// The actor's spellcasting DC.
    #[serde(rename = "spell_dc")]
    #[strum(serialize = "spell_dc")]
    SpellDc,

    /// The actor's spellcasting DC (alchemy shares the spellcasting stat).
    #[serde(rename = "alchemical_dc")]
    #[strum(serialize = "alchemical_dc")]
    AlchemicalDc,

    /// The actor's maneuver DC.
    #[serde(rename = "maneuver_dc")]
    #[strum(serialize = "maneuver_dc")]
    ManeuverDc,

    /// A flat value stored on the item itself.
    #[serde(rename = "flat_dc")]
    #[strum(serialize = "flat_dc")]
    FlatDc,
}

// ============================================================================
// Targeting
// ============================================================================

/// What an item targets when used.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TargetProfile {
    pub target_type: TargetType,
}

/// Target shapes. The area variants scale with resource spent and can be
/// placed on the scene as measured templates.
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
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TargetType {
    #[default]
    None,
    #[serde(rename = "self")]
    #[strum(serialize = "self")]
    SelfTarget,
    Creature,
    Object,
    Cone,
    Cube,
    Cylinder,
    Line,
    Radius,
    Sphere,
}

impl TargetType {
    /// Returns true for the shapes that scale with resource spent and can be
    /// placed as an area template.
    pub const fn is_scaling_area(&self) -> bool {
        matches!(
            self,
            Self::Cone | Self::Cube | Self::Cylinder | Self::Line | Self::Radius | Self::Sphere
        )
    }
}

// ============================================================================
// Limited Uses & Recharge
// ============================================================================

/// Limited-use counter for items with a per-period use budget.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LimitedUses {
    /// Remaining uses.
    pub value: u32,

    /// Maximum uses per period.
    pub max: u32,

    /// Refresh period. An item with `max > 0` but no period is informational
    /// only and is never auto-consumed by the charges logic.
    pub per: Option<UsePeriod>,

    /// Destroy the item when the last use of the last quantity is spent.
    #[serde(default)]
    pub auto_destroy: bool,
}

/// Refresh periods for limited uses.
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
pub enum UsePeriod {
    #[serde(rename = "sr")]
    #[strum(serialize = "sr")]
    ShortRest,
    #[serde(rename = "lr")]
    #[strum(serialize = "lr")]
    LongRest,
    #[serde(rename = "day")]
    #[strum(serialize = "day")]
    Day,
    #[serde(rename = "charges")]
    #[strum(serialize = "charges")]
    Charges,
}

/// The binary d6 recharge mechanic.
///
/// A successful activation that consumes recharge clears `charged`; only a
/// recharge check (roll >= threshold) can set it again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Recharge {
    /// Minimum d6 result that recharges the item (1-6).
    pub threshold: u8,

    /// Whether the ability is currently available.
    pub charged: bool,
}

impl Recharge {
    pub fn new(threshold: u8) -> Self {
        Self {
            threshold,
            charged: true,
        }
    }
}

// ============================================================================
// Resource Consumption
// ============================================================================

/// Declares the external resource an item usage consumes.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ConsumeProfile {
    pub kind: ConsumeKind,

    /// What is consumed. `None` is a configuration error surfaced when the
    /// item is used, not at construction (the sheet allows saving items in
    /// that state).
    pub target: Option<ConsumeTarget>,

    /// Units consumed per use (>= 1).
    #[serde(default = "default_consume_amount")]
    pub amount: u32,
}

fn default_consume_amount() -> u32 {
    1
}

impl ConsumeProfile {
    pub fn new(kind: ConsumeKind, target: ConsumeTarget, amount: u32) -> Self {
        Self {
            kind,
            target: Some(target),
            amount,
        }
    }
}

/// Kinds of consumable resources.
///
/// Ammunition is consumed in the pre-attack phase; every other kind in the
/// pre-card phase.
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
pub enum ConsumeKind {
    #[serde(rename = "ammo")]
    #[strum(serialize = "ammo")]
    Ammunition,
    #[serde(rename = "attribute")]
    #[strum(serialize = "attribute")]
    Attribute,
    #[serde(rename = "material")]
    #[strum(serialize = "material")]
    Material,
    #[serde(rename = "charges")]
    #[strum(serialize = "charges")]
    Charges,
}

/// Reference to the thing a [`ConsumeProfile`] draws from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ConsumeTarget {
    /// A numeric attribute on the owning actor (resource pools, hit points).
    Attribute(AttributeRef),

    /// Another item held by the owning actor (ammunition, materials, a
    /// charged wand).
    Item(ItemId),
}
