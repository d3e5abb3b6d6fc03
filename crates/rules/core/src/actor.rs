//! Actor-side state consumed by the resolvers.
//!
//! An [`ActorState`] is a snapshot of everything the rules core reads from
//! the owning character: ability modifiers, proficiency, casting stats and
//! derived DCs, the three resource pools, per-action-type roll bonuses, and
//! the owned-item inventory that consumption targets resolve against.
//!
//! Pools mutate only through planned [`crate::mutation::StateUpdate`]s
//! applied by the host gateway (or direct actor edits outside this crate).

use std::collections::BTreeMap;

use crate::item::{ActionType, Item, ItemId};

// ============================================================================
// Abilities
// ============================================================================

/// The six ability keys used by rolls and derived stats.
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
pub enum Ability {
    Str,
    Dex,
    Con,
    Int,
    Wis,
    Cha,
}

/// Ability modifiers (not raw scores - the system stores modifiers directly).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AbilityScores {
    pub str: i32,
    pub dex: i32,
    pub con: i32,
    pub int: i32,
    pub wis: i32,
    pub cha: i32,
}

impl AbilityScores {
    /// Modifier for the given ability key.
    pub const fn get(&self, ability: Ability) -> i32 {
        match ability {
            Ability::Str => self.str,
            Ability::Dex => self.dex,
            Ability::Con => self.con,
            Ability::Int => self.int,
            Ability::Wis => self.wis,
            Ability::Cha => self.cha,
        }
    }
}

// ============================================================================
// Resource Pools
// ============================================================================

/// The three actor-owned pools superpowers draw from.
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
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PoolKind {
    Mana,
    Stamina,
    Catalysts,
}

/// Current and limit values of one resource pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ResourceMeter {
    pub value: u32,
    pub limit: u32,
}

impl ResourceMeter {
    pub const fn new(value: u32, limit: u32) -> Self {
        Self { value, limit }
    }

    /// A full meter.
    pub const fn full(limit: u32) -> Self {
        Self {
            value: limit,
            limit,
        }
    }
}

/// The actor's three independent resource pools.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ResourcePools {
    pub mana: ResourceMeter,
    pub stamina: ResourceMeter,
    pub catalysts: ResourceMeter,
}

impl ResourcePools {
    pub const fn get(&self, kind: PoolKind) -> &ResourceMeter {
        match kind {
            PoolKind::Mana => &self.mana,
            PoolKind::Stamina => &self.stamina,
            PoolKind::Catalysts => &self.catalysts,
        }
    }

    pub const fn get_mut(&mut self, kind: PoolKind) -> &mut ResourceMeter {
        match kind {
            PoolKind::Mana => &mut self.mana,
            PoolKind::Stamina => &mut self.stamina,
            PoolKind::Catalysts => &mut self.catalysts,
        }
    }
}

// ============================================================================
// Attribute References
// ============================================================================

/// A numeric attribute on the actor that attribute-kind consumption can
/// target. Closed set - unresolvable host paths fail at the data edge.
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
pub enum AttributeRef {
    Mana,
    Stamina,
    Catalysts,
    #[serde(rename = "hp")]
    #[strum(serialize = "hp")]
    HitPoints,
}

impl AttributeRef {
    /// The attribute backing a resource pool.
    pub const fn from_pool(pool: PoolKind) -> Self {
        match pool {
            PoolKind::Mana => Self::Mana,
            PoolKind::Stamina => Self::Stamina,
            PoolKind::Catalysts => Self::Catalysts,
        }
    }
}

// ============================================================================
// Roll Bonuses
// ============================================================================

/// Per-action-type bonus fragments declared on the actor (e.g. a +1 to all
/// melee weapon attack rolls). Fragments are formula text, not numbers.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RollBonuses {
    pub attack: Option<String>,
    pub damage: Option<String>,
}

// ============================================================================
// Actor State
// ============================================================================

/// Snapshot of the actor fields the rules core reads.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ActorState {
    pub name: String,

    pub abilities: AbilityScores,

    /// Character (or monster tier) level, drives tiered scaling.
    pub level: u32,

    /// Proficiency bonus.
    pub proficiency: i32,

    /// Ability used for spells and concoctions.
    pub spellcasting_ability: Ability,

    /// Ability used for maneuvers.
    pub maneuver_ability: Ability,

    /// Derived spellcasting DC (shared by alchemy).
    pub spell_dc: i32,

    /// Derived maneuver DC.
    pub maneuver_dc: i32,

    pub pools: ResourcePools,

    pub hit_points: ResourceMeter,

    /// Bonus fragments keyed by action type.
    #[serde(default)]
    pub bonuses: BTreeMap<ActionType, RollBonuses>,

    /// Owned items; consumption target references resolve against this.
    #[serde(default)]
    pub inventory: Vec<Item>,
}

impl ActorState {
    /// Current value of a consumable attribute.
    pub fn attribute(&self, attribute: AttributeRef) -> u32 {
        match attribute {
            AttributeRef::Mana => self.pools.mana.value,
            AttributeRef::Stamina => self.pools.stamina.value,
            AttributeRef::Catalysts => self.pools.catalysts.value,
            AttributeRef::HitPoints => self.hit_points.value,
        }
    }

    /// Looks up an owned item by id.
    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.inventory.iter().find(|item| item.id == id)
    }

    /// Bonus fragments for the given action type, if any are declared.
    pub fn bonuses_for(&self, action_type: ActionType) -> Option<&RollBonuses> {
        self.bonuses.get(&action_type)
    }
}
