//! Shared fixtures for unit tests.

use crate::actor::{Ability, AbilityScores, ActorState, ResourceMeter, ResourcePools};
use crate::item::{
    FeatureData, Item, ItemId, ItemKind, PowerType, SuperpowerData, WeaponCategory, WeaponData,
};

pub(crate) fn test_actor() -> ActorState {
    ActorState {
        name: "Test Hero".to_string(),
        abilities: AbilityScores {
            str: 2,
            dex: 1,
            con: 1,
            int: 3,
            wis: 0,
            cha: -1,
        },
        level: 5,
        proficiency: 3,
        spellcasting_ability: Ability::Int,
        maneuver_ability: Ability::Str,
        spell_dc: 14,
        maneuver_dc: 13,
        pools: ResourcePools {
            mana: ResourceMeter::full(10),
            stamina: ResourceMeter::full(6),
            catalysts: ResourceMeter::full(4),
        },
        hit_points: ResourceMeter::full(40),
        bonuses: Default::default(),
        inventory: Vec::new(),
    }
}

pub(crate) fn test_weapon(id: ItemId, name: &str) -> Item {
    Item::new(
        id,
        name,
        ItemKind::Weapon(WeaponData {
            category: WeaponCategory::SimpleMelee,
            finesse: false,
            proficient: true,
        }),
    )
}

pub(crate) fn test_feature(id: ItemId, name: &str) -> Item {
    Item::new(id, name, ItemKind::Feature(FeatureData::default()))
}

pub(crate) fn test_superpower(id: ItemId, name: &str, cost: u32) -> Item {
    Item::new(
        id,
        name,
        ItemKind::Superpower(SuperpowerData::new(PowerType::Spell, cost)),
    )
}
