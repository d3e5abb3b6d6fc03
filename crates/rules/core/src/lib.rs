//! Pure rules-resolution logic for item usage.
//!
//! `rules-core` decides whether using an item is legal, what it consumes,
//! how its damage formulas scale, what the saving-throw difficulty is, and
//! how its rolls are composed. Everything here is synchronous and
//! deterministic: external capabilities (dice evaluation, mutation
//! persistence, player dialogs, template placement) are traits consumed by
//! the `runtime` crate, and every mutation the rules decide on is returned
//! as data ([`StateUpdate`]) for the host to persist.
pub mod actor;
pub mod area;
pub mod config;
pub mod consume;
pub mod env;
pub mod error;
pub mod formula;
pub mod item;
pub mod mutation;
pub mod recharge;
pub mod roll;
pub mod save;
pub mod scaling;

#[cfg(test)]
pub(crate) mod testing;

pub use actor::{
    Ability, AbilityScores, ActorState, AttributeRef, PoolKind, ResourceMeter, ResourcePools,
    RollBonuses,
};
pub use area::{AreaError, AreaRequest, TemplateShape, resolve_area_request};
pub use config::RulesConfig;
pub use consume::{ConsumeError, ConsumePhase, ConsumptionPlan, effective_consume, plan_consumption};
pub use env::{EvalError, EvaluatedRoll, FormulaEvaluator, RolledTerm};
pub use error::{ErrorSeverity, RulesError};
pub use item::{
    ActionType, Capabilities, CapabilityError, ConsumableData, ConsumeKind, ConsumeProfile,
    ConsumeTarget, DamagePart, DamageType, EquipmentData, FeatureData, Item, ItemId, ItemKind,
    LimitedUses, PowerType, Recharge, SaveProfile, SaveScaling, SaveType, ScalingMode,
    ScalingProfile, SuperpowerData, TargetProfile, TargetType, ToolData, UsePeriod, UsageProfile,
    WeaponCategory, WeaponData, ability_modifier, classify,
};
pub use mutation::StateUpdate;
pub use recharge::{RechargeError, RechargeOutcome, resolve_recharge};
pub use roll::{
    ContextValue, RollContext, RollError, RollKind, RollSpec, compose_attack_roll,
    compose_damage_roll, compose_other_formula, compose_tool_check, roll_data,
};
pub use save::{SaveDcError, resolve_save_dc};
pub use scaling::{
    ScaleParams, ScalingError, scale_damage_parts, scale_paid, scale_superpower_damage,
    scale_tiered,
};
