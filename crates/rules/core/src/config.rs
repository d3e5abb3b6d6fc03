//! Rules configuration constants and tunable parameters.

use crate::actor::Ability;
use crate::item::TargetType;

/// Tunable rule parameters, with system defaults matching the published
/// rules text.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RulesConfig {
    /// Levels per power tier; tiered (cantrip-style) damage gains one extra
    /// application per full tier past the first.
    pub tier_level_divisor: u32,
}

impl RulesConfig {
    // ===== fixed rule constants =====
    /// Faces of the recharge die.
    pub const RECHARGE_DIE_FACES: u32 = 6;
    /// Ability used by tool checks when the tool declares none.
    pub const DEFAULT_TOOL_ABILITY: Ability = Ability::Int;
    /// Default width of line (ray) area templates, in scene units.
    pub const RAY_WIDTH: u32 = 5;
    /// Default cone aperture, in degrees.
    pub const CONE_ANGLE: u32 = 53;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_TIER_LEVEL_DIVISOR: u32 = 8;

    pub fn new() -> Self {
        Self {
            tier_level_divisor: Self::DEFAULT_TIER_LEVEL_DIVISOR,
        }
    }

    /// Standard base size for a scaling area shape, in scene units, before
    /// the spend multiplier is applied. `None` for non-area target types.
    pub const fn area_standard_size(target_type: TargetType) -> Option<u32> {
        match target_type {
            TargetType::Cone => Some(15),
            TargetType::Cube => Some(10),
            TargetType::Cylinder => Some(10),
            TargetType::Line => Some(30),
            TargetType::Radius => Some(10),
            TargetType::Sphere => Some(20),
            _ => None,
        }
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self::new()
    }
}
