//! Area-effect shape resolution.
//!
//! Converts an item's scaling-area target into the shape request handed to
//! the external placement capability: template shape, base distance from the
//! per-shape standard-size table multiplied by the spend factor, plus the
//! shape-specific extras (cone aperture, ray width). Placement itself is
//! fire-and-forget and external.

use crate::config::RulesConfig;
use crate::error::{ErrorSeverity, RulesError};
use crate::item::{Item, TargetType};

/// Measured-template shapes the host canvas understands.
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
pub enum TemplateShape {
    Circle,
    Cone,
    Ray,
    Rect,
}

/// A resolved area-effect placement request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AreaRequest {
    pub shape: TemplateShape,

    /// Scaled size in scene units.
    pub distance: u32,

    /// Cone aperture in degrees.
    pub angle: Option<u32>,

    /// Ray width in scene units.
    pub width: Option<u32>,
}

/// Errors raised while resolving an area request.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AreaError {
    /// The item's target is not a placeable area shape.
    #[error("\"{name}\" has no placeable area target ({target_type})")]
    NotPlaceable {
        name: String,
        target_type: TargetType,
    },
}

impl RulesError for AreaError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotPlaceable { .. } => "AREA_NOT_PLACEABLE",
        }
    }
}

/// Resolves the placement request for an item's area target, scaled by the
/// spend factor (1 for non-scaling usages).
pub fn resolve_area_request(item: &Item, scale: u32) -> Result<AreaRequest, AreaError> {
    let target_type = item
        .usage
        .target
        .as_ref()
        .map_or(TargetType::None, |target| target.target_type);

    let Some(base) = RulesConfig::area_standard_size(target_type) else {
        return Err(AreaError::NotPlaceable {
            name: item.name.clone(),
            target_type,
        });
    };

    let shape = match target_type {
        TargetType::Cone => TemplateShape::Cone,
        TargetType::Line => TemplateShape::Ray,
        TargetType::Cube => TemplateShape::Rect,
        // Cylinders, radii and spheres all place as circles.
        _ => TemplateShape::Circle,
    };

    Ok(AreaRequest {
        shape,
        distance: base * scale.max(1),
        angle: (shape == TemplateShape::Cone).then_some(RulesConfig::CONE_ANGLE),
        width: (shape == TemplateShape::Ray).then_some(RulesConfig::RAY_WIDTH),
    })
}
