//! Damage/effect formula scaling.
//!
//! Two algorithms over an ordered sequence of formula parts (the first part
//! is the "primary" term eligible for die-merging):
//!
//! - **Tiered** (cantrip-style): growth keyed to character/monster level.
//!   One extra application of the scaling formula per full tier past the
//!   first. Extra applications merge into the primary term when the dice
//!   line up, otherwise they are appended to it.
//! - **Augment/Enhance**: growth keyed to extra resource spent. One
//!   application per point paid above the base cost, always appended as a
//!   separate additive part - this path never merges.
//!
//! Merging is a textual simplification only (`3d6` + `2d6` -> `5d6`); it
//! must not change the evaluated distribution, so it requires identical
//! faces and identical die modifiers.

use crate::config::RulesConfig;
use crate::error::{ErrorSeverity, RulesError};
use crate::formula::DiceFormula;
use crate::item::{ScalingMode, SuperpowerData};

/// Errors raised while scaling a formula.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ScalingError {
    /// The augment/enhance modes have no implicit fallback formula.
    #[error("scaling mode {mode} requires a scaling formula")]
    MissingFormula { mode: ScalingMode },
}

impl RulesError for ScalingError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingFormula { .. } => "SCALING_MISSING_FORMULA",
        }
    }
}

/// Parameters for [`scale_damage_parts`], selected by the scaling mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScaleParams {
    /// Tiered scaling: the user's character (or monster tier) level.
    Tiered { level: u32 },

    /// Augment/enhance scaling: base cost and the cost actually paid.
    Paid { base_cost: u32, effective_cost: u32 },
}

/// Scales damage parts in place according to the given mode.
///
/// # Errors
///
/// [`ScalingError::MissingFormula`] when an augment/enhance item with extra
/// spend declares no scaling formula.
pub fn scale_damage_parts(
    parts: &mut Vec<String>,
    mode: ScalingMode,
    params: ScaleParams,
    formula: Option<&str>,
    config: &RulesConfig,
) -> Result<(), ScalingError> {
    match (mode, params) {
        (ScalingMode::None, _) => Ok(()),
        (ScalingMode::Tiered, ScaleParams::Tiered { level }) => {
            scale_tiered(parts, level, formula, config);
            Ok(())
        }
        (ScalingMode::Augment | ScalingMode::Enhance, ScaleParams::Paid { base_cost, effective_cost }) => {
            scale_paid(parts, mode, base_cost, effective_cost, formula)
        }
        // Mode/params mismatch means the caller derived parameters for the
        // wrong mode; scale nothing rather than guess.
        _ => Ok(()),
    }
}

/// Convenience dispatcher for superpowers: derives mode and parameters from
/// the item's scaling profile.
pub fn scale_superpower_damage(
    parts: &mut Vec<String>,
    data: &SuperpowerData,
    level: u32,
    spent_cost_override: Option<u32>,
    config: &RulesConfig,
) -> Result<(), ScalingError> {
    let formula = data.scaling.formula.as_deref();
    match data.scaling.mode {
        ScalingMode::None => Ok(()),
        ScalingMode::Tiered => {
            scale_tiered(parts, level, formula, config);
            Ok(())
        }
        mode @ (ScalingMode::Augment | ScalingMode::Enhance) => {
            let effective = spent_cost_override
                .or(data.spent_cost)
                .unwrap_or(data.cost);
            if effective == data.cost {
                return Ok(());
            }
            scale_paid(parts, mode, data.cost, effective, formula)
        }
    }
}

/// Tiered (cantrip-style) scaling.
///
/// `multiplier = max(1, ceil(level / tier_divisor))`; the formula is applied
/// `multiplier - 1` extra times. Levels 1-8 therefore leave the parts
/// untouched, 9-16 add one application, 17-24 two.
pub fn scale_tiered(
    parts: &mut Vec<String>,
    level: u32,
    formula: Option<&str>,
    config: &RulesConfig,
) {
    let multiplier = level.div_ceil(config.tier_level_divisor).max(1);
    let extra_applications = multiplier - 1;
    if extra_applications == 0 {
        return;
    }

    let scaling = match formula {
        Some(formula) => formula.to_string(),
        // No explicit scaling formula: the item's own damage repeats.
        None => parts.join(" + "),
    };
    if scaling.is_empty() {
        return;
    }

    apply_to_primary(parts, &scaling, extra_applications);
}

/// Augment/enhance scaling: one application per point paid above base cost,
/// appended as a separate additive part (never merged).
pub fn scale_paid(
    parts: &mut Vec<String>,
    mode: ScalingMode,
    base_cost: u32,
    effective_cost: u32,
    formula: Option<&str>,
) -> Result<(), ScalingError> {
    let steps = effective_cost.saturating_sub(base_cost);
    if steps == 0 {
        return Ok(());
    }

    let formula = formula.ok_or(ScalingError::MissingFormula { mode })?;
    let bonus = DiceFormula::parse(formula).alter(steps);
    parts.push(bonus.to_string());
    Ok(())
}

/// Applies `times` copies of `scaling` to the primary part.
///
/// If the scaled formula reduces to a single die term matching the primary
/// part's leading die (same faces, same modifiers), the die counts merge;
/// otherwise the scaled formula is appended to the primary part's text.
fn apply_to_primary(parts: &mut Vec<String>, scaling: &str, times: u32) {
    if times == 0 {
        return;
    }

    let scaled = DiceFormula::parse(scaling).alter(times);

    if let Some(primary) = parts.first_mut() {
        let mut primary_formula = DiceFormula::parse(primary);
        if let (Some(scaled_die), Some(leading)) =
            (scaled.single_die(), primary_formula.leading_die_mut())
            && scaled_die.faces == leading.faces
            && scaled_die.modifiers == leading.modifiers
        {
            leading.count += scaled_die.count;
            *primary = primary_formula.to_string();
            return;
        }

        *primary = format!("{primary} + {scaled}");
    } else {
        parts.push(scaled.to_string());
    }
}
