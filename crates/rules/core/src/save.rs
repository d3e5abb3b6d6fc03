//! Saving-throw difficulty resolution.

use crate::actor::ActorState;
use crate::error::{ErrorSeverity, RulesError};
use crate::item::{Item, SaveScaling};

/// Configuration errors raised while resolving a save DC.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SaveDcError {
    /// Flat scaling declared without a stored DC value.
    #[error("\"{name}\" declares a flat save DC but stores no value")]
    MissingFlatDc { name: String },
}

impl RulesError for SaveDcError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingFlatDc { .. } => "SAVE_MISSING_FLAT_DC",
        }
    }
}

/// Resolves the difficulty of the saving throw an item forces.
///
/// Returns `None` when the item declares no save. For owned items the DC is
/// dispatched on the declared scaling source: spell- and alchemy-derived
/// saves use the actor's spellcasting DC, maneuver-derived saves the
/// maneuver DC, flat saves the stored value. Unowned items can only resolve
/// a flat DC; every actor-derived source yields `None` without an owner.
///
/// # Errors
///
/// [`SaveDcError::MissingFlatDc`] when flat scaling is declared without a
/// stored value - a configuration error that must not silently default.
pub fn resolve_save_dc(
    item: &Item,
    actor: Option<&ActorState>,
) -> Result<Option<i32>, SaveDcError> {
    let Some(save) = &item.usage.save else {
        return Ok(None);
    };

    let flat = || {
        save.dc.ok_or_else(|| SaveDcError::MissingFlatDc {
            name: item.name.clone(),
        })
    };

    match (actor, save.scaling) {
        (_, SaveScaling::FlatDc) => Ok(Some(flat()?)),
        (Some(actor), SaveScaling::SpellDc | SaveScaling::AlchemicalDc) => {
            Ok(Some(actor.spell_dc))
        }
        (Some(actor), SaveScaling::ManeuverDc) => Ok(Some(actor.maneuver_dc)),
        // Unowned: a derived DC cannot be computed without an owning actor.
        (None, _) => Ok(None),
    }
}
