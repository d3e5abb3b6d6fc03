//! Shared harness for the workflow integration tests: a deterministic stub
//! evaluator, a scripted choice provider, a recording template placer, and
//! actor/item fixtures.
#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use rules_core::formula::{DiceFormula, Term};
use rules_core::{
    Ability, AbilityScores, ActorState, AreaRequest, ContextValue, DamagePart, DamageType,
    EvalError, EvaluatedRoll, FormulaEvaluator, Item, ItemId, ItemKind, PowerType, ResourceMeter,
    ResourcePools, RollContext, RolledTerm, SuperpowerData, WeaponCategory, WeaponData,
};
use runtime::{ChoiceProvider, TemplatePlacer, UsageChoice};

/// Routes workflow tracing into the test writer; `RUST_LOG=debug` shows the
/// stage-by-stage log.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ============================================================================
// Stub Evaluator
// ============================================================================

/// Deterministic evaluator: every die face contributes `die_value` (clamped
/// to the die's face count), variables resolve from the roll context.
pub struct StubEvaluator {
    pub die_value: u32,
}

impl StubEvaluator {
    pub fn new(die_value: u32) -> Self {
        Self { die_value }
    }
}

impl FormulaEvaluator for StubEvaluator {
    fn evaluate(&self, formula: &str, context: &RollContext) -> Result<EvaluatedRoll, EvalError> {
        let parsed = DiceFormula::parse(formula);
        let mut total = 0i64;
        let mut terms = Vec::new();

        for signed in &parsed.terms {
            let (value, rolls, expression) = match &signed.term {
                Term::Die(die) => {
                    let per_die = self.die_value.min(die.faces);
                    (
                        i64::from(die.count) * i64::from(per_die),
                        vec![per_die; die.count as usize],
                        die.to_string(),
                    )
                }
                Term::Number(value) => (*value, Vec::new(), value.to_string()),
                Term::Other(text) => {
                    let Some(name) = text.strip_prefix('@') else {
                        return Err(EvalError::new(formula, format!("unsupported term {text}")));
                    };
                    match context.get(name) {
                        Some(ContextValue::Number(value)) => (*value, Vec::new(), text.clone()),
                        Some(ContextValue::Formula(inner)) => {
                            let evaluated = self.evaluate(inner, context)?;
                            (evaluated.total, Vec::new(), inner.clone())
                        }
                        None => {
                            return Err(EvalError::new(
                                formula,
                                format!("unbound variable {text}"),
                            ));
                        }
                    }
                }
            };

            let signed_value = if signed.negative { -value } else { value };
            total += signed_value;
            terms.push(RolledTerm {
                expression,
                total: signed_value,
                rolls,
            });
        }

        Ok(EvaluatedRoll { total, terms })
    }
}

// ============================================================================
// Scripted Providers
// ============================================================================

/// Choice provider that returns a fixed response and records which items
/// asked for configuration.
pub struct ScriptedChoices {
    response: Option<UsageChoice>,
    pub asked: Mutex<Vec<String>>,
}

impl ScriptedChoices {
    pub fn answering(response: UsageChoice) -> Self {
        Self {
            response: Some(response),
            asked: Mutex::new(Vec::new()),
        }
    }

    /// Player dismisses every dialog.
    pub fn cancelling() -> Self {
        Self {
            response: None,
            asked: Mutex::new(Vec::new()),
        }
    }

    pub fn times_asked(&self) -> usize {
        self.asked.lock().unwrap().len()
    }
}

#[async_trait]
impl ChoiceProvider for ScriptedChoices {
    async fn collect_usage_choice(&self, item: &Item) -> Option<UsageChoice> {
        self.asked.lock().unwrap().push(item.name.clone());
        self.response
    }
}

/// Placer that records every placement request.
#[derive(Default)]
pub struct RecordingPlacer {
    pub placed: Mutex<Vec<(String, AreaRequest)>>,
}

impl RecordingPlacer {
    pub fn requests(&self) -> Vec<(String, AreaRequest)> {
        self.placed.lock().unwrap().clone()
    }
}

impl TemplatePlacer for RecordingPlacer {
    fn place_area_effect(&self, item: &Item, request: AreaRequest) {
        self.placed.lock().unwrap().push((item.name.clone(), request));
    }
}

// ============================================================================
// Fixtures
// ============================================================================

pub fn hero() -> ActorState {
    ActorState {
        name: "Asha".to_string(),
        abilities: AbilityScores {
            str: 3,
            dex: 2,
            con: 1,
            int: 4,
            wis: 1,
            cha: 0,
        },
        level: 5,
        proficiency: 2,
        spellcasting_ability: Ability::Int,
        maneuver_ability: Ability::Str,
        spell_dc: 15,
        maneuver_dc: 13,
        pools: ResourcePools {
            mana: ResourceMeter::full(10),
            stamina: ResourceMeter::full(6),
            catalysts: ResourceMeter::full(4),
        },
        hit_points: ResourceMeter::full(44),
        bonuses: Default::default(),
        inventory: Vec::new(),
    }
}

pub fn longsword(id: ItemId) -> Item {
    let mut item = Item::new(
        id,
        "Longsword",
        ItemKind::Weapon(WeaponData {
            category: WeaponCategory::MartialMelee,
            finesse: false,
            proficient: true,
        }),
    );
    item.usage.action_type = rules_core::ActionType::MeleeWeaponAttack;
    item.usage.damage = vec![DamagePart::new("1d8", DamageType::Slashing)];
    item
}

pub fn spell(id: ItemId, name: &str, cost: u32) -> Item {
    Item::new(
        id,
        name,
        ItemKind::Superpower(SuperpowerData::new(PowerType::Spell, cost)),
    )
}
