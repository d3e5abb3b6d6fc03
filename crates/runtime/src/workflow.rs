//! The ability-use workflow.
//!
//! One usage runs as a single sequential chain:
//!
//! ```text
//! Idle -> Classifying -> (ConfiguringChoice)? -> Consuming -> (Scaling)?
//!      -> Rolling -> Reporting -> Done
//! ```
//!
//! with an `Aborted` terminal reachable from the choice dialog (player
//! cancels) and from consumption (resource check failure). Suspension
//! happens only at the provider boundaries: the choice dialog and the
//! mutation gateway. No two stages of a single usage run concurrently.
//!
//! # Known race
//!
//! Two usages in flight against the same actor's same resource pool can
//! race: the workflow reads a state snapshot and the gateway persists
//! absolute values, with no cross-invocation locking. The host interaction
//! model is turn-based and single-operator, so this is accepted rather than
//! locked away.
//!
//! # Commit ordering
//!
//! Recharge and charge-counter deductions commit before external resource
//! consumption runs. A consumption failure aborts the usage but does not
//! roll them back; callers must treat this as a known partial-effect
//! window.

use std::borrow::Cow;

use tracing::{debug, warn};

use rules_core::consume::{ConsumePhase, ConsumptionPlan, plan_consumption};
use rules_core::recharge::{RechargeOutcome, resolve_recharge};
use rules_core::{
    ActorState, Capabilities, FormulaEvaluator, Item, ItemKind, RollSpec, RulesConfig, StateUpdate,
    classify, compose_attack_roll, compose_damage_roll, resolve_area_request, resolve_save_dc,
};

use crate::error::WorkflowError;
use crate::providers::{ChoiceProvider, EntityGateway, TemplatePlacer, UsageChoice};
use crate::report::{AbortReason, ConsumedResource, RollSummary, SaveSummary, UsageOutcome, UsageReport};

// ============================================================================
// Options & Workflow
// ============================================================================

/// Caller-supplied knobs for one usage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UsageOptions {
    /// Show the configuration dialog when the item calls for one. With
    /// `false` the defaults apply (consume, don't place).
    pub configure: bool,

    /// Augment/enhance spend chosen by the player; overrides the item's
    /// stored spent cost for this invocation.
    pub spent_cost: Option<u32>,
}

impl Default for UsageOptions {
    fn default() -> Self {
        Self {
            configure: true,
            spent_cost: None,
        }
    }
}

/// The ability-use orchestrator: rules decisions from `rules-core`, side
/// effects through the providers.
pub struct UsageWorkflow<'a> {
    choices: &'a dyn ChoiceProvider,
    gateway: &'a dyn EntityGateway,
    placer: &'a dyn TemplatePlacer,
    evaluator: &'a dyn FormulaEvaluator,
    config: RulesConfig,
}

impl<'a> UsageWorkflow<'a> {
    pub fn new(
        choices: &'a dyn ChoiceProvider,
        gateway: &'a dyn EntityGateway,
        placer: &'a dyn TemplatePlacer,
        evaluator: &'a dyn FormulaEvaluator,
    ) -> Self {
        Self {
            choices,
            gateway,
            placer,
            evaluator,
            config: RulesConfig::default(),
        }
    }

    /// Overrides the rules configuration (builder pattern).
    #[must_use]
    pub fn with_config(mut self, config: RulesConfig) -> Self {
        self.config = config;
        self
    }

    /// Runs one complete usage of `item` by `actor`.
    ///
    /// Recoverable conditions (cancellation, resource shortfalls) return
    /// [`UsageOutcome::Aborted`]; configuration errors and provider
    /// failures propagate as [`WorkflowError`].
    pub async fn run(
        &self,
        item: &Item,
        actor: &ActorState,
        options: UsageOptions,
    ) -> Result<UsageOutcome, WorkflowError> {
        debug!(item = %item.name, actor = %actor.name, "ability use started");

        // A chosen augment/enhance spend becomes the item's spent cost for
        // the rest of the invocation (consumption, scaling, area scale).
        let item: Cow<'_, Item> = match (options.spent_cost, &item.kind) {
            (Some(spent), ItemKind::Superpower(_)) => {
                let mut configured = item.clone();
                if let ItemKind::Superpower(data) = &mut configured.kind {
                    data.spent_cost = Some(spent.max(data.cost));
                }
                Cow::Owned(configured)
            }
            _ => Cow::Borrowed(item),
        };
        let item = item.as_ref();

        // --- Classifying -----------------------------------------------
        let capabilities = classify(item);
        let uses_recharge = item.usage.recharge.is_some();
        let uses_charges = charges_configured(item);
        let needs_choice =
            uses_recharge || uses_charges || capabilities.contains(Capabilities::PLACEABLE_AREA);

        // --- ConfiguringChoice -----------------------------------------
        let choice = if options.configure && needs_choice {
            match self.choices.collect_usage_choice(item).await {
                Some(choice) => choice,
                None => {
                    debug!(item = %item.name, "usage cancelled at configuration");
                    return Ok(UsageOutcome::Aborted(AbortReason::Cancelled));
                }
            }
        } else {
            UsageChoice::default()
        };

        // --- Consuming -------------------------------------------------
        let mut consumed = Vec::new();

        if choice.consume {
            if uses_recharge {
                self.gateway
                    .apply(StateUpdate::ItemRecharge {
                        item: item.id,
                        charged: false,
                    })
                    .await?;
            } else if let ItemKind::Consumable(_) = &item.kind {
                match consumable_depletion(item) {
                    Some(update) => self.gateway.apply(update).await?,
                    None => {
                        warn!(item = %item.name, "consumable has no uses or quantity left");
                        return Ok(UsageOutcome::Aborted(AbortReason::NoUsesRemaining {
                            item: item.name.clone(),
                        }));
                    }
                }
            } else if uses_charges {
                let current = item.usage.uses.as_ref().map_or(0, |uses| uses.value);
                self.gateway
                    .apply(StateUpdate::ItemUses {
                        item: item.id,
                        value: current.saturating_sub(1),
                    })
                    .await?;
            }
        }

        // External resource consumption runs unconditionally - the dialog's
        // consume flag only governs the recharge/charge budget above.
        match plan_consumption(item, actor, ConsumePhase::Card) {
            Ok(Some(plan)) => {
                self.gateway.apply(plan.update.clone()).await?;
                consumed.push(ConsumedResource::from(&plan));
            }
            Ok(None) => {}
            Err(err) => {
                warn!(item = %item.name, %err, "resource consumption failed");
                return Ok(UsageOutcome::Aborted(AbortReason::Consume(err)));
            }
        }

        // --- Scaling & Rolling -----------------------------------------
        let mut ammo_item = None;
        let attack = if capabilities.contains(Capabilities::ATTACK) {
            match plan_consumption(item, actor, ConsumePhase::Attack) {
                Ok(Some(plan)) => {
                    self.gateway.apply(plan.update.clone()).await?;
                    ammo_item = plan.ammo.and_then(|id| actor.item(id)).cloned();
                    consumed.push(ConsumedResource::from(&plan));
                }
                Ok(None) => {}
                Err(err) => {
                    warn!(item = %item.name, %err, "ammunition consumption failed");
                    return Ok(UsageOutcome::Aborted(AbortReason::Consume(err)));
                }
            }

            let spec = compose_attack_roll(item, actor)?;
            Some(self.evaluate(&spec)?)
        } else {
            None
        };

        let damage = if capabilities.contains(Capabilities::DAMAGE) {
            let spec = compose_damage_roll(item, actor, None, ammo_item.as_ref(), &self.config)?;
            Some(self.evaluate(&spec)?)
        } else {
            None
        };

        let save = match &item.usage.save {
            Some(profile) => Some(SaveSummary {
                save_type: profile.save_type,
                dc: resolve_save_dc(item, Some(actor))?,
            }),
            None => None,
        };

        // --- Area placement (fire-and-forget) --------------------------
        let mut area_placed = false;
        if choice.place_area && capabilities.contains(Capabilities::PLACEABLE_AREA) {
            let scale = item
                .as_superpower()
                .map_or(1, |data| data.effective_cost());
            let request = resolve_area_request(item, scale)?;
            self.placer.place_area_effect(item, request);
            area_placed = true;
        }

        // --- Reporting (never mutates) ---------------------------------
        let report = UsageReport {
            item: item.name.clone(),
            capabilities,
            attack,
            damage,
            save,
            effects: item.usage.effects.clone(),
            consumed,
            area_placed,
        };
        debug!(item = %item.name, "ability use completed");
        Ok(UsageOutcome::Completed(Box::new(report)))
    }

    fn evaluate(&self, spec: &RollSpec) -> Result<RollSummary, WorkflowError> {
        let evaluated = self.evaluator.evaluate(&spec.formula(), &spec.context)?;
        debug!(formula = %spec.formula(), total = evaluated.total, "rolled");
        Ok(RollSummary::new(spec, evaluated))
    }
}

// ============================================================================
// Consumption helpers
// ============================================================================

/// True when the item budgets its uses with a limited-use counter.
fn charges_configured(item: &Item) -> bool {
    item.usage
        .uses
        .as_ref()
        .is_some_and(|uses| uses.per.is_some() && uses.max > 0)
}

/// The depletion cascade for consumables: spend a charge, then a stack
/// quantity, then the item itself. `None` means the item is unusable.
fn consumable_depletion(item: &Item) -> Option<StateUpdate> {
    let uses = item.usage.uses.as_ref();
    let current = uses.map_or(0, |uses| uses.value);
    let max = uses.map_or(0, |uses| uses.max);
    let auto_destroy = uses.is_some_and(|uses| uses.auto_destroy);

    let remaining = if charges_configured(item) {
        current.saturating_sub(1)
    } else {
        current
    };
    let quantity = item.usage.quantity;

    if remaining > 0 {
        Some(StateUpdate::ItemUses {
            item: item.id,
            value: remaining,
        })
    } else if quantity > 1 {
        // One stack spent; the next stack starts with a full counter.
        Some(StateUpdate::ItemQuantityAndUses {
            item: item.id,
            quantity: quantity - 1,
            uses: max,
        })
    } else if quantity <= 1 && auto_destroy {
        Some(StateUpdate::DeleteItem { item: item.id })
    } else if quantity == 1 {
        Some(StateUpdate::ItemQuantityAndUses {
            item: item.id,
            quantity: 0,
            uses: 0,
        })
    } else {
        None
    }
}

// ============================================================================
// Standalone operations
// ============================================================================

/// Validates, deducts, and persists the resource an item usage requires for
/// one phase. The exposed form of the consumption resolver: plan through
/// `rules-core`, persist through the gateway.
///
/// Returns the committed plan, or `None` for a no-op (nothing to consume, or
/// non-matching phase).
pub async fn consume_resource(
    item: &Item,
    actor: &ActorState,
    phase: ConsumePhase,
    gateway: &dyn EntityGateway,
) -> Result<Option<ConsumptionPlan>, WorkflowError> {
    let Some(plan) = plan_consumption(item, actor, phase)? else {
        return Ok(None);
    };
    gateway.apply(plan.update.clone()).await?;
    Ok(Some(plan))
}

/// Performs the d6 recharge check for an item.
///
/// The die is rolled through the evaluator; on success the charged flag is
/// persisted. The outcome (roll + success) is returned regardless.
pub async fn roll_recharge(
    item: &Item,
    evaluator: &dyn FormulaEvaluator,
    gateway: &dyn EntityGateway,
) -> Result<RechargeOutcome, WorkflowError> {
    let die = format!("1d{}", RulesConfig::RECHARGE_DIE_FACES);
    let rolled = evaluator.evaluate(&die, &Default::default())?;
    let outcome = resolve_recharge(item, rolled.total.max(0) as u32)?;

    debug!(
        item = %item.name,
        roll = outcome.roll,
        recharged = outcome.recharged,
        "recharge check"
    );

    if let Some(update) = outcome.update() {
        gateway.apply(update).await?;
    }
    Ok(outcome)
}
