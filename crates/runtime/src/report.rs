//! Structured usage results for the host chat/UI layer.
//!
//! Reporting never mutates state: a report is a snapshot of what happened,
//! serializable for the host to render however it likes.

use rules_core::consume::{ConsumeError, ConsumptionPlan};
use rules_core::{Capabilities, ConsumeKind, EvaluatedRoll, RollKind, RollSpec, RolledTerm, SaveType};

/// One evaluated roll: the composed expression, its flavor line, and the
/// evaluator's total and per-term breakdown.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RollSummary {
    pub kind: RollKind,
    pub formula: String,
    pub flavor: String,
    pub total: i64,
    pub terms: Vec<RolledTerm>,
}

impl RollSummary {
    pub fn new(spec: &RollSpec, evaluated: EvaluatedRoll) -> Self {
        Self {
            kind: spec.kind,
            formula: spec.formula(),
            flavor: spec.flavor.clone(),
            total: evaluated.total,
            terms: evaluated.terms,
        }
    }
}

/// One resource deduction that was committed.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ConsumedResource {
    pub kind: ConsumeKind,
    pub source: String,
    pub amount: u32,
    pub remaining: u32,
}

impl From<&ConsumptionPlan> for ConsumedResource {
    fn from(plan: &ConsumptionPlan) -> Self {
        Self {
            kind: plan.kind,
            source: plan.source.clone(),
            amount: plan.amount,
            remaining: plan.remaining,
        }
    }
}

/// The saving throw an item forces, with its resolved difficulty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SaveSummary {
    pub save_type: SaveType,

    /// `None` for an unowned item with an actor-derived DC.
    pub dc: Option<i32>,
}

/// The complete result of one ability use.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UsageReport {
    pub item: String,
    pub capabilities: Capabilities,
    pub attack: Option<RollSummary>,
    pub damage: Option<RollSummary>,
    pub save: Option<SaveSummary>,

    /// Non-damage effect lines, echoed for display.
    pub effects: Vec<String>,

    pub consumed: Vec<ConsumedResource>,

    /// Whether an area template placement was signalled.
    pub area_placed: bool,
}

/// Terminal state of one workflow invocation.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum UsageOutcome {
    /// The usage ran to completion.
    Completed(Box<UsageReport>),

    /// The usage stopped early; any state committed before the abort point
    /// stays committed (there is no rollback).
    Aborted(AbortReason),
}

impl UsageOutcome {
    /// The report, if the usage completed.
    pub fn report(&self) -> Option<&UsageReport> {
        match self {
            Self::Completed(report) => Some(report),
            Self::Aborted(_) => None,
        }
    }
}

/// Why a usage aborted.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AbortReason {
    /// The player dismissed the configuration dialog.
    Cancelled,

    /// Resource consumption failed; see the inner error for the warning to
    /// surface.
    Consume(ConsumeError),

    /// A consumable had neither uses nor quantity left.
    NoUsesRemaining { item: String },
}

impl AbortReason {
    /// User-visible warning text, empty for a plain cancellation.
    pub fn warning(&self) -> String {
        match self {
            Self::Cancelled => String::new(),
            Self::Consume(err) => err.to_string(),
            Self::NoUsesRemaining { item } => {
                format!("\"{item}\" has no uses or quantity remaining")
            }
        }
    }
}
