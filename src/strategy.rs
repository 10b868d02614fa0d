// Strategy rule cascade: the labeling oracle for tire condition records

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::compound::Compound;
use crate::record::{TireState, WearPattern};

/// Recommended course of action for the current tire set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Strategy {
    /// Box this lap, the tire is a safety or performance liability
    #[serde(rename = "PIT_NOW")]
    PitNow,
    /// Plan a stop within the next few laps
    #[serde(rename = "PIT_SOON")]
    PitSoon,
    /// Conditions support attacking on this tire
    #[serde(rename = "PUSH")]
    Push,
    /// Manage pace to protect the tire
    #[serde(rename = "CONSERVE")]
    Conserve,
    /// No action needed, keep watching
    #[serde(rename = "MONITOR")]
    Monitor,
}

impl Strategy {
    pub const ALL: [Strategy; 5] = [
        Strategy::PitNow,
        Strategy::PitSoon,
        Strategy::Push,
        Strategy::Conserve,
        Strategy::Monitor,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Strategy::PitNow => "PIT_NOW",
            Strategy::PitSoon => "PIT_SOON",
            Strategy::Push => "PUSH",
            Strategy::Conserve => "CONSERVE",
            Strategy::Monitor => "MONITOR",
        }
    }
}

impl Display for Strategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Everything a rule predicate may consult: the raw record plus the stint
/// fraction and the compound's own temperature window.
#[derive(Clone, Copy)]
pub struct RuleContext<'a> {
    pub state: &'a TireState,
    /// Lap number over the compound's expected life
    pub lap_percentage: f32,
    /// Optimal carcass temperature window for the fitted compound
    pub optimal_temp_min: i32,
    pub optimal_temp_max: i32,
}

impl<'a> RuleContext<'a> {
    pub fn for_state(state: &'a TireState) -> Self {
        let spec = state.compound.spec();
        RuleContext {
            state,
            lap_percentage: state.lap_number as f32 / spec.expected_life as f32,
            optimal_temp_min: spec.optimal_temp_range.0,
            optimal_temp_max: spec.optimal_temp_range.1,
        }
    }
}

/// One guard in the cascade, evaluated against a [`RuleContext`].
pub struct StrategyRule {
    pub name: &'static str,
    pub label: Strategy,
    pub applies: fn(&RuleContext) -> bool,
}

fn sidewall_deformation(ctx: &RuleContext) -> bool {
    ctx.state.sidewall_deformation
}

fn pressure_outside_safe_band(ctx: &RuleContext) -> bool {
    ctx.state.tyre_pressure < 17.0 || ctx.state.tyre_pressure > 24.0
}

fn stint_exhausted(ctx: &RuleContext) -> bool {
    ctx.lap_percentage >= 1.0
}

fn uneven_wear_late_stint(ctx: &RuleContext) -> bool {
    ctx.state.wear_pattern == WearPattern::Uneven && ctx.lap_percentage > 0.80
}

fn stint_nearly_exhausted(ctx: &RuleContext) -> bool {
    ctx.lap_percentage >= 0.85
}

fn overheating(ctx: &RuleContext) -> bool {
    ctx.state.tyre_temperature > ctx.optimal_temp_max + 15
}

fn soft_compound_graining(ctx: &RuleContext) -> bool {
    ctx.state.is_graining && ctx.state.compound == Compound::Soft && ctx.state.lap_number > 15
}

fn localized_wear_late_stint(ctx: &RuleContext) -> bool {
    matches!(
        ctx.state.wear_pattern,
        WearPattern::Center | WearPattern::Inner | WearPattern::Outer
    ) && ctx.lap_percentage > 0.75
}

fn push_window(ctx: &RuleContext) -> bool {
    ctx.lap_percentage < 0.60
        && ctx.state.wear_pattern == WearPattern::Even
        && ctx.state.tyre_temperature >= ctx.optimal_temp_min
        && ctx.state.tyre_temperature <= ctx.optimal_temp_max
        && !ctx.state.is_graining
        && ctx.state.tyre_pressure >= 19.0
        && ctx.state.tyre_pressure <= 21.5
}

fn degradation_phase(ctx: &RuleContext) -> bool {
    ctx.lap_percentage > 0.70 && ctx.lap_percentage < 0.85
}

fn hot_track(ctx: &RuleContext) -> bool {
    ctx.state.track_temperature > 40
}

fn early_stint_graining(ctx: &RuleContext) -> bool {
    ctx.state.is_graining && ctx.state.lap_number < 12
}

/// The cascade, ordered from most to least urgent. Evaluation walks the
/// table top to bottom and the first matching rule decides, so safety
/// triggers always preempt pace advice. Reordering entries changes labels.
pub static RULES: [StrategyRule; 12] = [
    StrategyRule {
        name: "sidewall_deformation",
        label: Strategy::PitNow,
        applies: sidewall_deformation,
    },
    StrategyRule {
        name: "pressure_outside_safe_band",
        label: Strategy::PitNow,
        applies: pressure_outside_safe_band,
    },
    StrategyRule {
        name: "stint_exhausted",
        label: Strategy::PitNow,
        applies: stint_exhausted,
    },
    StrategyRule {
        name: "uneven_wear_late_stint",
        label: Strategy::PitNow,
        applies: uneven_wear_late_stint,
    },
    StrategyRule {
        name: "stint_nearly_exhausted",
        label: Strategy::PitSoon,
        applies: stint_nearly_exhausted,
    },
    StrategyRule {
        name: "overheating",
        label: Strategy::PitSoon,
        applies: overheating,
    },
    StrategyRule {
        name: "soft_compound_graining",
        label: Strategy::PitSoon,
        applies: soft_compound_graining,
    },
    StrategyRule {
        name: "localized_wear_late_stint",
        label: Strategy::PitSoon,
        applies: localized_wear_late_stint,
    },
    StrategyRule {
        name: "push_window",
        label: Strategy::Push,
        applies: push_window,
    },
    StrategyRule {
        name: "degradation_phase",
        label: Strategy::Conserve,
        applies: degradation_phase,
    },
    StrategyRule {
        name: "hot_track",
        label: Strategy::Conserve,
        applies: hot_track,
    },
    StrategyRule {
        name: "early_stint_graining",
        label: Strategy::Conserve,
        applies: early_stint_graining,
    },
];

/// Labels a complete record. Total over valid records: when no rule in the
/// cascade fires, the answer is [`Strategy::Monitor`].
pub fn decide(state: &TireState) -> Strategy {
    let ctx = RuleContext::for_state(state);
    RULES
        .iter()
        .find(|rule| (rule.applies)(&ctx))
        .map(|rule| rule.label)
        .unwrap_or(Strategy::Monitor)
}

/// Labels a record and reports which rule fired, for explainability in
/// reports and tests. `None` means the cascade fell through to monitoring.
pub fn decide_with_rule(state: &TireState) -> (Strategy, Option<&'static str>) {
    let ctx = RuleContext::for_state(state);
    RULES
        .iter()
        .find(|rule| (rule.applies)(&ctx))
        .map(|rule| (rule.label, Some(rule.name)))
        .unwrap_or((Strategy::Monitor, None))
}
