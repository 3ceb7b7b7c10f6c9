//! # Chart series and summary statistics
//!
//! Pure reshaping of `AggregateStats` into the flat rows the charts consume.
use crate::card::{ManaColor, ManaCost};
use crate::deck::Deck;
use crate::simulation::AggregateStats;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
  pub passes: u64,
  pub turns_per_pass: usize,
  pub pct_turns_zero_dead: f64,
  pub pct_runs_zero_dead: f64,
  pub expected_dead_per_turn: f64,
  pub most_desired_color: Option<ManaColor>,
  pub least_desired_color: Option<ManaColor>,
}

/// How often `dead_spells` spells were dead on `turn`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionPoint {
  pub turn: usize,
  pub turn_label: String,
  pub dead_spells: usize,
  pub frequency: u64,
  pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingColorPoint {
  pub turn: usize,
  pub turn_label: String,
  pub color: ManaColor,
  pub count: u64,
  /// Average number of spells per pass dead for want of this color
  pub avg_missing: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnSummaryPoint {
  pub turn: usize,
  pub turn_label: String,
  pub p_dead: f64,
  pub avg_missing: BTreeMap<ManaColor, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellDelayPoint {
  pub card_name: String,
  /// Turns spent dead in hand before first castable
  pub delay: usize,
  pub count: u64,
  /// Share of this spell's appearances with this delay
  pub frac: f64,
  pub expected_delay: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellCostRow {
  pub card_name: String,
  pub cost: ManaCost,
  pub count: usize,
}

fn turn_label(turn: usize) -> String {
  turn.to_string()
}

pub fn summary(stats: &AggregateStats) -> Summary {
  Summary {
    passes: stats.passes,
    turns_per_pass: stats.turns.len(),
    pct_turns_zero_dead: stats.pct_turns_zero_dead(),
    pct_runs_zero_dead: stats.pct_runs_zero_dead(),
    expected_dead_per_turn: stats.expected_dead_per_turn(),
    most_desired_color: stats.most_desired_color(),
    least_desired_color: stats.least_desired_color(),
  }
}

/// Turn indexed distribution of dead spell counts; counts never observed are omitted
pub fn distribution_series(stats: &AggregateStats) -> Vec<DistributionPoint> {
  let mut rows = Vec::new();
  for tally in &stats.turns {
    let passes = tally.passes();
    for (dead_spells, frequency) in tally.dead_histogram.iter().enumerate() {
      if *frequency == 0 {
        continue;
      }
      rows.push(DistributionPoint {
        turn: tally.turn,
        turn_label: turn_label(tally.turn),
        dead_spells,
        frequency: *frequency,
        percent: *frequency as f64 / passes as f64,
      });
    }
  }
  rows
}

/// Turn and color indexed missing color frequencies
pub fn missing_color_series(stats: &AggregateStats) -> Vec<MissingColorPoint> {
  let passes = stats.passes.max(1) as f64;
  let mut rows = Vec::with_capacity(stats.turns.len() * ManaColor::ALL.len());
  for tally in &stats.turns {
    for color in ManaColor::ALL.iter() {
      let count = tally.missing(*color);
      rows.push(MissingColorPoint {
        turn: tally.turn,
        turn_label: turn_label(tally.turn),
        color: *color,
        count,
        avg_missing: count as f64 / passes,
      });
    }
  }
  rows
}

pub fn turn_summary_series(stats: &AggregateStats) -> Vec<TurnSummaryPoint> {
  let passes = stats.passes.max(1) as f64;
  stats
    .turns
    .iter()
    .map(|tally| TurnSummaryPoint {
      turn: tally.turn,
      turn_label: turn_label(tally.turn),
      p_dead: tally.p_dead(),
      avg_missing: ManaColor::ALL
        .iter()
        .map(|c| (*c, tally.missing(*c) as f64 / passes))
        .collect(),
    })
    .collect()
}

/// Spell indexed table of turns spent dead before first castable,
/// spells with the longest expected delay first
pub fn spell_delay_series(stats: &AggregateStats) -> Vec<SpellDelayPoint> {
  let mut spells: Vec<_> = stats.spells.iter().collect();
  spells.sort_by(|a, b| {
    b.1
      .expected_delay()
      .partial_cmp(&a.1.expected_delay())
      .unwrap_or(std::cmp::Ordering::Equal)
      .then_with(|| a.0.cmp(b.0))
  });
  let mut rows = Vec::new();
  for (name, tally) in spells {
    let expected_delay = tally.expected_delay();
    for (delay, count) in &tally.delay {
      rows.push(SpellDelayPoint {
        card_name: name.clone(),
        delay: *delay,
        count: *count,
        frac: *count as f64 / tally.appearances as f64,
        expected_delay,
      });
    }
  }
  rows
}

/// The cost of every distinct spell in the deck, for drawing pips next to the delay chart
pub fn spell_cost_table(deck: &Deck) -> Vec<SpellCostRow> {
  deck
    .iter()
    .filter(|c| c.spec.is_spell())
    .map(|c| SpellCostRow {
      card_name: c.spec.encoding.clone(),
      cost: c.spec.cost,
      count: c.count,
    })
    .collect()
}
