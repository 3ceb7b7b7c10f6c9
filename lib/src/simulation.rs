//! # Simulation engine and aggregate statistics
use crate::card::{ColorSet, ManaColor};
use crate::castability::{CastPolicy, LandDrops};
use crate::deck::Deck;
use crate::error::Error;
use crate::hand::{simulate_pass, PassConfig, PassResult};
use rand::prelude::*;
use rand::rngs::SmallRng;
use std::collections::BTreeMap;

/// Upper bound on passes per request
pub const MAX_SIMULATIONS: usize = 1_000_000;
/// Upper bound on simulated turns per pass
pub const MAX_DRAWS: usize = 100;
/// Upper bound on cards in a deck, filler included
pub const MAX_DECK_SIZE: usize = 10_000;

pub struct SimulationConfig<'a> {
  pub deck: &'a Deck,
  pub hand_size: usize,
  pub draws: usize,
  pub run_count: usize,
  pub seed: u64,
  pub on_the_play: bool,
  pub cast_policy: CastPolicy,
  pub land_drops: LandDrops,
}

impl<'a> SimulationConfig<'a> {
  pub fn validate(&self) -> Result<(), Error> {
    if self.run_count == 0 {
      return Err(Error::invalid("simulations", self.run_count, "must be positive"));
    }
    if self.run_count > MAX_SIMULATIONS {
      return Err(Error::invalid(
        "simulations",
        self.run_count,
        format!("must be at most {}", MAX_SIMULATIONS),
      ));
    }
    if self.draws > MAX_DRAWS {
      return Err(Error::invalid(
        "draws",
        self.draws,
        format!("must be at most {}", MAX_DRAWS),
      ));
    }
    if self.deck.len() > MAX_DECK_SIZE {
      return Err(Error::invalid(
        "total_deck_size",
        self.deck.len(),
        format!("must be at most {}", MAX_DECK_SIZE),
      ));
    }
    if self.hand_size.saturating_add(self.draws) > self.deck.len() {
      return Err(Error::invalid(
        "hand_size",
        self.hand_size,
        format!(
          "hand size plus {} draws exceeds the {} card deck",
          self.draws,
          self.deck.len()
        ),
      ));
    }
    Ok(())
  }

  pub fn pass_config(&self) -> PassConfig {
    PassConfig {
      hand_size: self.hand_size,
      draws: self.draws,
      on_the_play: self.on_the_play,
      cast_policy: self.cast_policy,
      land_drops: self.land_drops,
    }
  }

  /// Runs pass `pass_index` with its own generator, so the same pass
  /// can be replayed in isolation
  pub fn run_pass(&self, pass_index: usize) -> Result<PassResult<'a>, Error> {
    let mut rng = SmallRng::seed_from_u64(pass_seed(self.seed, pass_index));
    simulate_pass(self.deck, &self.pass_config(), pass_index, &mut rng)
  }
}

/// Derives the seed of pass `pass_index` from the run seed (splitmix64 finalizer)
pub fn pass_seed(seed: u64, pass_index: usize) -> u64 {
  let mut z = seed.wrapping_add((pass_index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15));
  z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
  z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
  z ^ (z >> 31)
}

/// Per turn tallies across all passes
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnTally {
  pub turn: usize,
  /// `dead_histogram[n]` is the number of passes with exactly n dead spells on this turn
  pub dead_histogram: Vec<u64>,
  pub dead_total: u64,
  /// Dead spells blamed on each color, indexed by `ManaColor::index`
  pub missing_colors: [u64; 5],
}

impl TurnTally {
  fn new(turn: usize) -> Self {
    Self {
      turn,
      ..Self::default()
    }
  }

  fn record(&mut self, dead_count: usize) {
    if self.dead_histogram.len() <= dead_count {
      self.dead_histogram.resize(dead_count + 1, 0);
    }
    self.dead_histogram[dead_count] += 1;
    self.dead_total += dead_count as u64;
  }

  pub fn passes(&self) -> u64 {
    self.dead_histogram.iter().sum()
  }

  pub fn zero_dead(&self) -> u64 {
    self.dead_histogram.first().copied().unwrap_or(0)
  }

  /// Fraction of passes with at least one dead spell on this turn
  pub fn p_dead(&self) -> f64 {
    let passes = self.passes();
    if passes == 0 {
      return 0.0;
    }
    (passes - self.zero_dead()) as f64 / passes as f64
  }

  pub fn missing(&self, color: ManaColor) -> u64 {
    self.missing_colors[color.index()]
  }
}

/// Per spell tallies across all passes, one entry per spell copy dealt
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellTally {
  pub appearances: u64,
  pub never_castable: u64,
  /// Number of copies first castable on each turn
  pub first_castable_turn: BTreeMap<usize, u64>,
  /// Turns spent dead in hand before first castable. Copies that never
  /// became castable count every turn they were held.
  pub delay: BTreeMap<usize, u64>,
}

impl SpellTally {
  pub fn expected_delay(&self) -> f64 {
    if self.appearances == 0 {
      return 0.0;
    }
    let sum: u64 = self.delay.iter().map(|(d, n)| *d as u64 * n).sum();
    sum as f64 / self.appearances as f64
  }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateStats {
  pub passes: u64,
  pub passes_zero_dead: u64,
  pub turns: Vec<TurnTally>,
  /// Keyed by spell encoding
  pub spells: BTreeMap<String, SpellTally>,
  /// Colors required by at least one spell in the deck
  pub cost_colors: ColorSet,
}

impl AggregateStats {
  pub fn new(deck: &Deck, draws: usize) -> Self {
    let cost_colors = deck
      .iter()
      .filter(|c| c.spec.is_spell())
      .fold(ColorSet::new(), |acc, c| acc.union(c.spec.cost.colors()));
    Self {
      passes: 0,
      passes_zero_dead: 0,
      turns: (0..=draws).map(TurnTally::new).collect(),
      spells: BTreeMap::new(),
      cost_colors,
    }
  }

  /// Folds one pass into the tallies
  pub fn accumulate(&mut self, pass: &PassResult) -> Result<(), Error> {
    if pass.turns.len() != self.turns.len() {
      return Err(Error::InternalInvariant(format!(
        "pass {} simulated {} turns, expected {}",
        pass.pass_index,
        pass.turns.len(),
        self.turns.len()
      )));
    }
    self.passes += 1;
    if pass.dead_total() == 0 {
      self.passes_zero_dead += 1;
    }
    for (tally, turn) in self.turns.iter_mut().zip(&pass.turns) {
      tally.record(turn.dead_count);
      for outcome in &turn.outcomes {
        if let Some(reason) = &outcome.dead_reason {
          for color in reason.missing_colors.iter() {
            tally.missing_colors[color.index()] += 1;
          }
        }
      }
    }
    let final_turn = pass.final_turn();
    for card in pass.cards.iter().filter(|c| c.spec.is_spell()) {
      let tally = self
        .spells
        .entry(card.spec.encoding.clone())
        .or_insert_with(SpellTally::default);
      tally.appearances += 1;
      let delay = match card.castable_since {
        Some(turn) => {
          *tally.first_castable_turn.entry(turn).or_insert(0) += 1;
          turn - card.turn_drawn
        }
        None => {
          tally.never_castable += 1;
          final_turn - card.turn_drawn + 1
        }
      };
      *tally.delay.entry(delay).or_insert(0) += 1;
    }
    Ok(())
  }

  /// Number of (pass, turn) pairs observed
  pub fn turn_observations(&self) -> u64 {
    self.passes * self.turns.len() as u64
  }

  pub fn pct_turns_zero_dead(&self) -> f64 {
    let total = self.turn_observations();
    if total == 0 {
      return 0.0;
    }
    let zero: u64 = self.turns.iter().map(|t| t.zero_dead()).sum();
    zero as f64 / total as f64
  }

  pub fn pct_runs_zero_dead(&self) -> f64 {
    if self.passes == 0 {
      return 0.0;
    }
    self.passes_zero_dead as f64 / self.passes as f64
  }

  pub fn expected_dead_per_turn(&self) -> f64 {
    let total = self.turn_observations();
    if total == 0 {
      return 0.0;
    }
    let dead: u64 = self.turns.iter().map(|t| t.dead_total).sum();
    dead as f64 / total as f64
  }

  /// Missing color tallies summed over every turn
  pub fn missing_totals(&self) -> [u64; 5] {
    let mut totals = [0; 5];
    for tally in &self.turns {
      for (total, n) in totals.iter_mut().zip(tally.missing_colors.iter()) {
        *total += n;
      }
    }
    totals
  }

  /// The color most often blamed for a dead spell. Ties go to the earlier color in WUBRG.
  pub fn most_desired_color(&self) -> Option<ManaColor> {
    let totals = self.missing_totals();
    let mut best: Option<(ManaColor, u64)> = None;
    for color in ManaColor::ALL.iter() {
      let n = totals[color.index()];
      if n > 0 && best.map_or(true, |(_, m)| n > m) {
        best = Some((*color, n));
      }
    }
    best.map(|(c, _)| c)
  }

  /// The color least often blamed, among colors some spell actually needs
  pub fn least_desired_color(&self) -> Option<ManaColor> {
    let totals = self.missing_totals();
    let mut best: Option<(ManaColor, u64)> = None;
    for color in self.cost_colors.iter() {
      let n = totals[color.index()];
      if best.map_or(true, |(_, m)| n < m) {
        best = Some((color, n));
      }
    }
    best.map(|(c, _)| c)
  }
}

/// Simulation runs every pass of a request and keeps the aggregate
#[derive(Debug)]
pub struct Simulation {
  pub seed: u64,
  pub pass_config: PassConfig,
  pub stats: AggregateStats,
}

impl Simulation {
  pub fn from_config(config: &SimulationConfig) -> Result<Self, Error> {
    config.validate()?;
    info!(
      "Simulating {} passes: hand_size={} draws={} on_the_play={} seed={} policy={:?} land_drops={:?}",
      config.run_count,
      config.hand_size,
      config.draws,
      config.on_the_play,
      config.seed,
      config.cast_policy,
      config.land_drops
    );
    let mut stats = AggregateStats::new(config.deck, config.draws);
    for pass_index in 0..config.run_count {
      let pass = config.run_pass(pass_index)?;
      stats.accumulate(&pass)?;
    }
    info!(
      "Simulated {} passes, {:.3} expected dead spells per turn",
      stats.passes,
      stats.expected_dead_per_turn()
    );
    Ok(Simulation {
      seed: config.seed,
      pass_config: config.pass_config(),
      stats,
    })
  }
}

/// Runs every pass described by `config` and returns the aggregate
pub fn aggregate(config: &SimulationConfig) -> Result<AggregateStats, Error> {
  Simulation::from_config(config).map(|sim| sim.stats)
}
