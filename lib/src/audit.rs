//! # Audit sampling
//!
//! Keeps the full per card, per turn detail of a handful of passes so a
//! person can check the engine's verdicts by hand. Audited passes are
//! replayed from their own seed, so sampling never disturbs the passes
//! that feed the aggregate.
use crate::card::{ColorSet, ManaCost};
use crate::error::Error;
use crate::hand::{DeadReason, PassResult};
use rand::rngs::SmallRng;
use rand::seq::index;
use rand::SeedableRng;
use std::collections::BTreeMap;

/// The most passes an audit may retain
pub const MAX_AUDIT_PASSES: usize = 10;

// Keeps the audit generator apart from the pass generators derived from the same seed
const AUDIT_SEED_SALT: u64 = 0x6175_6469_745f_7061;

/// How audited pass indices are chosen
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSelection {
  First,
  Random,
}

impl Default for AuditSelection {
  fn default() -> Self {
    AuditSelection::Random
  }
}

/// Returns the sorted pass indices to audit, `min(simulations, audit_count, 10)` of them
pub fn pick_audit_passes(
  simulations: usize,
  audit_count: usize,
  seed: u64,
  selection: AuditSelection,
) -> Vec<usize> {
  let sample_size = audit_count.min(MAX_AUDIT_PASSES).min(simulations);
  if sample_size == simulations || selection == AuditSelection::First {
    return (0..sample_size).collect();
  }
  let mut rng = SmallRng::seed_from_u64(seed ^ AUDIT_SEED_SALT);
  let mut picked = index::sample(&mut rng, simulations, sample_size).into_vec();
  picked.sort_unstable();
  picked
}

/// The state of one card on one audited turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardAudit {
  pub uid: usize,
  pub card_name: String,
  pub is_land: bool,
  pub can_produce_mana: bool,
  pub turn_drawn: usize,
  /// Always true for lands and free sources
  pub is_castable: bool,
  pub source_available: bool,
  pub cost: ManaCost,
  pub producible_colors: ColorSet,
  pub dead_reason: Option<DeadReason>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnAudit {
  pub turn: usize,
  pub available_sources: usize,
  pub available_colors: ColorSet,
  pub dead_count: usize,
  pub cards: Vec<CardAudit>,
}

/// PassRecord is the retained detail of one audited pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassRecord {
  pub pass_index: usize,
  pub turns: Vec<TurnAudit>,
}

impl PassRecord {
  pub fn from_pass(pass: &PassResult) -> Result<Self, Error> {
    let mut turns = Vec::with_capacity(pass.turns.len());
    for turn in &pass.turns {
      let mut cards = Vec::with_capacity(turn.outcomes.len());
      for outcome in &turn.outcomes {
        let card = pass.card(outcome.uid).ok_or_else(|| {
          Error::InternalInvariant(format!(
            "pass {} turn {} refers to unknown card {}",
            pass.pass_index, turn.turn, outcome.uid
          ))
        })?;
        cards.push(CardAudit {
          uid: card.uid,
          card_name: card.spec.encoding.clone(),
          is_land: card.spec.is_land,
          can_produce_mana: card.spec.is_source(),
          turn_drawn: card.turn_drawn,
          is_castable: outcome.castable.unwrap_or(true),
          source_available: outcome.source_available,
          cost: card.spec.cost,
          producible_colors: card.spec.producible_colors,
          dead_reason: outcome.dead_reason,
        });
      }
      turns.push(TurnAudit {
        turn: turn.turn,
        available_sources: turn.available_sources,
        available_colors: turn.available_colors,
        dead_count: turn.dead_count,
        cards,
      });
    }
    Ok(PassRecord {
      pass_index: pass.pass_index,
      turns,
    })
  }
}

/// Runs `run_fn` for each picked pass index and keeps the records
pub fn sample_passes<'a, F>(
  run_fn: F,
  simulations: usize,
  audit_count: usize,
  seed: u64,
  selection: AuditSelection,
) -> Result<BTreeMap<usize, PassRecord>, Error>
where
  F: Fn(usize) -> Result<PassResult<'a>, Error>,
{
  let mut records = BTreeMap::new();
  for pass_index in pick_audit_passes(simulations, audit_count, seed, selection) {
    debug!("Auditing pass {}", pass_index);
    let pass = run_fn(pass_index)?;
    records.insert(pass_index, PassRecord::from_pass(&pass)?);
  }
  Ok(records)
}
