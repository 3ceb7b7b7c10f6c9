//! # Single pass turn simulation
//!
//! One pass shuffles the deck, deals the opening hand as turn 0, deals one
//! card per later turn and decides, for every spell in hand on every turn,
//! whether it could have been cast with perfect prior sequencing of the
//! available sources.
use crate::bipartite::MatchingScratch;
use crate::card::{CardSpec, ColorSet};
use crate::castability::{self, CastPolicy, LandDrops, Source};
use crate::deck::{Deck, DeckSlot};
use crate::error::Error;
use rand::prelude::*;

/// The per pass parameters of the turn simulation
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassConfig {
  pub hand_size: usize,
  /// The last turn to simulate; turn 0 is the opening hand
  pub draws: usize,
  /// True if we play first, and so skip the draw on turn 1
  pub on_the_play: bool,
  pub cast_policy: CastPolicy,
  pub land_drops: LandDrops,
}

impl PassConfig {
  /// Returns true if a card is dealt at the start of `turn`
  #[inline]
  pub fn deals_on(&self, turn: usize) -> bool {
    turn >= 1 && !(turn == 1 && self.on_the_play)
  }

  /// Returns the number of cards dealt after the opening hand
  pub fn draw_count(&self) -> usize {
    (1..=self.draws).filter(|t| self.deals_on(*t)).count()
  }
}

/// CardInstance is one dealt, non-filler card of a pass
#[derive(Debug, Clone)]
pub struct CardInstance<'a> {
  pub uid: usize,
  pub spec: &'a CardSpec,
  /// 0 for the opening hand
  pub turn_drawn: usize,
  /// The first turn on which the card could be cast, for spells
  pub castable_since: Option<usize>,
}

impl<'a> CardInstance<'a> {
  /// Returns true if this card can supply mana on `turn`.
  /// Lands are ready when drawn, mana spells the turn after they are castable,
  /// and either one a turn later if it enters tapped.
  pub fn source_available(&self, turn: usize) -> bool {
    if !self.spec.is_source() {
      return false;
    }
    let ready = if self.spec.is_pure_source() {
      self.turn_drawn
    } else {
      match self.castable_since {
        Some(t) => t + 1,
        None => return false,
      }
    };
    let ready = if self.spec.enters_tapped { ready + 1 } else { ready };
    ready <= turn
  }
}

/// Why a spell could not be cast on a turn
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadReason {
  pub insufficient_mana: bool,
  pub missing_colors: ColorSet,
  pub color_contention: bool,
}

/// TurnOutcome is the state of one card in hand on one turn
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOutcome {
  pub uid: usize,
  /// `None` for lands and other free sources, which are never cast
  pub castable: Option<bool>,
  pub source_available: bool,
  pub dead_reason: Option<DeadReason>,
}

impl TurnOutcome {
  #[inline]
  pub fn is_dead(&self) -> bool {
    self.castable == Some(false)
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnRecord {
  pub turn: usize,
  /// Cards in hand, filler included
  pub hand_size: usize,
  /// Sources usable at once this turn, after the land drop limit
  pub available_sources: usize,
  pub available_colors: ColorSet,
  pub spells_in_hand: usize,
  pub dead_count: usize,
  pub outcomes: Vec<TurnOutcome>,
}

/// PassResult is the complete record of one simulated pass
#[derive(Debug, Clone)]
pub struct PassResult<'a> {
  pub pass_index: usize,
  /// Every non-filler card dealt, in deal order
  pub cards: Vec<CardInstance<'a>>,
  pub turns: Vec<TurnRecord>,
}

impl<'a> PassResult<'a> {
  pub fn card(&self, uid: usize) -> Option<&CardInstance<'a>> {
    self.cards.iter().find(|c| c.uid == uid)
  }

  /// Total dead spells summed over every turn
  pub fn dead_total(&self) -> usize {
    self.turns.iter().map(|t| t.dead_count).sum()
  }

  /// The last simulated turn
  pub fn final_turn(&self) -> usize {
    self.turns.last().map_or(0, |t| t.turn)
  }
}

/// Simulates one pass over `deck`. `rng` is the only source of randomness.
pub fn simulate_pass<'a, R: Rng + ?Sized>(
  deck: &'a Deck,
  config: &PassConfig,
  pass_index: usize,
  rng: &mut R,
) -> Result<PassResult<'a>, Error> {
  let mut library = deck.flatten();
  library.shuffle(rng);
  let mut library = library.into_iter();

  let mut hand: Vec<CardInstance<'a>> = Vec::with_capacity(config.hand_size + config.draws);
  let mut hand_size = 0;
  for _ in 0..config.hand_size {
    deal(&mut library, &mut hand, 0)?;
    hand_size += 1;
  }

  let mut turns = Vec::with_capacity(config.draws + 1);
  let mut scratch = MatchingScratch::new();
  let mut sources: Vec<(usize, Source)> = Vec::with_capacity(hand.capacity());
  let mut pool: Vec<Source> = Vec::with_capacity(hand.capacity());

  for turn in 0..=config.draws {
    if config.deals_on(turn) {
      deal(&mut library, &mut hand, turn)?;
      hand_size += 1;
    }

    // Sources are fixed for the whole turn; a spell becoming castable
    // this turn only adds its mana from the next turn on
    sources.clear();
    for card in &hand {
      if card.source_available(turn) {
        let source = Source {
          colors: card.spec.producible_colors,
          is_land: card.spec.is_land,
        };
        sources.push((card.uid, source));
      }
    }
    let land_limit = config.land_drops.limit(turn);
    pool.clear();
    pool.extend(sources.iter().map(|(_, source)| *source));
    let available_sources = castability::usable_count(&pool, land_limit, |_| true);
    let available_colors = sources
      .iter()
      .fold(ColorSet::new(), |acc, (_, source)| acc.union(source.colors));

    let mut outcomes = Vec::with_capacity(hand.len());
    let mut dead_count = 0;
    let mut spells_in_hand = 0;
    for card in hand.iter_mut() {
      let mut outcome = TurnOutcome {
        uid: card.uid,
        castable: None,
        source_available: card.source_available(turn),
        dead_reason: None,
      };
      if card.spec.is_spell() {
        spells_in_hand += 1;
        if card.castable_since.is_some() {
          // No re-check once castable
          outcome.castable = Some(true);
        } else {
          pool.clear();
          pool.extend(
            sources
              .iter()
              .filter(|(uid, _)| *uid != card.uid)
              .map(|(_, source)| *source),
          );
          let result = castability::check(
            &card.spec.cost,
            &pool,
            land_limit,
            config.cast_policy,
            &mut scratch,
          );
          if result.castable {
            card.castable_since = Some(turn);
            outcome.castable = Some(true);
          } else {
            dead_count += 1;
            outcome.castable = Some(false);
            outcome.dead_reason = Some(DeadReason {
              insufficient_mana: result.insufficient_mana,
              missing_colors: result.missing_colors,
              color_contention: result.color_contention,
            });
          }
        }
      }
      outcomes.push(outcome);
    }

    if dead_count > spells_in_hand {
      return Err(Error::InternalInvariant(format!(
        "pass {} turn {}: {} dead spells but only {} spells in hand",
        pass_index, turn, dead_count, spells_in_hand
      )));
    }
    turns.push(TurnRecord {
      turn,
      hand_size,
      available_sources,
      available_colors,
      spells_in_hand,
      dead_count,
      outcomes,
    });
  }

  Ok(PassResult {
    pass_index,
    cards: hand,
    turns,
  })
}

fn deal<'a, I>(library: &mut I, hand: &mut Vec<CardInstance<'a>>, turn: usize) -> Result<(), Error>
where
  I: Iterator<Item = DeckSlot<'a>>,
{
  let slot = library.next().ok_or_else(|| {
    Error::InternalInvariant(format!("deck ran out of cards on turn {}", turn))
  })?;
  if let Some(spec) = slot.spec {
    hand.push(CardInstance {
      uid: slot.uid,
      spec,
      turn_drawn: turn,
      castable_since: None,
    });
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use crate::castability::{CastPolicy, LandDrops};
  use crate::deck::Deck;
  use crate::hand::*;
  use rand::rngs::SmallRng;
  use rand::SeedableRng;
  use std::collections::BTreeMap;

  fn deck(spells: &[(&str, usize)], mana: &[(&str, usize)], total: usize) -> Deck {
    let spells: BTreeMap<_, _> = spells.iter().map(|(e, n)| (e.to_string(), *n)).collect();
    let mana: BTreeMap<_, _> = mana.iter().map(|(e, n)| (e.to_string(), *n)).collect();
    Deck::from_counts(&spells, &mana, total).unwrap()
  }

  fn config(hand_size: usize, draws: usize, on_the_play: bool) -> PassConfig {
    PassConfig {
      hand_size,
      draws,
      on_the_play,
      cast_policy: CastPolicy::IndependentColors,
      land_drops: LandDrops::Unlimited,
    }
  }

  fn run<'a>(deck: &'a Deck, config: &PassConfig, seed: u64) -> PassResult<'a> {
    let mut rng = SmallRng::seed_from_u64(seed);
    simulate_pass(deck, config, seed as usize, &mut rng).unwrap()
  }

  fn outcome<'r>(turn: &'r TurnRecord, uid: usize) -> &'r TurnOutcome {
    turn.outcomes.iter().find(|o| o.uid == uid).unwrap()
  }

  #[test]
  fn draw_schedule() {
    let d = deck(&[], &[], 40);
    let on_play = run(&d, &config(7, 3, true), 1);
    let sizes: Vec<_> = on_play.turns.iter().map(|t| t.hand_size).collect();
    assert_eq!(sizes, vec![7, 7, 8, 9]);
    let on_draw = run(&d, &config(7, 3, false), 1);
    let sizes: Vec<_> = on_draw.turns.iter().map(|t| t.hand_size).collect();
    assert_eq!(sizes, vec![7, 8, 9, 10]);
    assert_eq!(config(7, 3, true).draw_count(), 2);
    assert_eq!(config(7, 3, false).draw_count(), 3);
  }

  #[test]
  fn spell_without_sources_is_always_dead() {
    let d = deck(&[("2UB", 1)], &[], 40);
    let mut seen = 0;
    for seed in 0..200 {
      let pass = run(&d, &config(7, 3, true), seed);
      for turn in &pass.turns {
        for o in &turn.outcomes {
          seen += 1;
          assert!(o.is_dead());
          let reason = o.dead_reason.unwrap();
          assert!(reason.insufficient_mana);
          assert_eq!(reason.missing_colors.to_string(), "UB");
        }
      }
    }
    assert!(seen > 0);
  }

  #[test]
  fn blue_spell_with_blue_source_in_opening_hand() {
    let d = deck(&[("U", 1)], &[(">U", 5)], 40);
    let mut checked = 0;
    for seed in 0..500 {
      let pass = run(&d, &config(7, 0, true), seed);
      let turn0 = &pass.turns[0];
      let spell = pass.cards.iter().find(|c| c.spec.is_spell());
      let has_source = pass.cards.iter().any(|c| c.spec.is_source());
      if let (Some(spell), true) = (spell, has_source) {
        checked += 1;
        assert_eq!(outcome(turn0, spell.uid).castable, Some(true));
        assert_eq!(spell.castable_since, Some(0));
      }
    }
    assert!(checked > 0);
  }

  #[test]
  fn tapped_source_waits_one_turn() {
    let d = deck(&[], &[(">UT", 10)], 20);
    for seed in 0..50 {
      let pass = run(&d, &config(3, 6, false), seed);
      for card in &pass.cards {
        for turn in &pass.turns {
          let o = outcome_opt(turn, card.uid);
          if let Some(o) = o {
            assert_eq!(o.source_available, turn.turn > card.turn_drawn);
            assert_eq!(o.castable, None);
          }
        }
      }
    }
  }

  fn outcome_opt(turn: &TurnRecord, uid: usize) -> Option<&TurnOutcome> {
    turn.outcomes.iter().find(|o| o.uid == uid)
  }

  #[test]
  fn mana_spell_becomes_a_source_next_turn() {
    // Everything is in the opening hand, so the shuffle does not matter
    let d = deck(&[("G>G", 1), ("2G", 1)], &[(">G", 2)], 6);
    let pass = run(&d, &config(6, 1, true), 7);
    let elf = pass.cards.iter().find(|c| c.spec.encoding == "G>G").unwrap();
    let big = pass.cards.iter().find(|c| c.spec.encoding == "2G").unwrap();
    assert_eq!(elf.castable_since, Some(0));
    assert_eq!(pass.turns[0].available_sources, 2);
    assert_eq!(pass.turns[1].available_sources, 3);
    assert!(outcome(&pass.turns[0], big.uid).is_dead());
    assert_eq!(outcome(&pass.turns[1], big.uid).castable, Some(true));
    assert_eq!(big.castable_since, Some(1));
  }

  #[test]
  fn mana_spell_never_pays_for_itself() {
    let d = deck(&[("G>G", 1)], &[], 3);
    let pass = run(&d, &config(3, 1, true), 3);
    assert_eq!(pass.turns.len(), 2);
    for turn in &pass.turns {
      assert_eq!(turn.dead_count, 1);
      assert_eq!(turn.available_sources, 0);
    }
  }

  #[test]
  fn free_spell_is_castable() {
    let d = deck(&[("0", 3)], &[], 3);
    let pass = run(&d, &config(3, 0, true), 0);
    assert_eq!(pass.turns[0].dead_count, 0);
    assert_eq!(pass.turns[0].spells_in_hand, 3);
  }

  #[test]
  fn pass_invariants_hold() {
    let d = deck(
      &[("2UB", 4), ("1G>G", 4), ("WW", 4), ("4*2R", 2), ("1U", 4)],
      &[(">UB", 4), (">W", 4), (">RT", 3), (">G", 4), (">*T", 2)],
      40,
    );
    for seed in 0..100 {
      for policy in &[CastPolicy::IndependentColors, CastPolicy::Matching] {
        let mut c = config(7, 8, seed % 2 == 0);
        c.cast_policy = *policy;
        let pass = run(&d, &c, seed);
        assert_eq!(pass.turns.len(), 9);
        for card in &pass.cards {
          let mut castable_seen = false;
          for turn in &pass.turns {
            if let Some(o) = outcome_opt(turn, card.uid) {
              if castable_seen {
                assert_eq!(o.castable, Some(true));
              }
              if o.castable == Some(true) {
                castable_seen = true;
              }
              if card.spec.is_pure_source() {
                assert!(!o.is_dead());
              }
            }
          }
        }
        for turn in &pass.turns {
          assert!(turn.dead_count <= turn.spells_in_hand);
          assert!(turn.available_sources <= turn.hand_size);
        }
      }
    }
  }

  #[test]
  fn deck_running_out_is_an_internal_error() {
    let d = deck(&[], &[], 3);
    let mut rng = SmallRng::seed_from_u64(0);
    let err = simulate_pass(&d, &config(3, 2, false), 0, &mut rng).unwrap_err();
    match err {
      Error::InternalInvariant(_) => {}
      other => panic!("unexpected {:?}", other),
    }
  }

  // Everything is in the opening hand; the spell needs the tapped land
  #[test]
  fn spell_waits_for_tapped_source() {
    let d = deck(&[("1U", 1)], &[(">U", 1), (">UT", 1)], 3);
    let pass = run(&d, &config(3, 1, true), 5);
    let spell = pass.cards.iter().find(|c| c.spec.is_spell()).unwrap();
    let tapped = pass.cards.iter().find(|c| c.spec.enters_tapped).unwrap();
    assert_eq!(tapped.turn_drawn, 0);
    assert!(!outcome(&pass.turns[0], tapped.uid).source_available);
    assert!(outcome(&pass.turns[1], tapped.uid).source_available);
    assert_eq!(pass.turns[0].available_sources, 1);
    assert_eq!(pass.turns[1].available_sources, 2);
    let dead = outcome(&pass.turns[0], spell.uid).dead_reason.unwrap();
    assert!(dead.insufficient_mana);
    assert_eq!(outcome(&pass.turns[1], spell.uid).castable, Some(true));
    assert_eq!(spell.castable_since, Some(tapped.turn_drawn + 1));
  }

  #[test]
  fn one_land_per_turn_delays_a_five_drop() {
    let d = deck(&[("4G", 1)], &[(">G", 10)], 14);
    let mut c = config(7, 5, true);
    c.land_drops = LandDrops::OnePerTurn;
    let mut checked = 0;
    for seed in 0..300 {
      let pass = run(&d, &c, seed);
      let spell = match pass.cards.iter().find(|c| c.spec.is_spell()) {
        Some(spell) if spell.turn_drawn == 0 => spell,
        _ => continue,
      };
      let opening_lands = pass
        .cards
        .iter()
        .filter(|c| c.spec.is_land && c.turn_drawn == 0)
        .count();
      if opening_lands < 5 {
        continue;
      }
      checked += 1;
      for turn in 0..=3 {
        assert!(outcome(&pass.turns[turn], spell.uid).is_dead());
        assert_eq!(pass.turns[turn].available_sources, turn + 1);
      }
      assert_eq!(outcome(&pass.turns[4], spell.uid).castable, Some(true));
      assert_eq!(spell.castable_since, Some(4));

      let mut unlimited = c;
      unlimited.land_drops = LandDrops::Unlimited;
      let pass = run(&d, &unlimited, seed);
      let spell = pass.cards.iter().find(|c| c.spec.is_spell()).unwrap();
      assert_eq!(spell.castable_since, Some(0));
    }
    assert!(checked > 0);
  }

  #[test]
  fn land_limit_does_not_cap_mana_spells() {
    let d = deck(&[("G>G", 2), ("3G", 1)], &[(">G", 2)], 5);
    let mut c = config(5, 1, true);
    c.land_drops = LandDrops::OnePerTurn;
    let pass = run(&d, &c, 2);
    // Turn 0: one land drop casts both elves. Turn 1: two lands and two elves.
    assert_eq!(pass.turns[0].available_sources, 1);
    assert_eq!(pass.turns[1].available_sources, 4);
    let big = pass.cards.iter().find(|c| c.spec.encoding == "3G").unwrap();
    assert!(outcome(&pass.turns[0], big.uid).is_dead());
    assert_eq!(big.castable_since, Some(1));
  }
}
