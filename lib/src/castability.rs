//! # Castability checks
//!
//! Decides whether a spell's cost can be paid from a set of available sources,
//! each of which supplies one mana of any color it can produce, and explains
//! why when it cannot.
use crate::bipartite::{maximum_bipartite_matching, MatchingScratch};
use crate::card::{ColorSet, ManaColor, ManaCost};

/// CastPolicy selects how colored pips compete for sources that can tap
/// for more than one of the required colors
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CastPolicy {
  /// Every color is checked on its own: a dual land counts toward both of its colors
  IndependentColors,
  /// Pips are assigned to distinct sources via maximum bipartite matching
  Matching,
}

impl Default for CastPolicy {
  fn default() -> Self {
    CastPolicy::IndependentColors
  }
}

/// LandDrops selects how many lands may pay for a spell on a given turn
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandDrops {
  /// Every available land counts, as if all of them had already been played
  Unlimited,
  /// At most `turn + 1` lands count on `turn`; cast mana spells are not limited
  OnePerTurn,
}

impl Default for LandDrops {
  fn default() -> Self {
    LandDrops::Unlimited
  }
}

impl LandDrops {
  /// Returns the most lands usable on `turn`, `None` if there is no limit
  #[inline]
  pub fn limit(self, turn: usize) -> Option<usize> {
    match self {
      LandDrops::Unlimited => None,
      LandDrops::OnePerTurn => Some(turn + 1),
    }
  }
}

/// One mana source available this turn
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Source {
  pub colors: ColorSet,
  /// Lands count against the land drop limit
  pub is_land: bool,
}

/// The outcome of one castability check
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Castability {
  pub castable: bool,
  /// Fewer usable sources than the total cost
  pub insufficient_mana: bool,
  /// Colors with fewer capable sources than pips
  pub missing_colors: ColorSet,
  /// Enough sources overall and per color, but not simultaneously (Matching only)
  pub color_contention: bool,
}

/// Returns the number of `sources` matching `filter` that can be used at once
/// when at most `land_limit` lands may be tapped
pub fn usable_count<F>(sources: &[Source], land_limit: Option<usize>, filter: F) -> usize
where
  F: Fn(&Source) -> bool,
{
  let lands = sources.iter().filter(|s| s.is_land && filter(s)).count();
  let others = sources.iter().filter(|s| !s.is_land && filter(s)).count();
  others + land_limit.map_or(lands, |limit| lands.min(limit))
}

/// Checks whether `cost` can be paid by `sources` when at most `land_limit`
/// of them may be lands
pub fn check(
  cost: &ManaCost,
  sources: &[Source],
  land_limit: Option<usize>,
  policy: CastPolicy,
  scratch: &mut MatchingScratch,
) -> Castability {
  let mut result = Castability::default();
  if cost.total() == 0 {
    result.castable = true;
    return result;
  }
  result.insufficient_mana = usable_count(sources, land_limit, |_| true) < cost.total();
  for color in cost.colors().iter() {
    let capable = usable_count(sources, land_limit, |s| s.colors.contains(color));
    if capable < cost.pips(color) as usize {
      result.missing_colors.insert(color);
    }
  }
  if result.insufficient_mana || !result.missing_colors.is_empty() {
    return result;
  }
  match policy {
    CastPolicy::IndependentColors => {
      result.castable = true;
    }
    CastPolicy::Matching => {
      let slots = payment_slots(cost, sources, land_limit);
      let matched = maximum_bipartite_matching(
        slots.len(),
        sources.len(),
        |slot, source| slots[slot].accepts(&sources[source]),
        scratch,
      );
      result.castable = matched == slots.len();
      result.color_contention = !result.castable;
    }
  }
  result
}

/// A unit of demand on the sources. `Idle` slots hold the lands that exceed
/// the land drop limit, so a full matching never taps more lands than allowed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Slot {
  Pip(ManaColor),
  Generic,
  Idle,
}

impl Slot {
  #[inline]
  fn accepts(self, source: &Source) -> bool {
    match self {
      Slot::Pip(color) => source.colors.contains(color),
      Slot::Generic => true,
      Slot::Idle => source.is_land,
    }
  }
}

fn payment_slots(cost: &ManaCost, sources: &[Source], land_limit: Option<usize>) -> Vec<Slot> {
  let mut slots: Vec<Slot> = pip_colors(cost).into_iter().map(Slot::Pip).collect();
  // Without a limit any leftover source covers the generic part, guaranteed by the total check
  if let Some(limit) = land_limit {
    let lands = sources.iter().filter(|s| s.is_land).count();
    slots.extend(std::iter::repeat(Slot::Generic).take(cost.generic as usize));
    slots.extend(std::iter::repeat(Slot::Idle).take(lands.saturating_sub(limit)));
  }
  slots
}

/// Expands a cost into one entry per colored pip
fn pip_colors(cost: &ManaCost) -> Vec<ManaColor> {
  let mut pips = Vec::with_capacity(cost.colored());
  for color in ManaColor::ALL.iter() {
    for _ in 0..cost.pips(*color) {
      pips.push(*color);
    }
  }
  pips
}
