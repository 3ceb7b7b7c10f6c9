//! # Front end interface
//!
//! Defines the single request/response operation exposed to the presentation
//! layer, natively through [`run`] and to JavaScript through `deadspells_run`.
use crate::audit::{sample_passes, AuditSelection, PassRecord};
use crate::castability::{CastPolicy, LandDrops};
use crate::deck::Deck;
use crate::error::Error;
use crate::export::{
    distribution_series, missing_color_series, spell_cost_table, spell_delay_series, summary,
    turn_summary_series, DistributionPoint, MissingColorPoint, SpellCostRow, SpellDelayPoint,
    Summary, TurnSummaryPoint,
};
use crate::simulation::{AggregateStats, Simulation, SimulationConfig};

use rand::Rng;
use std::collections::BTreeMap;
use std::convert::TryFrom;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsValue;

/// Input format expected from the presentation layer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Input {
    /// Spell encodings and their counts
    pub spell_counts: BTreeMap<String, i64>,
    /// Mana source encodings and their counts
    pub mana_counts: BTreeMap<String, i64>,
    /// Cards not listed in either mapping are filler
    pub total_deck_size: i64,
    pub hand_size: i64,
    /// The number of turns simulated after the opening hand
    pub draws: i64,
    /// The number of passes to perform
    pub simulations: i64,
    /// Drawn from entropy and reported back in `Output::seed` when absent
    pub seed: Option<u64>,
    /// True if we play first, false if we play second
    pub on_the_play: bool,
    pub audit_count: i64,
    pub audit_selection: AuditSelection,
    pub cast_policy: CastPolicy,
    /// Lands beyond one per turn stay in hand under `one_per_turn`
    pub land_drops: LandDrops,
}

impl Default for Input {
    fn default() -> Self {
        Self {
            spell_counts: BTreeMap::new(),
            mana_counts: BTreeMap::new(),
            total_deck_size: 40,
            hand_size: 7,
            draws: 10,
            simulations: 10_000,
            seed: None,
            on_the_play: true,
            audit_count: 10,
            audit_selection: AuditSelection::default(),
            cast_policy: CastPolicy::default(),
            land_drops: LandDrops::default(),
        }
    }
}

/// Output format returned to the presentation layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Output {
    /// The seed the run used, so it can be reproduced
    pub seed: u64,
    pub deck_size: usize,
    pub spell_count: usize,
    pub source_count: usize,
    pub summary: Summary,
    pub stats: AggregateStats,
    pub distribution_series: Vec<DistributionPoint>,
    pub missing_color_series: Vec<MissingColorPoint>,
    pub spell_delay_series: Vec<SpellDelayPoint>,
    pub turn_summary_series: Vec<TurnSummaryPoint>,
    pub cost_table: Vec<SpellCostRow>,
    pub audit: BTreeMap<usize, PassRecord>,
}

/// The failure object handed to JavaScript in place of an `Output`
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorReport {
    pub error: String,
    pub field: Option<String>,
    pub value: Option<String>,
}

impl From<&Error> for ErrorReport {
    fn from(e: &Error) -> Self {
        let (field, value) = match e.field() {
            Some((f, v)) => (Some(f), Some(v)),
            None => (None, None),
        };
        Self {
            error: e.to_string(),
            field,
            value,
        }
    }
}

/// Runs a simulation given input
/// Returns a serialized `Output`, or a serialized `ErrorReport` when the input is rejected
/// # Example
///
///  ```js
///  const input = {spell_counts: {"2UB": 4}, mana_counts: {">U": 9, ">B": 8}};
///  const output = require('deadspells').deadspells_run(input);
///  console.log(output);
///  ```
#[wasm_bindgen]
pub fn deadspells_run(input: &JsValue) -> JsValue {
    let input: Input = match input.into_serde() {
        Err(e) => {
            return JsValue::from_str(&format!("Error deserializing simulation inputs: {}", e));
        }
        Ok(v) => v,
    };
    let serialized = match run(&input) {
        Ok(output) => JsValue::from_serde(&output),
        Err(e) => JsValue::from_serde(&ErrorReport::from(&e)),
    };
    match serialized {
        Ok(v) => v,
        Err(e) => JsValue::from_str(&format!("Error serializing simulation outputs: {}", e)),
    }
}

fn non_negative(name: &str, value: i64) -> Result<usize, Error> {
    if value < 0 {
        return Err(Error::invalid(name, value, "must not be negative"));
    }
    usize::try_from(value).map_err(|_| Error::invalid(name, value, "is too large"))
}

fn counts(
    kind: &str,
    counts: &BTreeMap<String, i64>,
) -> Result<BTreeMap<String, usize>, Error> {
    counts
        .iter()
        .map(|(encoding, n)| {
            let n = non_negative(&format!("{}[{:?}]", kind, encoding), *n)?;
            Ok((encoding.clone(), n))
        })
        .collect()
}

/// Validates `input`, runs every pass and reshapes the aggregate for charting.
/// Nothing is simulated unless the whole input is valid.
pub fn run(input: &Input) -> Result<Output, Error> {
    let spell_counts = counts("spell_counts", &input.spell_counts)?;
    let mana_counts = counts("mana_counts", &input.mana_counts)?;
    let total_deck_size = non_negative("total_deck_size", input.total_deck_size)?;
    let hand_size = non_negative("hand_size", input.hand_size)?;
    let draws = non_negative("draws", input.draws)?;
    let simulations = non_negative("simulations", input.simulations)?;
    let audit_count = non_negative("audit_count", input.audit_count)?;

    let deck = Deck::from_counts(&spell_counts, &mana_counts, total_deck_size)?;
    let seed = match input.seed {
        Some(seed) => seed,
        None => {
            let seed: u64 = rand::thread_rng().gen();
            warn!("No seed given, drew {} from entropy", seed);
            seed
        }
    };
    let config = SimulationConfig {
        deck: &deck,
        hand_size,
        draws,
        run_count: simulations,
        seed,
        on_the_play: input.on_the_play,
        cast_policy: input.cast_policy,
        land_drops: input.land_drops,
    };
    let sim = Simulation::from_config(&config)?;
    let audit = sample_passes(
        |pass_index| config.run_pass(pass_index),
        simulations,
        audit_count,
        seed,
        input.audit_selection,
    )?;

    Ok(Output {
        seed,
        deck_size: deck.len(),
        spell_count: deck.spell_count(),
        source_count: deck.source_count(),
        summary: summary(&sim.stats),
        distribution_series: distribution_series(&sim.stats),
        missing_color_series: missing_color_series(&sim.stats),
        spell_delay_series: spell_delay_series(&sim.stats),
        turn_summary_series: turn_summary_series(&sim.stats),
        cost_table: spell_cost_table(&deck),
        stats: sim.stats,
        audit,
    })
}
