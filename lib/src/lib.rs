//! # Dead Spell Simulation Library
//!
//! deadspells estimates how often a deck's mana base leaves spells stuck in hand.
//! Cards are described by a compact encoding of what they cost and what mana
//! they produce (see [`parse_card_spec`]). Thousands of shuffled passes are
//! simulated turn by turn and folded into per turn distributions, per color
//! blame tallies and a small audit trail of individual passes.
//!
//! ```
//! use deadspells::frontend::Input;
//!
//! let input = Input {
//!   spell_counts: vec![("1U".to_string(), 8), ("BB".to_string(), 6)].into_iter().collect(),
//!   mana_counts: vec![(">U".to_string(), 9), (">B".to_string(), 8)].into_iter().collect(),
//!   simulations: 100,
//!   seed: Some(7),
//!   ..Input::default()
//! };
//! let output = deadspells::run(&input).unwrap();
//! assert_eq!(output.stats.passes, 100);
//! ```

#[macro_use]
extern crate serde_derive;
extern crate serde;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
extern crate rand;
extern crate regex;
extern crate wasm_bindgen;

pub mod audit;
pub mod bipartite;
pub mod card;
pub mod castability;
pub mod deck;
pub mod error;
pub mod export;
pub mod frontend;
pub mod hand;
pub mod parse_card_spec;
pub mod simulation;

pub use crate::error::Error;
pub use crate::frontend::run;
pub use crate::parse_card_spec::parse_card_spec;
