//! # Card specs and their building blocks
mod card_spec;
mod color;
mod mana_cost;

pub use card_spec::*;
pub use color::*;
pub use mana_cost::*;
