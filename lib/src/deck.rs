//! # Deck building
//!
//! Expands spell and mana count mappings into the physical cards of a deck,
//! padding the remainder with filler cards that neither cost nor produce mana.
use crate::card::CardSpec;
use crate::error::Error;
use crate::parse_card_spec::parse_card_spec;
use std::collections::BTreeMap;

/// A Deck is the un-shuffled list of distinct card specs and their counts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck {
  pub cards: Vec<DeckCard>,
  /// The number of filler cards padding the deck to `total_deck_size`
  pub filler_count: usize,
  pub total_deck_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckCard {
  pub spec: CardSpec,
  pub count: usize,
}

/// One physical card position in a deck; `spec` is `None` for filler
#[derive(Debug, Copy, Clone)]
pub struct DeckSlot<'a> {
  pub uid: usize,
  pub spec: Option<&'a CardSpec>,
}

#[derive(Debug, Clone)]
pub struct DeckBuilder {
  pub cards: BTreeMap<String, usize>,
  pub total_deck_size: usize,
}

impl DeckBuilder {
  pub fn new(total_deck_size: usize) -> Self {
    Self {
      cards: BTreeMap::new(),
      total_deck_size,
    }
  }

  /// Adds `count` copies of `encoding`. Counts for an encoding listed
  /// more than once, e.g. as both a spell and a mana card, are summed.
  pub fn insert_count(mut self, encoding: &str, count: usize) -> Self {
    let total_count = self.cards.entry(encoding.to_string()).or_insert(0);
    *total_count = total_count.saturating_add(count);
    Self {
      cards: self.cards,
      total_deck_size: self.total_deck_size,
    }
  }

  pub fn build(self) -> Result<Deck, Error> {
    let mut deck = Deck::new(self.total_deck_size);
    let mut count: usize = 0;
    for (encoding, n) in self.cards {
      // Parse before skipping empty entries so a bad encoding is always reported
      let spec = parse_card_spec(&encoding)?;
      if n == 0 {
        continue;
      }
      deck.cards.push(DeckCard { spec, count: n });
      count = match count.checked_add(n) {
        Some(sum) => sum,
        None => {
          return Err(Error::DeckSize {
            requested: usize::MAX,
            total_deck_size: self.total_deck_size,
          })
        }
      };
    }
    if count > self.total_deck_size {
      return Err(Error::DeckSize {
        requested: count,
        total_deck_size: self.total_deck_size,
      });
    }
    deck.filler_count = self.total_deck_size - count;
    Ok(deck)
  }
}

impl Deck {
  pub fn new(total_deck_size: usize) -> Self {
    Self {
      cards: Vec::with_capacity(20),
      filler_count: 0,
      total_deck_size,
    }
  }

  /// Builds a deck from the spell and mana count mappings
  pub fn from_counts(
    spell_counts: &BTreeMap<String, usize>,
    mana_counts: &BTreeMap<String, usize>,
    total_deck_size: usize,
  ) -> Result<Self, Error> {
    let mut b = DeckBuilder::new(total_deck_size);
    for (encoding, count) in spell_counts.iter().chain(mana_counts.iter()) {
      b = b.insert_count(encoding, *count);
    }
    b.build()
  }

  /// Returns one slot per physical card, filler last, in a stable order.
  /// The slot uid is the position in this order.
  pub fn flatten(&self) -> Vec<DeckSlot> {
    let mut result = Vec::with_capacity(self.len());
    for card_count in &self.cards {
      for _ in 0..card_count.count {
        result.push(DeckSlot {
          uid: result.len(),
          spec: Some(&card_count.spec),
        });
      }
    }
    for _ in 0..self.filler_count {
      result.push(DeckSlot {
        uid: result.len(),
        spec: None,
      });
    }
    result
  }

  pub fn card_from_encoding(&self, encoding: &str) -> Option<&DeckCard> {
    self.cards.iter().find(|c| c.spec.encoding == encoding)
  }

  /// Returns the number of physical cards, filler included
  pub fn len(&self) -> usize {
    self.total_deck_size
  }

  pub fn is_empty(&self) -> bool {
    self.total_deck_size == 0
  }

  pub fn spell_count(&self) -> usize {
    self
      .cards
      .iter()
      .filter(|cc| cc.spec.is_spell())
      .fold(0, |accum, cc| accum + cc.count)
  }

  pub fn source_count(&self) -> usize {
    self
      .cards
      .iter()
      .filter(|cc| cc.spec.is_source())
      .fold(0, |accum, cc| accum + cc.count)
  }

  pub fn iter(&self) -> impl Iterator<Item = &DeckCard> {
    self.cards.iter()
  }
}
