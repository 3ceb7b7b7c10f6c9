use crate::card::{ColorSet, ManaColor};

/// ManaCost represents a card [mana cost](https://mtg.gamepedia.com/Mana_cost)
/// as a generic amount plus a pip count per color
#[derive(Default, Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManaCost {
  pub generic: u8,
  #[serde(rename = "W")]
  pub w: u8,
  #[serde(rename = "U")]
  pub u: u8,
  #[serde(rename = "B")]
  pub b: u8,
  #[serde(rename = "R")]
  pub r: u8,
  #[serde(rename = "G")]
  pub g: u8,
}

impl ManaCost {
  /// Returns a new ManaCost worth 0 mana
  pub fn new() -> Self {
    Self::default()
  }

  /// Returns a new ManaCost with the given generic and WUBRG pip counts
  pub fn from_wubrg(generic: u8, w: u8, u: u8, b: u8, r: u8, g: u8) -> Self {
    Self {
      generic,
      w,
      u,
      b,
      r,
      g,
    }
  }

  /// Returns the number of pips of `color`
  #[inline]
  pub fn pips(&self, color: ManaColor) -> u8 {
    match color {
      ManaColor::White => self.w,
      ManaColor::Blue => self.u,
      ManaColor::Black => self.b,
      ManaColor::Red => self.r,
      ManaColor::Green => self.g,
    }
  }

  #[inline]
  pub fn pips_mut(&mut self, color: ManaColor) -> &mut u8 {
    match color {
      ManaColor::White => &mut self.w,
      ManaColor::Blue => &mut self.u,
      ManaColor::Black => &mut self.b,
      ManaColor::Red => &mut self.r,
      ManaColor::Green => &mut self.g,
    }
  }

  /// Returns the total number of colored pips
  #[inline]
  pub fn colored(&self) -> usize {
    self.w as usize + self.u as usize + self.b as usize + self.r as usize + self.g as usize
  }

  /// Returns the total mana value, generic included
  #[inline]
  pub fn total(&self) -> usize {
    self.generic as usize + self.colored()
  }

  /// Returns the set of colors with at least one pip
  pub fn colors(&self) -> ColorSet {
    ManaColor::ALL
      .iter()
      .copied()
      .filter(|c| self.pips(*c) > 0)
      .collect()
  }
}
