use std::fmt;

/// ManaColor represents one of the five [colors](https://mtg.gamepedia.com/Color)
/// of mana a pip can require or a source can produce
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ManaColor {
  #[serde(rename = "W")]
  White = 0,
  #[serde(rename = "U")]
  Blue = 1,
  #[serde(rename = "B")]
  Black = 2,
  #[serde(rename = "R")]
  Red = 3,
  #[serde(rename = "G")]
  Green = 4,
}

impl ManaColor {
  /// All colors in canonical WUBRG order
  pub const ALL: [ManaColor; 5] = [
    ManaColor::White,
    ManaColor::Blue,
    ManaColor::Black,
    ManaColor::Red,
    ManaColor::Green,
  ];

  pub fn from_symbol(symbol: char) -> Option<Self> {
    match symbol {
      'W' => Some(Self::White),
      'U' => Some(Self::Blue),
      'B' => Some(Self::Black),
      'R' => Some(Self::Red),
      'G' => Some(Self::Green),
      _ => None,
    }
  }

  pub fn symbol(self) -> char {
    match self {
      Self::White => 'W',
      Self::Blue => 'U',
      Self::Black => 'B',
      Self::Red => 'R',
      Self::Green => 'G',
    }
  }

  #[inline]
  pub fn index(self) -> usize {
    self as usize
  }

  #[inline]
  fn bit(self) -> u8 {
    1 << self.index()
  }
}

impl fmt::Display for ManaColor {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", self.symbol())
  }
}

/// ColorSet is a compact set of mana colors, stored as one bit per color
#[derive(Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ColorSet {
  bits: u8,
}

impl ColorSet {
  pub const W_BITS: u8 = 0b0000_0001;
  pub const U_BITS: u8 = 0b0000_0010;
  pub const B_BITS: u8 = 0b0000_0100;
  pub const R_BITS: u8 = 0b0000_1000;
  pub const G_BITS: u8 = 0b0001_0000;
  const ALL_BITS: u8 = Self::W_BITS | Self::U_BITS | Self::B_BITS | Self::R_BITS | Self::G_BITS;

  pub fn new() -> Self {
    Self { bits: 0 }
  }

  /// Returns the set of all five colors
  pub fn all() -> Self {
    Self {
      bits: Self::ALL_BITS,
    }
  }

  #[inline]
  pub fn insert(&mut self, color: ManaColor) {
    self.bits |= color.bit();
  }

  #[inline]
  pub fn contains(self, color: ManaColor) -> bool {
    self.bits & color.bit() != 0
  }

  #[inline]
  pub fn is_empty(self) -> bool {
    self.bits == 0
  }

  /// Returns true if the set covers every color
  #[inline]
  pub fn is_all(self) -> bool {
    self.bits == Self::ALL_BITS
  }

  #[inline]
  pub fn len(self) -> usize {
    self.bits.count_ones() as usize
  }

  #[inline]
  pub fn union(self, other: ColorSet) -> Self {
    Self {
      bits: self.bits | other.bits,
    }
  }

  /// Iterates the colors in canonical WUBRG order
  pub fn iter(self) -> impl Iterator<Item = ManaColor> {
    ManaColor::ALL.iter().copied().filter(move |c| self.contains(*c))
  }
}

impl std::iter::FromIterator<ManaColor> for ColorSet {
  fn from_iter<I: IntoIterator<Item = ManaColor>>(iter: I) -> Self {
    let mut set = ColorSet::new();
    for color in iter {
      set.insert(color);
    }
    set
  }
}

impl fmt::Debug for ColorSet {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.debug_set().entries(self.iter()).finish()
  }
}

impl fmt::Display for ColorSet {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    for color in self.iter() {
      write!(f, "{}", color)?;
    }
    Ok(())
  }
}

// Serialized as a sorted list of color symbols, e.g. ["U", "B"]
impl serde::Serialize for ColorSet {
  fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(self.iter())
  }
}

impl<'de> serde::Deserialize<'de> for ColorSet {
  fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let colors: Vec<ManaColor> = serde::Deserialize::deserialize(deserializer)?;
    Ok(colors.into_iter().collect())
  }
}

#[cfg(test)]
mod tests {
  use crate::card::color::*;

  #[test]
  fn symbols_round_trip() {
    for color in ManaColor::ALL.iter() {
      assert_eq!(ManaColor::from_symbol(color.symbol()), Some(*color));
    }
    assert_eq!(ManaColor::from_symbol('C'), None);
  }

  #[test]
  fn color_set_iterates_in_wubrg_order() {
    let set: ColorSet = vec![ManaColor::Green, ManaColor::White, ManaColor::Black]
      .into_iter()
      .collect();
    let colors: Vec<_> = set.iter().collect();
    assert_eq!(
      colors,
      vec![ManaColor::White, ManaColor::Black, ManaColor::Green]
    );
    assert_eq!(set.len(), 3);
    assert_eq!(set.to_string(), "WBG");
  }

  #[test]
  fn all_is_all() {
    assert!(ColorSet::all().is_all());
    assert_eq!(ColorSet::all().len(), 5);
    assert!(!ColorSet::new().is_all());
    assert!(ColorSet::new().is_empty());
  }

  #[test]
  fn serializes_as_symbol_list() {
    let set: ColorSet = vec![ManaColor::Blue, ManaColor::Red].into_iter().collect();
    let json = serde_json::to_string(&set).expect("serialize");
    assert_eq!(json, r#"["U","R"]"#);
    let back: ColorSet = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, set);
  }
}
