use crate::card::{ColorSet, ManaColor, ManaCost};
use std::fmt;

/// CardSpec is the parsed form of an encoded card string such as `"2UB"`,
/// `">WU"` or `"1G>G"`. It is immutable once parsed; every copy of a card
/// in a deck shares the same spec.
#[derive(Default, Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardSpec {
  /// The encoding this spec was parsed from
  pub encoding: String,
  /// The mana needed to cast the card
  pub cost: ManaCost,
  /// The colors this card can tap for, empty if it produces no mana
  pub producible_colors: ColorSet,
  /// True for lands, which are never cast
  pub is_land: bool,
  /// True if the card cannot be used as a source on the turn it arrives
  pub enters_tapped: bool,
}

impl CardSpec {
  #[inline]
  pub fn generic_cost(&self) -> u8 {
    self.cost.generic
  }

  #[inline]
  pub fn colored_cost(&self, color: ManaColor) -> u8 {
    self.cost.pips(color)
  }

  /// Returns true if the card can produce mana
  #[inline]
  pub fn is_source(&self) -> bool {
    !self.producible_colors.is_empty()
  }

  /// Returns true if the card can tap for any color
  #[inline]
  pub fn is_wildcard_source(&self) -> bool {
    self.producible_colors.is_all()
  }

  /// Returns true for sources that cost nothing, lands included.
  /// Pure sources are available from the turn they are drawn and never need casting.
  #[inline]
  pub fn is_pure_source(&self) -> bool {
    self.is_source() && (self.is_land || self.cost.total() == 0)
  }

  /// Returns true if the card has to be cast, i.e. it can end up dead in hand
  #[inline]
  pub fn is_spell(&self) -> bool {
    !self.is_pure_source()
  }
}

/// Formats the spec back into a canonical encoding that parses to an equal spec,
/// e.g. `"2*UB"`, `">WUT"`, `"1*G>G"`
impl fmt::Display for CardSpec {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    if !self.is_land {
      if self.cost.generic > 0 {
        write!(f, "{}*", self.cost.generic)?;
      }
      for color in ManaColor::ALL.iter() {
        match self.cost.pips(*color) {
          0 => {}
          1 => write!(f, "{}", color)?,
          n => write!(f, "{}{}", n, color)?,
        }
      }
    }
    if self.is_source() {
      write!(f, ">")?;
      if self.is_wildcard_source() {
        write!(f, "*")?;
      } else {
        write!(f, "{}", self.producible_colors)?;
      }
      if self.enters_tapped {
        write!(f, "T")?;
      }
    }
    Ok(())
  }
}
