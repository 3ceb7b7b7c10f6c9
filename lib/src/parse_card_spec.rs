//! # Card encoding parser
//!
//! A card is encoded as a compact string: an optional cost, an optional
//! production clause introduced by `>`, and an optional trailing `T` for
//! sources that enter tapped.
//!
//! | Encoding   | Meaning                                         |
//! |------------|-------------------------------------------------|
//! | `2UB`      | 2 generic, one blue and one black pip           |
//! | `4*2G`     | 4 generic, two green pips                       |
//! | `>WU`      | land tapping for white or blue                  |
//! | `>*T`      | land tapping for any color, enters tapped       |
//! | `1G>G`     | spell costing 1 generic + G that taps for green |
use crate::card::{CardSpec, ColorSet, ManaColor, ManaCost};
use crate::error::Error;
use regex::Regex;

lazy_static! {
  static ref ENCODING: Regex =
    Regex::new(r"^(?P<cost>[0-9*WUBRG]*)(?:>(?P<produce>[*WUBRG]*)(?P<tapped>T?))?$")
      .expect("encoding regex");
}

/// Parses `encoding` into a `CardSpec`
pub fn parse_card_spec(encoding: &str) -> Result<CardSpec, Error> {
  let captures = match ENCODING.captures(encoding) {
    Some(captures) => captures,
    None => return Err(Error::malformed(encoding, explain_mismatch(encoding))),
  };
  let cost_str = captures.name("cost").map_or("", |m| m.as_str());
  let is_land = encoding.starts_with('>');
  let cost = parse_cost(encoding, cost_str)?;
  let mut spec = CardSpec {
    encoding: encoding.to_string(),
    cost,
    producible_colors: ColorSet::new(),
    is_land,
    enters_tapped: false,
  };
  if let Some(produce) = captures.name("produce") {
    spec.producible_colors = parse_produce(encoding, produce.as_str())?;
    spec.enters_tapped = captures.name("tapped").map_or(false, |m| !m.as_str().is_empty());
  }
  Ok(spec)
}

/// Parses the cost portion of an encoding.
/// A digit run at the very start is the generic cost unless it is followed by `*`;
/// anywhere else a digit run multiplies the symbol that follows it.
fn parse_cost(encoding: &str, cost_str: &str) -> Result<ManaCost, Error> {
  let mut cost = ManaCost::new();
  let mut sigil = String::new();
  let mut leading = true;
  for c in cost_str.chars() {
    match c {
      '0'..='9' => sigil.push(c),
      '*' => {
        let count = count_from_sigil(encoding, &sigil)?;
        cost.generic = add_pips(encoding, cost.generic, count)?;
        sigil.clear();
        leading = false;
      }
      c => {
        let color = ManaColor::from_symbol(c)
          .ok_or_else(|| Error::malformed(encoding, format!("unexpected character {:?}", c)))?;
        if leading && !sigil.is_empty() {
          cost.generic = add_pips(encoding, cost.generic, count_from_sigil(encoding, &sigil)?)?;
          let pips = cost.pips_mut(color);
          *pips = add_pips(encoding, *pips, 1)?;
        } else {
          let count = count_from_sigil(encoding, &sigil)?;
          let pips = cost.pips_mut(color);
          *pips = add_pips(encoding, *pips, count)?;
        }
        sigil.clear();
        leading = false;
      }
    }
  }
  if !sigil.is_empty() {
    if !leading {
      return Err(Error::malformed(
        encoding,
        format!("count {} is not followed by a color or '*'", sigil),
      ));
    }
    cost.generic = count_from_sigil(encoding, &sigil)?;
  }
  Ok(cost)
}

fn parse_produce(encoding: &str, produce: &str) -> Result<ColorSet, Error> {
  if produce.is_empty() {
    return Err(Error::malformed(
      encoding,
      "'>' must be followed by colors or '*'",
    ));
  }
  if produce.contains('*') {
    if produce != "*" {
      return Err(Error::malformed(
        encoding,
        "the wildcard '*' cannot be combined with colors",
      ));
    }
    return Ok(ColorSet::all());
  }
  // The regex only lets WUBRG through here
  Ok(produce.chars().filter_map(ManaColor::from_symbol).collect())
}

fn count_from_sigil(encoding: &str, sigil: &str) -> Result<u8, Error> {
  if sigil.is_empty() {
    return Ok(1);
  }
  sigil
    .parse::<u8>()
    .map_err(|_| Error::malformed(encoding, format!("count {} is too large", sigil)))
}

fn add_pips(encoding: &str, current: u8, count: u8) -> Result<u8, Error> {
  current
    .checked_add(count)
    .ok_or_else(|| Error::malformed(encoding, "cost is too large"))
}

fn explain_mismatch(encoding: &str) -> String {
  if let Some(c) = encoding
    .chars()
    .find(|c| !matches!(c, '0'..='9' | '*' | '>' | 'T' | 'W' | 'U' | 'B' | 'R' | 'G'))
  {
    return format!("unexpected character {:?}", c);
  }
  if encoding.matches('>').count() > 1 {
    return "more than one '>'".to_string();
  }
  match encoding.find('>') {
    None if encoding.contains('T') => "'T' is only allowed after a production clause".to_string(),
    Some(idx) if encoding[idx..].chars().any(|c| c.is_ascii_digit()) => {
      "counts are not allowed in a production clause".to_string()
    }
    _ => "'T' must be the last character".to_string(),
  }
}

#[cfg(test)]
mod tests {
  use crate::card::*;
  use crate::error::Error;
  use crate::parse_card_spec::*;

  fn reason(encoding: &str) -> String {
    match parse_card_spec(encoding) {
      Err(Error::MalformedEncoding { reason, .. }) => reason,
      other => panic!("expected MalformedEncoding for {:?}, got {:?}", encoding, other),
    }
  }

  #[test]
  fn leading_integer_is_generic() {
    let spec = parse_card_spec("2UB").unwrap();
    assert_eq!(spec.cost, ManaCost::from_wubrg(2, 0, 1, 1, 0, 0));
    assert!(spec.producible_colors.is_empty());
    assert!(!spec.is_land);
    assert!(!spec.enters_tapped);
  }

  #[test]
  fn starred_generic_and_multiplied_pips() {
    let spec = parse_card_spec("4*2G").unwrap();
    assert_eq!(spec.cost, ManaCost::from_wubrg(4, 0, 0, 0, 0, 2));
    let spec = parse_card_spec("3*U2W").unwrap();
    assert_eq!(spec.cost, ManaCost::from_wubrg(3, 2, 1, 0, 0, 0));
  }

  #[test]
  fn repeated_letters_add_pips() {
    let spec = parse_card_spec("1WWU").unwrap();
    assert_eq!(spec.cost, ManaCost::from_wubrg(1, 2, 1, 0, 0, 0));
  }

  #[test]
  fn bare_integer_is_generic() {
    let spec = parse_card_spec("3").unwrap();
    assert_eq!(spec.cost, ManaCost::from_wubrg(3, 0, 0, 0, 0, 0));
  }

  #[test]
  fn empty_encoding_is_a_free_spell() {
    let spec = parse_card_spec("").unwrap();
    assert_eq!(spec.cost.total(), 0);
    assert!(spec.is_spell());
  }

  #[test]
  fn lands() {
    let spec = parse_card_spec(">WUBRG").unwrap();
    assert!(spec.is_land);
    assert!(spec.is_wildcard_source());
    assert_eq!(spec.cost.total(), 0);

    let spec = parse_card_spec(">*").unwrap();
    assert!(spec.is_land);
    assert!(spec.is_wildcard_source());

    let spec = parse_card_spec(">UBT").unwrap();
    assert!(spec.enters_tapped);
    assert_eq!(spec.producible_colors.to_string(), "UB");
  }

  #[test]
  fn mana_producing_spell() {
    let spec = parse_card_spec("3*>WUBRG").unwrap();
    assert!(!spec.is_land);
    assert_eq!(spec.cost.generic, 3);
    assert!(spec.is_wildcard_source());

    let spec = parse_card_spec("1G>G").unwrap();
    assert_eq!(spec.cost, ManaCost::from_wubrg(1, 0, 0, 0, 0, 1));
    assert_eq!(spec.producible_colors.to_string(), "G");
  }

  #[test]
  fn deterministic() {
    for encoding in &["2UB", ">WUBRG", "4*2G", "1G>GT"] {
      assert_eq!(parse_card_spec(encoding), parse_card_spec(encoding));
    }
  }

  #[test]
  fn malformed_encodings() {
    assert_eq!(reason("2X"), "unexpected character 'X'");
    assert_eq!(reason("u"), "unexpected character 'u'");
    assert_eq!(reason(">"), "'>' must be followed by colors or '*'");
    assert_eq!(reason("2U>"), "'>' must be followed by colors or '*'");
    assert_eq!(reason(">U>B"), "more than one '>'");
    assert_eq!(reason("UT"), "'T' is only allowed after a production clause");
    assert_eq!(reason(">TU"), "'T' must be the last character");
    assert_eq!(reason(">2U"), "counts are not allowed in a production clause");
    assert_eq!(reason(">*W"), "the wildcard '*' cannot be combined with colors");
    assert_eq!(reason("U2"), "count 2 is not followed by a color or '*'");
    assert_eq!(reason("300*"), "count 300 is too large");
    assert_eq!(reason("200*100*"), "cost is too large");
  }

  #[test]
  fn malformed_error_names_the_encoding() {
    match parse_card_spec("2Q") {
      Err(Error::MalformedEncoding { encoding, .. }) => assert_eq!(encoding, "2Q"),
      other => panic!("unexpected {:?}", other),
    }
  }
}
