//! # Errors
//!
//! Every failure is detected before the first pass runs, except
//! `InternalInvariant`, which signals a defect in the engine itself.

/// The error type returned by every fallible operation in this crate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum Error {
  /// A card encoding that does not follow the card grammar
  #[error("malformed card encoding {encoding:?}: {reason}")]
  MalformedEncoding { encoding: String, reason: String },
  /// The spell and mana counts do not fit in the deck
  #[error("deck of {total_deck_size} cards cannot hold the {requested} cards listed")]
  DeckSize {
    requested: usize,
    total_deck_size: usize,
  },
  /// A simulation parameter outside its accepted range
  #[error("invalid {name} = {value}: {reason}")]
  InvalidParameter {
    name: String,
    value: String,
    reason: String,
  },
  #[error("internal invariant violated: {0}")]
  InternalInvariant(String),
}

impl Error {
  pub(crate) fn malformed(encoding: &str, reason: impl Into<String>) -> Self {
    Error::MalformedEncoding {
      encoding: encoding.to_string(),
      reason: reason.into(),
    }
  }

  pub(crate) fn invalid(
    name: &str,
    value: impl ToString,
    reason: impl Into<String>,
  ) -> Self {
    Error::InvalidParameter {
      name: name.to_string(),
      value: value.to_string(),
      reason: reason.into(),
    }
  }

  /// Returns the name and value of the offending input, if the error has one
  pub fn field(&self) -> Option<(String, String)> {
    match self {
      Error::MalformedEncoding { encoding, .. } => {
        Some(("encoding".to_string(), encoding.clone()))
      }
      Error::DeckSize {
        total_deck_size, ..
      } => Some(("total_deck_size".to_string(), total_deck_size.to_string())),
      Error::InvalidParameter { name, value, .. } => Some((name.clone(), value.clone())),
      Error::InternalInvariant(_) => None,
    }
  }
}
