//! Validated value types shared across the contacts workspace.
//!
//! Everything here is a small newtype or enum whose constructor enforces a format, so the rest of
//! the code can take these by value and stop re-checking them.

mod answers;
mod reference;

pub use answers::{RelationshipType, YesNo};
pub use reference::{ReferenceCode, ReferenceCodeGroup};

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
    /// The input did not match the expected format
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// A string type that guarantees non-empty content.
///
/// This type wraps a `String` and ensures it contains at least one non-whitespace character.
/// The input is automatically trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// # Returns
    ///
    /// Returns `Ok(NonEmptyText)` if the trimmed input is non-empty,
    /// or `Err(TextError::Empty)` if it's empty or contains only whitespace.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// A prison number such as `A1234BC`.
///
/// Format: one letter, four digits, two letters. Lowercase input is upper-cased so links typed by
/// hand still resolve to the same prisoner.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PrisonerNumber(String);

impl PrisonerNumber {
    /// Parses a prison number from a URL segment or form value.
    ///
    /// # Errors
    ///
    /// Returns `TextError::Empty` for blank input and `TextError::InvalidFormat` when the value is
    /// not `L9999LL`.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, TextError> {
        let candidate = input.as_ref().trim().to_ascii_uppercase();
        if candidate.is_empty() {
            return Err(TextError::Empty);
        }
        let bytes = candidate.as_bytes();
        let ok = bytes.len() == 7
            && bytes[0].is_ascii_uppercase()
            && bytes[1..5].iter().all(u8::is_ascii_digit)
            && bytes[5..7].iter().all(u8::is_ascii_uppercase);
        if !ok {
            return Err(TextError::InvalidFormat(format!(
                "prisoner number must look like A1234BC, got '{}'",
                input.as_ref()
            )));
        }
        Ok(Self(candidate))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PrisonerNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl serde::Serialize for PrisonerNumber {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for PrisonerNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        PrisonerNumber::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty_text_trims() {
        let text = NonEmptyText::new("  Smith ").unwrap();
        assert_eq!(text.as_str(), "Smith");
        assert_eq!(NonEmptyText::new("   "), Err(TextError::Empty));
    }

    #[test]
    fn test_prisoner_number_normalises_case() {
        let number = PrisonerNumber::parse("a1234bc").unwrap();
        assert_eq!(number.as_str(), "A1234BC");
    }

    #[test]
    fn test_prisoner_number_rejects_bad_shapes() {
        for raw in ["", "A1234B", "11234BC", "A12X4BC", "A1234BCD", "A1234B1"] {
            assert!(PrisonerNumber::parse(raw).is_err(), "should reject '{raw}'");
        }
    }

    #[test]
    fn test_prisoner_number_deserialize_validates() {
        let ok: PrisonerNumber = serde_json::from_str("\"G4793VF\"").unwrap();
        assert_eq!(ok.to_string(), "G4793VF");
        assert!(serde_json::from_str::<PrisonerNumber>("\"nope\"").is_err());
    }
}
