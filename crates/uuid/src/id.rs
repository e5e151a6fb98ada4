//! Canonical identifier wrappers.

use crate::{UuidError, UuidResult};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// Returns true if `input` is a canonical hyphenated lowercase UUID.
///
/// This is a purely syntactic check: 36 bytes, hyphens at offsets 8, 13, 18 and 23, and only
/// `0-9`/`a-f` everywhere else.
fn is_canonical(input: &str) -> bool {
    input.len() == 36
        && input.bytes().enumerate().all(|(i, b)| match i {
            8 | 13 | 18 | 23 => b == b'-',
            _ => matches!(b, b'0'..=b'9' | b'a'..=b'f'),
        })
}

fn parse_canonical(input: &str, kind: &str) -> UuidResult<Uuid> {
    if !is_canonical(input) {
        return Err(UuidError::InvalidInput(format!(
            "{kind} must be a lowercase hyphenated UUID, got: '{input}'"
        )));
    }
    Uuid::parse_str(input).map_err(|e| UuidError::InvalidInput(format!("{kind}: {e}")))
}

/// Identifier of one in-progress journey.
///
/// Once constructed the inner UUID is known to be canonical, so `to_string()` always round-trips
/// to the same URL segment that was parsed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JourneyId(Uuid);

impl Default for JourneyId {
    fn default() -> Self {
        Self::new()
    }
}

impl JourneyId {
    /// Allocates a fresh random journey identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Validates a journey identifier taken from a URL path segment.
    ///
    /// # Errors
    ///
    /// Returns [`UuidError::InvalidInput`] if `input` is not in canonical form.
    pub fn parse(input: &str) -> UuidResult<Self> {
        parse_canonical(input, "journey id").map(Self)
    }

    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for JourneyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for JourneyId {
    type Err = UuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JourneyId::parse(s)
    }
}

/// Identifier of one user session, carried in the session cookie.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Validates a session identifier read back from a cookie.
    ///
    /// # Errors
    ///
    /// Returns [`UuidError::InvalidInput`] if `input` is not in canonical form.
    pub fn parse(input: &str) -> UuidResult<Self> {
        parse_canonical(input, "session id").map(Self)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for JourneyId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for JourneyId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        JourneyId::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_journey_id_is_canonical() {
        let id = JourneyId::new();
        assert!(is_canonical(&id.to_string()));
    }

    #[test]
    fn test_parse_round_trips() {
        let raw = "550e8400-e29b-41d4-a716-446655440000";
        let id = JourneyId::parse(raw).expect("canonical id should parse");
        assert_eq!(id.to_string(), raw);
    }

    #[test]
    fn test_parse_rejects_non_canonical_forms() {
        for raw in [
            "550E8400-E29B-41D4-A716-446655440000",
            "550e8400e29b41d4a716446655440000",
            "{550e8400-e29b-41d4-a716-446655440000}",
            "550e8400-e29b-41d4-a716-44665544000",
            "not-a-uuid",
            "",
        ] {
            assert!(JourneyId::parse(raw).is_err(), "should reject '{raw}'");
        }
    }

    #[test]
    fn test_session_id_rejects_garbage_cookie() {
        assert!(SessionId::parse("abc; other=1").is_err());
        let id = SessionId::new();
        assert_eq!(SessionId::parse(&id.to_string()), Ok(id));
    }

    #[test]
    fn test_journey_id_serde_uses_canonical_string() {
        let id = JourneyId::parse("550e8400-e29b-41d4-a716-446655440000").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"550e8400-e29b-41d4-a716-446655440000\"");
        let back: JourneyId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<JourneyId>("\"nope\"").is_err());
    }
}
