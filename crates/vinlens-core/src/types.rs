//! Shared types used across VinLens.
//!
//! This module defines the newtypes that give the lookup pipeline its
//! type safety: a validated [`Vin`] and a validated [`ProviderId`].

use crate::error::VinLensError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Number of characters in a vehicle identification number.
pub const VIN_LENGTH: usize = 17;

/// Vehicle identification number.
///
/// Treated as an opaque string: only emptiness and length are checked.
/// No checksum validation or case normalization is performed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Vin(String);

impl Vin {
    /// Parse and validate a VIN.
    ///
    /// # Errors
    /// Returns [`VinLensError::InvalidVin`] if the value is empty or is not
    /// exactly [`VIN_LENGTH`] characters long.
    pub fn parse(vin: impl Into<String>) -> Result<Self, VinLensError> {
        let vin = vin.into();

        if vin.is_empty() {
            return Err(VinLensError::InvalidVin("VIN cannot be empty".to_string()));
        }

        let len = vin.chars().count();
        if len != VIN_LENGTH {
            return Err(VinLensError::InvalidVin(format!(
                "expected {VIN_LENGTH} characters, got {len}"
            )));
        }

        Ok(Self(vin))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Vin {
    type Error = VinLensError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Vin> for String {
    fn from(vin: Vin) -> Self {
        vin.0
    }
}

impl AsRef<str> for Vin {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Vin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Newtype for provider identifiers with validation.
///
/// Provider IDs must be lowercase alphanumeric with hyphens, 3-50 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProviderId(String);

impl ProviderId {
    /// Create a new `ProviderId` from a string.
    ///
    /// # Errors
    /// Returns error if the ID doesn't match the required format.
    pub fn new(id: impl Into<String>) -> Result<Self, VinLensError> {
        let id = id.into();
        Self::validate(&id)?;
        Ok(Self(id))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate provider ID format: lowercase alphanumeric with hyphens, 3-50 chars.
    fn validate(id: &str) -> Result<(), VinLensError> {
        static PROVIDER_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = PROVIDER_REGEX
            .get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9-]{1,48}[a-z0-9]$").expect("valid regex"));

        if id.len() < 3 || id.len() > 50 {
            return Err(VinLensError::Validation(format!(
                "invalid provider ID: must be 3-50 characters, got {} characters",
                id.len()
            )));
        }

        if regex.is_match(id) {
            Ok(())
        } else {
            Err(VinLensError::Validation(format!(
                "invalid provider ID: must be lowercase alphanumeric with hyphens, got '{id}'"
            )))
        }
    }
}

impl TryFrom<String> for ProviderId {
    type Error = VinLensError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProviderId> for String {
    fn from(id: ProviderId) -> Self {
        id.0
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vin_valid() {
        let vin = Vin::parse("1HGCM82633A004352").expect("valid VIN");
        assert_eq!(vin.as_str(), "1HGCM82633A004352");
        assert_eq!(vin.to_string(), "1HGCM82633A004352");
    }

    #[test]
    fn test_vin_rejects_wrong_length() {
        assert!(Vin::parse("").is_err());
        assert!(Vin::parse("1HGCM82633A00435").is_err());
        assert!(Vin::parse("1HGCM82633A0043521").is_err());
    }

    #[test]
    fn test_vin_is_opaque() {
        // No checksum or alphabet checks, only length
        assert!(Vin::parse("aaaaaaaaaaaaaaaaa").is_ok());
        assert!(Vin::parse("IOQIOQIOQIOQIOQIO").is_ok());
    }

    #[test]
    fn test_vin_error_message() {
        let err = Vin::parse("ABC").unwrap_err();
        assert_eq!(err.to_string(), "invalid VIN: expected 17 characters, got 3");
    }

    #[test]
    fn test_vin_deserialize_validates() {
        let vin: Vin = serde_json::from_str("\"1HGCM82633A004352\"").expect("valid VIN");
        assert_eq!(vin.as_str(), "1HGCM82633A004352");
        assert!(serde_json::from_str::<Vin>("\"short\"").is_err());
    }

    #[test]
    fn test_provider_id_valid() {
        assert!(ProviderId::new("vindecoderz").is_ok());
        assert!(ProviderId::new("vin-options-2").is_ok());
    }

    #[test]
    fn test_provider_id_invalid() {
        assert!(ProviderId::new("ab").is_err());
        assert!(ProviderId::new("Uppercase").is_err());
        assert!(ProviderId::new("-leading").is_err());
        assert!(ProviderId::new("has space").is_err());
        assert!(ProviderId::new("a".repeat(51)).is_err());
    }

    #[test]
    fn test_provider_id_serde_roundtrip() {
        let id = ProviderId::new("vindecoderz").expect("valid provider ID");
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"vindecoderz\"");
        assert!(serde_json::from_str::<ProviderId>("\"Bad Name\"").is_err());
    }
}
