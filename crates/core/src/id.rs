//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Document identifiers are exactly 24 hexadecimal characters.
static DOCUMENT_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[0-9a-fA-F]{24}$").expect("valid document id pattern"));

/// Identifier of an employee record.
///
/// Shaped like a document-store object id: 12 bytes rendered as 24 lowercase
/// hex characters. Parsing accepts either case and normalizes to lowercase.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct EmployeeId(String);

impl EmployeeId {
    /// Create a new identifier.
    ///
    /// Takes the leading 12 bytes of a UUIDv7, so ids are roughly
    /// time-ordered. Prefer parsing fixed ids in tests for determinism.
    pub fn generate() -> Self {
        let uuid = Uuid::now_v7();
        let hex = uuid.simple().to_string();
        Self(hex[..24].to_string())
    }

    /// Whether `s` has the shape of a document id (no store lookup).
    pub fn is_well_formed(s: &str) -> bool {
        DOCUMENT_ID.is_match(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EmployeeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for EmployeeId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !Self::is_well_formed(s) {
            return Err(DomainError::invalid_id(s));
        }
        Ok(Self(s.to_ascii_lowercase()))
    }
}

impl<'de> Deserialize<'de> for EmployeeId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_well_formed_and_distinct() {
        let a = EmployeeId::generate();
        let b = EmployeeId::generate();
        assert!(EmployeeId::is_well_formed(a.as_str()));
        assert_eq!(a.as_str().len(), 24);
        assert_ne!(a, b);
    }

    #[test]
    fn parse_normalizes_to_lowercase() {
        let id: EmployeeId = "64B7F0C2A1D3E4F5A6B7C8D9".parse().unwrap();
        assert_eq!(id.as_str(), "64b7f0c2a1d3e4f5a6b7c8d9");
    }

    #[test]
    fn parse_rejects_wrong_length_and_non_hex() {
        for bad in ["", "64b7f0c2", "64b7f0c2a1d3e4f5a6b7c8d9aa", "64b7f0c2a1d3e4f5a6b7c8dz"] {
            let err = bad.parse::<EmployeeId>().unwrap_err();
            assert!(matches!(err, DomainError::InvalidId { .. }), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn deserialize_goes_through_validation() {
        let ok: EmployeeId = serde_json::from_str("\"64b7f0c2a1d3e4f5a6b7c8d9\"").unwrap();
        assert_eq!(ok.to_string(), "64b7f0c2a1d3e4f5a6b7c8d9");
        assert!(serde_json::from_str::<EmployeeId>("\"nope\"").is_err());
    }
}
