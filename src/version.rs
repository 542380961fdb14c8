//! SNMP protocol version.

use std::fmt;

/// SNMP version carried in the message header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Version {
    /// SNMPv1 (RFC 1157), wire value 0.
    V1,
    /// SNMPv2c (RFC 1901), wire value 1.
    #[default]
    V2c,
}

impl Version {
    /// Look up a version by its wire value.
    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(Version::V1),
            1 => Some(Version::V2c),
            _ => None,
        }
    }

    /// Wire value.
    pub fn as_i64(self) -> i64 {
        match self {
            Version::V1 => 0,
            Version::V2c => 1,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Version::V1 => f.write_str("v1"),
            Version::V2c => f.write_str("v2c"),
        }
    }
}

impl std::str::FromStr for Version {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "1" | "v1" => Ok(Version::V1),
            "2c" | "v2c" => Ok(Version::V2c),
            other => Err(format!("unsupported SNMP version {:?} (expected 1 or 2c)", other)),
        }
    }
}
