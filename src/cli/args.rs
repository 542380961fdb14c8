//! Command-line argument structures for the snmptrap CLI tools.

use std::net::{IpAddr, ToSocketAddrs};

use clap::{Parser, ValueEnum};

use crate::{Oid, Value, VarBind, Version};

/// SNMP version for CLI argument parsing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SnmpVersion {
    /// SNMPv1
    #[value(name = "1")]
    V1,
    /// SNMPv2c (default)
    #[default]
    #[value(name = "2c")]
    V2c,
}

impl From<SnmpVersion> for Version {
    fn from(v: SnmpVersion) -> Self {
        match v {
            SnmpVersion::V1 => Version::V1,
            SnmpVersion::V2c => Version::V2c,
        }
    }
}

/// Logging flags shared by both tools.
#[derive(Debug, Parser)]
pub struct LogArgs {
    /// Enable debug logging (snmp_trap=debug).
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Enable trace logging (snmp_trap=trace).
    #[arg(short = 'D', long = "trace")]
    pub trace: bool,
}

impl LogArgs {
    /// Initialize tracing based on debug/trace flags.
    pub fn init_tracing(&self) {
        use tracing_subscriber::EnvFilter;

        let filter = if self.trace {
            "snmp_trap=trace"
        } else if self.debug {
            "snmp_trap=debug"
        } else {
            "snmp_trap=warn"
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(filter))
            .with_writer(std::io::stderr)
            .try_init();
    }
}

/// Type specifier in an `OID=TYPE:VALUE` varbind argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// INTEGER
    Integer,
    /// OCTET STRING from UTF-8 text
    String,
    /// OCTET STRING from hex pairs
    HexString,
    /// OBJECT IDENTIFIER
    Oid,
    /// IpAddress
    IpAddress,
    /// TimeTicks
    TimeTicks,
    /// Counter32
    Counter32,
    /// Gauge32
    Gauge32,
    /// Counter64
    Counter64,
    /// NULL (value ignored)
    Null,
}

impl std::str::FromStr for ValueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "i" => Ok(ValueType::Integer),
            "s" => Ok(ValueType::String),
            "x" => Ok(ValueType::HexString),
            "o" => Ok(ValueType::Oid),
            "a" => Ok(ValueType::IpAddress),
            "t" => Ok(ValueType::TimeTicks),
            "c" => Ok(ValueType::Counter32),
            "g" => Ok(ValueType::Gauge32),
            "C" => Ok(ValueType::Counter64),
            "n" => Ok(ValueType::Null),
            _ => Err(format!("invalid type specifier: {}", s)),
        }
    }
}

impl ValueType {
    /// Parse a string value into an SNMP Value according to the type specifier.
    pub fn parse_value(&self, s: &str) -> Result<Value, String> {
        fn number<T: std::str::FromStr>(s: &str, what: &str) -> Result<T, String> {
            s.parse().map_err(|_| format!("invalid {} value: {}", what, s))
        }

        match self {
            ValueType::Integer => Ok(Value::Integer(number(s, "integer")?)),
            ValueType::String => Ok(Value::OctetString(s.as_bytes().to_vec().into())),
            ValueType::HexString => Value::octet_string_from_hex(s).map_err(|e| e.to_string()),
            ValueType::Oid => Oid::parse(s)
                .map(Value::ObjectIdentifier)
                .map_err(|e| format!("invalid OID value: {}", e)),
            ValueType::IpAddress => Value::ip_address(s).map_err(|e| e.to_string()),
            ValueType::TimeTicks => Ok(Value::TimeTicks(number(s, "timeticks")?)),
            ValueType::Counter32 => Ok(Value::Counter32(number(s, "counter32")?)),
            ValueType::Gauge32 => Ok(Value::Gauge32(number(s, "gauge32")?)),
            ValueType::Counter64 => Ok(Value::Counter64(number(s, "counter64")?)),
            ValueType::Null => Ok(Value::Null),
        }
    }
}

/// Parse an `OID=TYPE:VALUE` argument.
///
/// For `n` (NULL) the value part may be empty: `1.3.6.1.2.1.1.1.0=n:`.
pub fn parse_varbind(s: &str) -> Result<VarBind, String> {
    let (oid, typed) = s
        .split_once('=')
        .ok_or_else(|| format!("expected OID=TYPE:VALUE, got {:?}", s))?;
    let (ty, value) = typed
        .split_once(':')
        .ok_or_else(|| format!("expected TYPE:VALUE after '=', got {:?}", typed))?;

    let oid = Oid::parse(oid).map_err(|e| format!("invalid OID {:?}: {}", oid, e))?;
    let value = ty.parse::<ValueType>()?.parse_value(value)?;
    Ok(VarBind { oid, value })
}

/// Parse an OID argument.
pub fn parse_oid(s: &str) -> Result<Oid, String> {
    Oid::parse(s).map_err(|e| format!("invalid OID {:?}: {}", s, e))
}

/// Resolve a host name or IP literal to an address.
pub fn resolve_host(host: &str) -> Result<IpAddr, String> {
    if let Ok(ip) = host.parse() {
        return Ok(ip);
    }
    (host, 0)
        .to_socket_addrs()
        .map_err(|e| format!("invalid target '{}': {}", host, e))?
        .next()
        .map(|addr| addr.ip())
        .ok_or_else(|| format!("could not resolve hostname: {}", host))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;

    #[test]
    fn test_parse_varbind_types() {
        let vb = parse_varbind("1.3.6.1.2.1.1.5.0=s:router").unwrap();
        assert_eq!(vb.oid, oid!(1, 3, 6, 1, 2, 1, 1, 5, 0));
        assert_eq!(vb.value.as_str(), Some("router"));

        assert_eq!(parse_varbind("1.3.6=i:-5").unwrap().value, Value::Integer(-5));
        assert_eq!(
            parse_varbind("1.3.6=a:10.0.0.1").unwrap().value,
            Value::IpAddress([10, 0, 0, 1])
        );
        assert_eq!(parse_varbind("1.3.6=t:100").unwrap().value, Value::TimeTicks(100));
        assert_eq!(parse_varbind("1.3.6=g:7").unwrap().value, Value::Gauge32(7));
        assert_eq!(
            parse_varbind("1.3.6=C:18446744073709551615").unwrap().value,
            Value::Counter64(u64::MAX)
        );
        assert_eq!(parse_varbind("1.3.6=n:").unwrap().value, Value::Null);
        assert_eq!(
            parse_varbind("1.3.6=o:1.3.6.1.4.1").unwrap().value,
            Value::ObjectIdentifier(oid!(1, 3, 6, 1, 4, 1))
        );
    }

    #[test]
    fn test_parse_varbind_value_with_colon() {
        let vb = parse_varbind("1.3.6=s:a:b").unwrap();
        assert_eq!(vb.value.as_str(), Some("a:b"));
    }

    #[test]
    fn test_parse_varbind_errors() {
        assert!(parse_varbind("1.3.6").is_err());
        assert!(parse_varbind("1.3.6=i").is_err());
        assert!(parse_varbind("1.3.6=q:1").is_err());
        assert!(parse_varbind("1.3.6=i:abc").is_err());
        assert!(parse_varbind("1.-3=i:1").is_err());
    }

    #[test]
    fn test_resolve_host_literal() {
        assert_eq!(resolve_host("127.0.0.1").unwrap(), IpAddr::from([127, 0, 0, 1]));
        assert!(resolve_host("::1").unwrap().is_ipv6());
    }
}
