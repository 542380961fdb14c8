//! Object Identifier (OID) type.
//!
//! OIDs are stored as `SmallVec<[u64; 16]>` to avoid heap allocation for
//! common OIDs while still holding arcs wider than 32 bits.

use std::fmt;

use smallvec::SmallVec;

use crate::error::{DecodeErrorKind, Error, Result, ValueErrorKind};

/// Object Identifier.
///
/// An ordered list of non-negative arcs. The canonical text form is the
/// arcs joined by dots.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Oid {
    arcs: SmallVec<[u64; 16]>,
}

impl Oid {
    /// Create an empty OID.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create an OID from arc values.
    ///
    /// ```
    /// use snmp_trap::Oid;
    ///
    /// let oid = Oid::new([1, 3, 6, 1, 2, 1]);
    /// assert_eq!(oid.arcs(), &[1, 3, 6, 1, 2, 1]);
    /// ```
    pub fn new(arcs: impl IntoIterator<Item = u64>) -> Self {
        Self {
            arcs: arcs.into_iter().collect(),
        }
    }

    /// Create an OID from a slice of arcs.
    pub fn from_slice(arcs: &[u64]) -> Self {
        Self {
            arcs: SmallVec::from_slice(arcs),
        }
    }

    /// Create an OID from signed arcs, rejecting any negative arc.
    ///
    /// ```
    /// use snmp_trap::Oid;
    ///
    /// assert_eq!(Oid::from_signed(&[1, 3, 6]).unwrap().to_string(), "1.3.6");
    /// assert!(Oid::from_signed(&[1, 3, -6]).is_err());
    /// ```
    pub fn from_signed(arcs: &[i64]) -> Result<Self> {
        arcs.iter()
            .enumerate()
            .map(|(index, &value)| {
                u64::try_from(value)
                    .map_err(|_| Error::bad_value(ValueErrorKind::NegativeArc { index, value }))
            })
            .collect::<Result<SmallVec<_>>>()
            .map(|arcs| Self { arcs })
    }

    /// Parse an OID from dotted notation (e.g., "1.3.6.1.2.1.1.1.0").
    ///
    /// A leading dot is accepted. Negative or non-numeric arcs are rejected.
    ///
    /// ```
    /// use snmp_trap::Oid;
    ///
    /// let oid = Oid::parse(".1.3.6.1.2.1.1.3.0").unwrap();
    /// assert_eq!(oid.to_string(), "1.3.6.1.2.1.1.3.0");
    ///
    /// assert!(Oid::parse("1.3.-6").is_err());
    /// assert!(Oid::parse("1.3.six").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim().strip_prefix('.').unwrap_or(s.trim());
        if trimmed.is_empty() {
            return Ok(Self::empty());
        }

        let mut arcs = SmallVec::new();
        for (index, part) in trimmed.split('.').enumerate() {
            match part.parse::<u64>() {
                Ok(arc) => arcs.push(arc),
                Err(_) => {
                    let kind = match part.parse::<i64>() {
                        Ok(value) if value < 0 => ValueErrorKind::NegativeArc { index, value },
                        _ => ValueErrorKind::InvalidArc(s.into()),
                    };
                    return Err(Error::bad_value(kind));
                }
            }
        }

        Ok(Self { arcs })
    }

    /// Get the arc values.
    pub fn arcs(&self) -> &[u64] {
        &self.arcs
    }

    /// Get the number of arcs.
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    /// Check if the OID is empty.
    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    /// Check if this OID starts with another OID.
    ///
    /// An OID always starts with itself, and any OID starts with an empty OID.
    ///
    /// ```
    /// use snmp_trap::oid;
    ///
    /// let link_down = oid!(1, 3, 6, 1, 6, 3, 1, 1, 5, 3);
    /// assert!(link_down.starts_with(&oid!(1, 3, 6, 1, 6, 3, 1, 1, 5)));
    /// assert!(!link_down.starts_with(&oid!(1, 3, 6, 1, 4)));
    /// ```
    pub fn starts_with(&self, other: &Oid) -> bool {
        self.arcs.len() >= other.arcs.len() && self.arcs[..other.arcs.len()] == other.arcs[..]
    }

    /// Get the parent OID (all arcs except the last).
    ///
    /// Returns `None` if the OID is empty.
    pub fn parent(&self) -> Option<Oid> {
        let (_, init) = self.arcs.split_last()?;
        Some(Oid::from_slice(init))
    }

    /// Create a child OID by appending an arc.
    pub fn child(&self, arc: u64) -> Oid {
        let mut arcs = self.arcs.clone();
        arcs.push(arc);
        Oid { arcs }
    }

    /// Encode the OID content octets (without tag and length).
    ///
    /// The first two arcs are packed into one subidentifier `40 * a0 + a1`.
    /// A single-arc OID emits `40 * a0`; an empty OID emits nothing. Every
    /// subidentifier is base-128 big-endian with the continuation bit set on
    /// all but its last byte.
    pub fn to_ber(&self) -> SmallVec<[u8; 64]> {
        let mut bytes = SmallVec::new();

        let Some((&first, rest)) = self.arcs.split_first() else {
            return bytes;
        };

        // u128 so that 40 * a0 + a1 cannot overflow
        let second = rest.first().copied().unwrap_or(0);
        encode_subidentifier(&mut bytes, u128::from(first) * 40 + u128::from(second));

        for &arc in rest.iter().skip(1) {
            encode_subidentifier(&mut bytes, u128::from(arc));
        }

        bytes
    }

    /// Decode OID content octets.
    ///
    /// The first subidentifier `v` splits into `v / 40` and `v % 40`.
    /// Error offsets are relative to `data`.
    pub fn from_ber(data: &[u8]) -> Result<Self> {
        let mut arcs = SmallVec::new();
        let mut i = 0;

        while i < data.len() {
            let (subid, consumed) = decode_subidentifier(&data[i..], i)?;
            if i == 0 {
                arcs.push(subid / 40);
                arcs.push(subid % 40);
            } else {
                arcs.push(subid);
            }
            i += consumed;
        }

        Ok(Self { arcs })
    }
}

fn encode_subidentifier(bytes: &mut SmallVec<[u8; 64]>, value: u128) {
    let groups = ((128 - value.leading_zeros()).div_ceil(7)).max(1);
    for i in (0..groups).rev() {
        let mut byte = ((value >> (i * 7)) & 0x7F) as u8;
        if i > 0 {
            byte |= 0x80;
        }
        bytes.push(byte);
    }
}

/// Decode a subidentifier, returning (value, bytes_consumed).
fn decode_subidentifier(data: &[u8], base_offset: usize) -> Result<(u64, usize)> {
    let mut value: u64 = 0;

    for (i, &byte) in data.iter().enumerate() {
        if value > (u64::MAX >> 7) {
            return Err(Error::decode(
                base_offset + i,
                DecodeErrorKind::SubidentifierOverflow,
            ));
        }
        value = (value << 7) | u64::from(byte & 0x7F);
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }

    Err(Error::decode(
        base_offset + data.len(),
        DecodeErrorKind::InvalidOidEncoding,
    ))
}

impl fmt::Debug for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Oid({})", self)
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for arc in &self.arcs {
            if !first {
                write!(f, ".")?;
            }
            write!(f, "{}", arc)?;
            first = false;
        }
        Ok(())
    }
}

impl std::str::FromStr for Oid {
    type Err = Box<Error>;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<&[u64]> for Oid {
    fn from(arcs: &[u64]) -> Self {
        Self::from_slice(arcs)
    }
}

impl<const N: usize> From<[u64; N]> for Oid {
    fn from(arcs: [u64; N]) -> Self {
        Self::new(arcs)
    }
}

impl TryFrom<&[i64]> for Oid {
    type Error = Box<Error>;

    fn try_from(arcs: &[i64]) -> Result<Self> {
        Self::from_signed(arcs)
    }
}

impl PartialOrd for Oid {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Oid {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.arcs.cmp(&other.arcs)
    }
}

/// Macro to create an OID from literal arcs.
///
/// ```
/// use snmp_trap::oid;
///
/// let sys_uptime = oid!(1, 3, 6, 1, 2, 1, 1, 3, 0);
/// assert_eq!(sys_uptime.to_string(), "1.3.6.1.2.1.1.3.0");
///
/// // Trailing commas are allowed
/// let cold_start = oid!(1, 3, 6, 1, 6, 3, 1, 1, 5, 1,);
/// assert_eq!(cold_start.len(), 10);
/// ```
#[macro_export]
macro_rules! oid {
    ($($arc:expr),* $(,)?) => {
        $crate::oid::Oid::from_slice(&[$($arc),*])
    };
}

/// Well-known OIDs used by notifications (RFC 3418, RFC 3584).
pub mod well_known {
    use super::Oid;

    /// sysUpTime.0, first varbind of every v2 notification.
    pub fn sys_uptime_0() -> Oid {
        oid!(1, 3, 6, 1, 2, 1, 1, 3, 0)
    }

    /// snmpTrapOID.0, second varbind of every v2 notification.
    pub fn snmp_trap_oid_0() -> Oid {
        oid!(1, 3, 6, 1, 6, 3, 1, 1, 4, 1, 0)
    }

    /// snmpTrapEnterprise.0, carries the v1 enterprise in translated traps.
    pub fn snmp_trap_enterprise_0() -> Oid {
        oid!(1, 3, 6, 1, 6, 3, 1, 1, 4, 3, 0)
    }

    /// snmpTrapAddress.0 (RFC 3584), carries the v1 agent-addr in translated traps.
    pub fn snmp_trap_address_0() -> Oid {
        oid!(1, 3, 6, 1, 6, 3, 18, 1, 3, 0)
    }

    /// snmpTraps, parent of the generic trap OIDs (coldStart is `.1`).
    pub fn snmp_traps() -> Oid {
        oid!(1, 3, 6, 1, 6, 3, 1, 1, 5)
    }
}
