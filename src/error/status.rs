//! SNMP protocol error status codes (RFC 1157, RFC 3416).

use super::{Error, Result, ValueErrorKind};

/// SNMP protocol error status carried in the error-status field of a PDU.
///
/// Codes 0-5 exist in SNMPv1. Codes 6-18 were added by SNMPv2c and have
/// no wire meaning to a v1 manager; [`ErrorStatus::to_v1`] maps them onto
/// the nearest v1 code as described in RFC 3584 section 4.4.
///
/// # Example
///
/// ```
/// use snmp_trap::ErrorStatus;
///
/// let status = ErrorStatus::from_i32(2).unwrap();
/// assert_eq!(status, ErrorStatus::NoSuchName);
/// assert_eq!(status.as_i32(), 2);
/// assert_eq!(status.to_string(), "noSuchName");
///
/// assert_eq!(ErrorStatus::NotWritable.to_v1(), ErrorStatus::NoSuchName);
/// assert!(ErrorStatus::from_i32(19).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorStatus {
    /// Operation completed successfully (status = 0).
    NoError,
    /// Response message would be too large for transport (status = 1).
    TooBig,
    /// Requested OID not found (status = 2).
    NoSuchName,
    /// Invalid value provided in SET request (status = 3).
    BadValue,
    /// Attempted to SET a read-only object (status = 4).
    ReadOnly,
    /// Unspecified error occurred (status = 5).
    GenErr,
    /// Object exists but access is denied (status = 6).
    NoAccess,
    /// SET value has wrong ASN.1 type (status = 7).
    WrongType,
    /// SET value has incorrect length (status = 8).
    WrongLength,
    /// SET value uses wrong encoding (status = 9).
    WrongEncoding,
    /// SET value is out of range or otherwise invalid (status = 10).
    WrongValue,
    /// Object does not support row creation (status = 11).
    NoCreation,
    /// Value is inconsistent with other managed objects (status = 12).
    InconsistentValue,
    /// Resource required for SET is unavailable (status = 13).
    ResourceUnavailable,
    /// SET commit phase failed (status = 14).
    CommitFailed,
    /// SET undo phase failed (status = 15).
    UndoFailed,
    /// Access denied by VACM (status = 16).
    AuthorizationError,
    /// Object does not support modification (status = 17).
    NotWritable,
    /// Named object cannot be created (status = 18).
    InconsistentName,
}

/// All codes in ordinal order.
static ALL: [ErrorStatus; 19] = [
    ErrorStatus::NoError,
    ErrorStatus::TooBig,
    ErrorStatus::NoSuchName,
    ErrorStatus::BadValue,
    ErrorStatus::ReadOnly,
    ErrorStatus::GenErr,
    ErrorStatus::NoAccess,
    ErrorStatus::WrongType,
    ErrorStatus::WrongLength,
    ErrorStatus::WrongEncoding,
    ErrorStatus::WrongValue,
    ErrorStatus::NoCreation,
    ErrorStatus::InconsistentValue,
    ErrorStatus::ResourceUnavailable,
    ErrorStatus::CommitFailed,
    ErrorStatus::UndoFailed,
    ErrorStatus::AuthorizationError,
    ErrorStatus::NotWritable,
    ErrorStatus::InconsistentName,
];

/// v1 equivalent of each code, indexed by ordinal.
static V1_EQUIVALENT: [ErrorStatus; 19] = [
    ErrorStatus::NoError,
    ErrorStatus::TooBig,
    ErrorStatus::NoSuchName,
    ErrorStatus::BadValue,
    ErrorStatus::ReadOnly,
    ErrorStatus::GenErr,
    // noAccess
    ErrorStatus::NoSuchName,
    // wrongType
    ErrorStatus::BadValue,
    // wrongLength
    ErrorStatus::BadValue,
    // wrongEncoding
    ErrorStatus::BadValue,
    // wrongValue
    ErrorStatus::BadValue,
    // noCreation
    ErrorStatus::NoSuchName,
    // inconsistentValue
    ErrorStatus::BadValue,
    // resourceUnavailable
    ErrorStatus::GenErr,
    // commitFailed
    ErrorStatus::GenErr,
    // undoFailed
    ErrorStatus::GenErr,
    // authorizationError
    ErrorStatus::NoSuchName,
    // notWritable
    ErrorStatus::NoSuchName,
    // inconsistentName
    ErrorStatus::NoSuchName,
];

impl ErrorStatus {
    /// Look up a status by its wire code.
    ///
    /// Codes outside 0..=18 are rejected with a bad-value error.
    pub fn from_i32(value: i32) -> Result<Self> {
        usize::try_from(value)
            .ok()
            .and_then(|idx| ALL.get(idx).copied())
            .ok_or_else(|| {
                Error::bad_value(ValueErrorKind::ErrorStatusOutOfRange(i64::from(value)))
            })
    }

    /// Convert to raw status code.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// The SNMPv1 code a v1 manager should see for this status.
    pub fn to_v1(self) -> ErrorStatus {
        V1_EQUIVALENT[self as usize]
    }

    /// True for the six codes defined by SNMPv1.
    pub fn is_v1(self) -> bool {
        self.to_v1() == self
    }
}

impl std::fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::NoError => "noError",
            Self::TooBig => "tooBig",
            Self::NoSuchName => "noSuchName",
            Self::BadValue => "badValue",
            Self::ReadOnly => "readOnly",
            Self::GenErr => "genErr",
            Self::NoAccess => "noAccess",
            Self::WrongType => "wrongType",
            Self::WrongLength => "wrongLength",
            Self::WrongEncoding => "wrongEncoding",
            Self::WrongValue => "wrongValue",
            Self::NoCreation => "noCreation",
            Self::InconsistentValue => "inconsistentValue",
            Self::ResourceUnavailable => "resourceUnavailable",
            Self::CommitFailed => "commitFailed",
            Self::UndoFailed => "undoFailed",
            Self::AuthorizationError => "authorizationError",
            Self::NotWritable => "notWritable",
            Self::InconsistentName => "inconsistentName",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinals_match_table() {
        for (idx, status) in ALL.iter().enumerate() {
            assert_eq!(status.as_i32(), idx as i32);
            assert_eq!(ErrorStatus::from_i32(idx as i32).unwrap(), *status);
        }
    }

    #[test]
    fn out_of_range_rejected() {
        for code in [-1, 19, 100, i32::MIN, i32::MAX] {
            let err = ErrorStatus::from_i32(code).unwrap_err();
            assert!(matches!(
                *err,
                Error::BadValue {
                    kind: ValueErrorKind::ErrorStatusOutOfRange(_)
                }
            ));
        }
    }

    #[test]
    fn v1_codes_map_to_themselves() {
        for status in &ALL[..6] {
            assert_eq!(status.to_v1(), *status);
            assert!(status.is_v1());
        }
    }

    #[test]
    fn v2_codes_map_to_bad_value() {
        for status in [
            ErrorStatus::WrongValue,
            ErrorStatus::WrongEncoding,
            ErrorStatus::WrongType,
            ErrorStatus::WrongLength,
            ErrorStatus::InconsistentValue,
        ] {
            assert_eq!(status.to_v1(), ErrorStatus::BadValue, "{}", status);
        }
    }

    #[test]
    fn v2_codes_map_to_no_such_name() {
        for status in [
            ErrorStatus::NoAccess,
            ErrorStatus::NotWritable,
            ErrorStatus::NoCreation,
            ErrorStatus::InconsistentName,
            ErrorStatus::AuthorizationError,
        ] {
            assert_eq!(status.to_v1(), ErrorStatus::NoSuchName, "{}", status);
        }
    }

    #[test]
    fn v2_codes_map_to_gen_err() {
        for status in [
            ErrorStatus::ResourceUnavailable,
            ErrorStatus::CommitFailed,
            ErrorStatus::UndoFailed,
        ] {
            assert_eq!(status.to_v1(), ErrorStatus::GenErr, "{}", status);
            assert!(!status.is_v1());
        }
    }

    #[test]
    fn display_names() {
        assert_eq!(ErrorStatus::GenErr.to_string(), "genErr");
        assert_eq!(
            ErrorStatus::ResourceUnavailable.to_string(),
            "resourceUnavailable"
        );
    }
}
