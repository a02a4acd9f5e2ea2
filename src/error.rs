//! Errors of an IXFR diff session.

use std::error;
use std::fmt::Display;
use std::io;

use crate::base::name::NameError;
use crate::base::Serial;

//------------ SpoolError ----------------------------------------------------

/// Reading or writing a spool file failed.
#[derive(Debug)]
pub enum SpoolError {
    /// The underlying file operation failed.
    ///
    /// Short reads in the middle of a record surface here as
    /// [`io::ErrorKind::UnexpectedEof`].
    Io(io::Error),

    /// The spool contents do not form a valid snapshot.
    Malformed(MalformedSpoolError),
}

impl From<io::Error> for SpoolError {
    fn from(err: io::Error) -> Self {
        SpoolError::Io(err)
    }
}

impl From<MalformedSpoolError> for SpoolError {
    fn from(err: MalformedSpoolError) -> Self {
        SpoolError::Malformed(err)
    }
}

impl Display for SpoolError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SpoolError::Io(err) => write!(f, "{err}"),
            SpoolError::Malformed(err) => write!(f, "{err}"),
        }
    }
}

impl error::Error for SpoolError {}

//------------ MalformedSpoolError -------------------------------------------

/// A spool file violates the snapshot format.
#[derive(Debug)]
pub enum MalformedSpoolError {
    /// A stored domain name exceeds the 255 octet maximum.
    LongName(u16),

    /// A stored domain name is not valid uncompressed wire format.
    BadName(NameError),

    /// A record's rdata does not fit the 16 bit length field.
    OversizeRdata(usize),

    /// An rrset holds more records than the 16 bit count field allows.
    OversizeRrset(usize),
}

impl Display for MalformedSpoolError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MalformedSpoolError::LongName(len) => {
                write!(f, "domain name of {len} octets is too long")
            }
            MalformedSpoolError::BadName(err) => {
                write!(f, "bad domain name: {err}")
            }
            MalformedSpoolError::OversizeRdata(len) => {
                write!(f, "rdata of {len} octets is too long")
            }
            MalformedSpoolError::OversizeRrset(count) => {
                write!(f, "rrset of {count} records is too large")
            }
        }
    }
}

impl error::Error for MalformedSpoolError {}

//------------ StaleSnapshotError --------------------------------------------

/// The spool header does not match the snapshot the session recorded.
///
/// The zone was changed between snapshot and diff in a way that invalidates
/// the spool; the caller has to regenerate the snapshot.
#[derive(Clone, Copy, Debug)]
pub enum StaleSnapshotError {
    /// The apex name in the spool differs from the session's zone.
    ApexMismatch,

    /// The serial in the spool differs from the recorded old serial.
    SerialMismatch {
        /// The serial the session recorded at snapshot time.
        expected: Serial,
        /// The serial found in the spool header.
        found: Serial,
    },
}

impl Display for StaleSnapshotError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StaleSnapshotError::ApexMismatch => {
                write!(f, "spool does not contain the correct zone apex")
            }
            StaleSnapshotError::SerialMismatch { expected, found } => {
                write!(f, "spool has zone serial {found}, expected {expected}")
            }
        }
    }
}

impl error::Error for StaleSnapshotError {}

//------------ StoreError ----------------------------------------------------

/// An [`IxfrStore`][crate::store::IxfrStore] could not record an operation.
#[derive(Clone, Copy, Debug)]
pub struct StoreError;

impl Display for StoreError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "could not store ixfr data")
    }
}

impl error::Error for StoreError {}

//------------ IxfrCreateError -----------------------------------------------

/// An IXFR diff session failed.
///
/// No error is recovered internally; the diff is all-or-nothing and any
/// partially filled store must be discarded by the caller.
#[derive(Debug)]
pub enum IxfrCreateError {
    /// A spool read, write or open failed.
    Io(io::Error),

    /// The spool file is not a valid snapshot.
    MalformedSpool(MalformedSpoolError),

    /// The spool does not match the snapshot this session recorded.
    StaleSnapshot(StaleSnapshotError),

    /// The diff store refused an operation.
    Store(StoreError),
}

impl From<io::Error> for IxfrCreateError {
    fn from(err: io::Error) -> Self {
        IxfrCreateError::Io(err)
    }
}

impl From<SpoolError> for IxfrCreateError {
    fn from(err: SpoolError) -> Self {
        match err {
            SpoolError::Io(err) => IxfrCreateError::Io(err),
            SpoolError::Malformed(err) => IxfrCreateError::MalformedSpool(err),
        }
    }
}

impl From<StaleSnapshotError> for IxfrCreateError {
    fn from(err: StaleSnapshotError) -> Self {
        IxfrCreateError::StaleSnapshot(err)
    }
}

impl From<StoreError> for IxfrCreateError {
    fn from(err: StoreError) -> Self {
        IxfrCreateError::Store(err)
    }
}

impl Display for IxfrCreateError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            IxfrCreateError::Io(err) => write!(f, "io error: {err}"),
            IxfrCreateError::MalformedSpool(err) => {
                write!(f, "malformed spool: {err}")
            }
            IxfrCreateError::StaleSnapshot(err) => {
                write!(f, "stale snapshot: {err}")
            }
            IxfrCreateError::Store(err) => write!(f, "{err}"),
        }
    }
}

impl error::Error for IxfrCreateError {}
