//! Fundamental types for zone data.
//!
//! The diff core moves very little typed data around: names, 16 bit type
//! and class identifiers, serials, and TTLs. This module provides those
//! types; everything else the engine touches is either an opaque octet run
//! or lives in [`crate::zonedb`].

pub mod iana;
pub mod name;
pub mod serial;
pub mod ttl;

pub use self::iana::{Class, Rtype};
pub use self::name::Name;
pub use self::serial::Serial;
pub use self::ttl::Ttl;
