//! Incremental zone transfer (IXFR) difference generation.
//!
//! When an authoritative name server reloads a zone, clients that hold the
//! previous version should not have to fetch the whole zone again: RFC 1995
//! incremental zone transfer delivers only the records that changed between
//! two zone serials. This crate computes those changes.
//!
//! The catch is that by the time the new zone content is in memory, the old
//! content is gone. An [`IxfrCreate`] session therefore spans the reload:
//! [`IxfrCreate::start`] streams a snapshot of the zone as it is now, the
//! spool, to a temporary file, and [`IxfrCreate::perform`], called once
//! the zone holds its new content, merges the spooled snapshot with the
//! live zone in a single ordered pass. Since both the spool and the zone
//! database yield their domains in canonical DNS name order, the merge
//! never materializes either side in full; it emits per-RR deletions and
//! additions as it goes.
//!
//! ```
//! use std::str::FromStr;
//!
//! use bytes::Bytes;
//! use ixfrgen::base::{Class, Name, Rtype, Ttl};
//! use ixfrgen::zonedb::{Namedb, RdataAtom, Zone};
//! use ixfrgen::IxfrCreate;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let dir = tempfile::tempdir()?;
//! # let zfile = dir.path().join("example.zone");
//! let zone = Zone::new(Name::from_str("example")?, Class::IN);
//! let mut db = Namedb::new();
//! // ... load the zone into the database ...
//! # db.insert_rr(
//! #     &zone,
//! #     Name::from_str("example")?,
//! #     Rtype::TXT,
//! #     Ttl::from_secs(3600),
//! #     vec![RdataAtom::Raw(Bytes::from_static(b"\x02hi"))],
//! # ).unwrap();
//!
//! // Snapshot the old content, then reload the zone.
//! let mut session = IxfrCreate::start(&db, &zone, &zfile)?;
//! // ... replace the database content with the new zone version ...
//!
//! let diff = session.perform(&db, &zone)?;
//! for rr in diff.removed() {
//!     println!("deleted: {} {} {}", rr.owner, rr.class, rr.rtype);
//! }
//! for rr in diff.added() {
//!     println!("added: {} {} {}", rr.owner, rr.class, rr.rtype);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! The crate does not parse zone files, serve transfers, or validate
//! DNSSEC; it is the difference engine in between. The zone database it
//! diffs against lives in [`zonedb`], the snapshot format in [`spool`],
//! and the emitted differences in [`store`].

#![warn(missing_docs)]

pub mod base;
pub mod create;
mod diff;
pub mod error;
pub mod spool;
pub mod store;
pub mod zonedb;

pub use self::create::IxfrCreate;
pub use self::error::IxfrCreateError;
pub use self::store::{DiffRr, IxfrData, IxfrStore};
