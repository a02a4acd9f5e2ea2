//! Collecting the differences between two zone versions.
//!
//! The diff engine does not assemble IXFR messages itself; it emits
//! per-RR delete and add operations into an [`IxfrStore`]. The two
//! operations are deliberately asymmetric: adds originate from live zone
//! data and carry their rdata as atoms, while deletes originate from the
//! spool and carry opaque canonical rdata octets.
//!
//! [`IxfrData`] is the store `perform` fills: the two difference lists
//! bound to the serial pair they lead from and to, ready to be packaged
//! into an IXFR response (RFC 1995).

use bytes::Bytes;

use crate::base::{Class, Name, Rtype, Serial, Ttl};
use crate::error::StoreError;
use crate::zonedb::rdata::{self, RdataAtom};

//------------ IxfrStore -----------------------------------------------------

/// A sink for the delete and add operations the diff engine emits.
///
/// Within a diff run operations arrive in domain-canonical order; inside a
/// domain, the deletes of an rrset precede its adds.
pub trait IxfrStore {
    /// Records one added RR, rdata given as in-memory atoms.
    fn add_rr(
        &mut self,
        owner: &Name,
        rtype: Rtype,
        class: Class,
        ttl: Ttl,
        rdata: &[RdataAtom],
    ) -> Result<(), StoreError>;

    /// Records one deleted RR, rdata given as canonical octets.
    ///
    /// The owner arrives as uncompressed wire format octets exactly as
    /// read from the spool.
    fn del_rr_uncompressed(
        &mut self,
        owner: &[u8],
        rtype: Rtype,
        class: Class,
        ttl: Ttl,
        rdata: &[u8],
    ) -> Result<(), StoreError>;
}

//------------ DiffRr --------------------------------------------------------

/// One RR in a difference list, rdata in canonical uncompressed form.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DiffRr {
    /// The owner name of the record.
    pub owner: Name,

    /// The record type.
    pub rtype: Rtype,

    /// The class.
    pub class: Class,

    /// The time-to-live.
    pub ttl: Ttl,

    /// The canonical uncompressed rdata octets.
    pub rdata: Bytes,
}

//------------ IxfrData ------------------------------------------------------

/// The collected differences between two versions of a zone.
///
/// Applying the deletions and then the additions to the old version yields
/// the new version. Both lists are in the order the diff engine emitted
/// them, which is domain-canonical order.
#[derive(Debug)]
pub struct IxfrData {
    old_serial: Serial,
    new_serial: Serial,
    removed: Vec<DiffRr>,
    added: Vec<DiffRr>,
}

impl IxfrData {
    /// Creates an empty difference set between the two serials.
    pub fn new(old_serial: Serial, new_serial: Serial) -> Self {
        IxfrData {
            old_serial,
            new_serial,
            removed: Vec::new(),
            added: Vec::new(),
        }
    }

    /// Returns the serial of the old version.
    pub fn old_serial(&self) -> Serial {
        self.old_serial
    }

    /// Returns the serial of the new version.
    pub fn new_serial(&self) -> Serial {
        self.new_serial
    }

    /// Returns the records deleted from the old version.
    pub fn removed(&self) -> &[DiffRr] {
        &self.removed
    }

    /// Returns the records added in the new version.
    pub fn added(&self) -> &[DiffRr] {
        &self.added
    }

    /// Returns whether the diff is empty, i.e., the versions are equal.
    ///
    /// An empty diff is not an error.
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }
}

impl IxfrStore for IxfrData {
    fn add_rr(
        &mut self,
        owner: &Name,
        rtype: Rtype,
        class: Class,
        ttl: Ttl,
        rdata: &[RdataAtom],
    ) -> Result<(), StoreError> {
        let mut buf = Vec::with_capacity(rdata::canonical_rdlen(rdata));
        rdata::compose_canonical(rdata, &mut buf);
        self.added.push(DiffRr {
            owner: owner.clone(),
            rtype,
            class,
            ttl,
            rdata: buf.into(),
        });
        Ok(())
    }

    fn del_rr_uncompressed(
        &mut self,
        owner: &[u8],
        rtype: Rtype,
        class: Class,
        ttl: Ttl,
        rdata: &[u8],
    ) -> Result<(), StoreError> {
        let owner = Name::from_wire(Bytes::copy_from_slice(owner))
            .map_err(|_| StoreError)?;
        self.removed.push(DiffRr {
            owner,
            rtype,
            class,
            ttl,
            rdata: Bytes::copy_from_slice(rdata),
        });
        Ok(())
    }
}

//============ Tests ========================================================
