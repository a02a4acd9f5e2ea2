//! Rdata atoms and their canonical uncompressed encoding.
//!
//! Rdata is stored as a sequence of atoms: domain names kept as full
//! [`Name`] values, and opaque octet runs kept verbatim. Which positions
//! of which record type hold a name is a static property of the type; the
//! [`is_domain`] table answers it.
//!
//! The canonical uncompressed encoding of an rdata is the concatenation of
//! its atoms in declaration order, with name atoms written as raw wire
//! format (no compression pointers) and octet runs written verbatim. The
//! spool stores rdata in this encoding and the diff compares against it
//! byte for byte.

use bytes::Bytes;

use crate::base::{Name, Rtype};

//------------ RdataAtom -----------------------------------------------------

/// One atom of a record's rdata.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RdataAtom {
    /// A domain name, stored uncompressed.
    Domain(Name),

    /// A run of opaque octets.
    Raw(Bytes),
}

impl RdataAtom {
    /// Returns the octets this atom contributes to the canonical encoding.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            RdataAtom::Domain(name) => name.as_slice(),
            RdataAtom::Raw(data) => data.as_ref(),
        }
    }
}

//------------ Free Functions ------------------------------------------------

/// Returns whether atom `index` of rdata of type `rtype` is a domain name.
///
/// Types not listed here carry octet runs only. That notably includes
/// types whose wire format contains a name that is never compressed and
/// never refers back into the zone tree, such as RRSIG's signer name;
/// those are stored as opaque octets.
pub fn is_domain(rtype: Rtype, index: usize) -> bool {
    match rtype {
        Rtype::NS | Rtype::CNAME | Rtype::PTR | Rtype::DNAME => index == 0,
        Rtype::SOA => index < 2,
        Rtype::MX => index == 1,
        Rtype::SRV => index == 3,
        _ => false,
    }
}

/// Returns the length of the canonical uncompressed encoding of `rdata`.
pub fn canonical_rdlen(rdata: &[RdataAtom]) -> usize {
    rdata.iter().map(|atom| atom.as_bytes().len()).sum()
}

/// Appends the canonical uncompressed encoding of `rdata` to `target`.
pub fn compose_canonical(rdata: &[RdataAtom], target: &mut Vec<u8>) {
    for atom in rdata {
        target.extend_from_slice(atom.as_bytes());
    }
}

//============ Tests ========================================================

#[cfg(test)]
mod tests {
    use core::str::FromStr;

    use super::*;

    #[test]
    fn domain_atom_table() {
        assert!(is_domain(Rtype::NS, 0));
        assert!(!is_domain(Rtype::NS, 1));
        assert!(is_domain(Rtype::SOA, 0));
        assert!(is_domain(Rtype::SOA, 1));
        assert!(!is_domain(Rtype::SOA, 2));
        assert!(!is_domain(Rtype::MX, 0));
        assert!(is_domain(Rtype::MX, 1));
        assert!(is_domain(Rtype::SRV, 3));
        assert!(!is_domain(Rtype::A, 0));
        assert!(!is_domain(Rtype::TXT, 0));
    }

    #[test]
    fn canonical_encoding() {
        let rdata = [
            RdataAtom::Raw(Bytes::from_static(b"\x00\x0a")),
            RdataAtom::Domain(Name::from_str("mx1.example").unwrap()),
        ];
        assert_eq!(canonical_rdlen(&rdata), 2 + 13);
        let mut buf = Vec::new();
        compose_canonical(&rdata, &mut buf);
        assert_eq!(buf, b"\x00\x0a\x03mx1\x07example\0");
    }
}
