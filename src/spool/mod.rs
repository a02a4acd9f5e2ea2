//! The zone snapshot spool.
//!
//! Before a zone is reloaded, its current content is spooled to a
//! temporary file so the diff can later be computed against it. The spool
//! is written strictly front to back, without seeking or back-patching,
//! so a snapshot of arbitrary size streams out in one pass.
//!
//! The layout is:
//!
//! ```text
//! header:   dname apex, u32 old_serial
//! body:     for every domain with at least one in-zone rrset,
//!           in canonical name order:
//!             dname owner, u32 rrset_count,
//!             rrset_count times:
//!               u16 type, u16 class, u16 rr_count,
//!               rr_count times:
//!                 u32 ttl, u16 rdlen, rdlen octets canonical rdata
//! trailer:  u16 zero (domain names are never zero length)
//! ```
//!
//! where `dname` is a u16 length followed by that many octets of
//! uncompressed wire format name. All integers are in host byte order:
//! the spool is a transient, process-local artifact, never interchanged,
//! and the pid-stamped file name underlines that. Names are stored
//! uncompressed because compression would need pointer fix-ups into
//! already written data, which streaming rules out.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::base::{Name, Serial};
use crate::error::{MalformedSpoolError, SpoolError};
use crate::zonedb::{rdata, Namedb, Rr, Rrset, Zone};

pub mod iter;
pub mod reader;

//------------ SpoolWriter ---------------------------------------------------

/// Streams a zone snapshot to a file.
#[derive(Debug)]
struct SpoolWriter {
    out: BufWriter<File>,
}

impl SpoolWriter {
    /// Creates a spool at `path`, truncating any prior contents.
    fn create(path: &Path) -> Result<Self, SpoolError> {
        let file = File::create(path)?;
        Ok(SpoolWriter {
            out: BufWriter::new(file),
        })
    }

    fn put_u16(&mut self, value: u16) -> Result<(), SpoolError> {
        self.out.write_all(&value.to_ne_bytes())?;
        Ok(())
    }

    fn put_u32(&mut self, value: u32) -> Result<(), SpoolError> {
        self.out.write_all(&value.to_ne_bytes())?;
        Ok(())
    }

    fn put_dname(&mut self, name: &Name) -> Result<(), SpoolError> {
        // Names are at most 255 octets, so the length always fits.
        self.put_u16(name.len() as u16)?;
        self.out.write_all(name.as_slice())?;
        Ok(())
    }

    fn put_rr(&mut self, rr: &Rr) -> Result<(), SpoolError> {
        self.put_u32(rr.ttl().as_secs())?;
        let rdlen = rdata::canonical_rdlen(rr.rdata());
        if rdlen > usize::from(u16::MAX) {
            return Err(MalformedSpoolError::OversizeRdata(rdlen).into());
        }
        self.put_u16(rdlen as u16)?;
        for atom in rr.rdata() {
            self.out.write_all(atom.as_bytes())?;
        }
        Ok(())
    }

    fn put_rrset(&mut self, rrset: &Rrset) -> Result<(), SpoolError> {
        if rrset.rrs().is_empty() {
            return Ok(());
        }
        if rrset.rrs().len() > usize::from(u16::MAX) {
            return Err(
                MalformedSpoolError::OversizeRrset(rrset.rrs().len()).into()
            );
        }
        self.put_u16(rrset.rtype().to_int())?;
        self.put_u16(rrset.class().to_int())?;
        self.put_u16(rrset.rrs().len() as u16)?;
        for rr in rrset.rrs() {
            self.put_rr(rr)?;
        }
        Ok(())
    }

    /// Writes the end-of-stream sentinel and flushes the file.
    fn finish(mut self) -> Result<(), SpoolError> {
        self.put_u16(0)?;
        self.out.flush()?;
        Ok(())
    }
}

//------------ Free Functions ------------------------------------------------

/// Writes a complete snapshot of `zone` to `path`, tagged with `serial`.
///
/// On failure the file is left in an undefined state; the caller has to
/// treat it as invalid and regenerate or abort.
pub fn spool_zone(
    db: &Namedb,
    zone: &Zone,
    path: &Path,
    serial: Serial,
) -> Result<(), SpoolError> {
    let mut writer = SpoolWriter::create(path)?;
    writer.put_dname(zone.apex())?;
    writer.put_u32(serial.into_int())?;
    for (name, domain) in db.walk_from(zone.apex()) {
        // The count has to match the rrsets actually written, so empty
        // rrsets are left out of it the same way put_rrset leaves them
        // out of the stream.
        let count = domain
            .in_zone_rrsets(zone)
            .filter(|rrset| !rrset.rrs().is_empty())
            .count();
        if count == 0 {
            continue;
        }
        writer.put_dname(name)?;
        writer.put_u32(count as u32)?;
        for rrset in domain.in_zone_rrsets(zone) {
            writer.put_rrset(rrset)?;
        }
    }
    writer.finish()
}

//============ Tests ========================================================

#[cfg(test)]
mod tests {
    use core::str::FromStr;

    use bytes::Bytes;

    use super::reader::SpoolReader;
    use super::*;
    use crate::base::{Class, Rtype, Ttl};
    use crate::zonedb::RdataAtom;

    fn name(s: &str) -> Name {
        Name::from_str(s).unwrap()
    }

    #[test]
    fn snapshot_roundtrip() {
        let zone = Zone::new(name("example"), Class::IN);
        let mut db = Namedb::new();
        let ttl = Ttl::from_secs(3600);
        db.insert_rr(
            &zone,
            name("example"),
            Rtype::NS,
            ttl,
            vec![RdataAtom::Domain(name("ns1.example"))],
        )
        .unwrap();
        db.insert_rr(
            &zone,
            name("www.example"),
            Rtype::A,
            ttl,
            vec![RdataAtom::Raw(Bytes::from_static(&[192, 0, 2, 1]))],
        )
        .unwrap();
        db.insert_rr(
            &zone,
            name("www.example"),
            Rtype::A,
            ttl,
            vec![RdataAtom::Raw(Bytes::from_static(&[192, 0, 2, 2]))],
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spool");
        spool_zone(&db, &zone, &path, Serial(77)).unwrap();

        let mut reader = SpoolReader::open(&path).unwrap();
        reader.check_header(zone.apex(), Serial(77)).unwrap();

        // First domain: the apex with its single NS rrset.
        assert_eq!(reader.get_dname().unwrap().unwrap(), name("example"));
        assert_eq!(reader.get_u32().unwrap(), 1);
        assert_eq!(reader.get_u16().unwrap(), Rtype::NS.to_int());
        assert_eq!(reader.get_u16().unwrap(), Class::IN.to_int());
        assert_eq!(reader.get_u16().unwrap(), 1);
        assert_eq!(reader.get_u32().unwrap(), 3600);
        let rdlen = reader.get_u16().unwrap();
        let mut buf = Vec::new();
        reader.get_rdata_into(rdlen, &mut buf).unwrap();
        assert_eq!(buf, b"\x03ns1\x07example\0");

        // Second domain: both A records under one rrset header.
        assert_eq!(
            reader.get_dname().unwrap().unwrap(),
            name("www.example")
        );
        assert_eq!(reader.get_u32().unwrap(), 1);
        assert_eq!(reader.get_u16().unwrap(), Rtype::A.to_int());
        assert_eq!(reader.get_u16().unwrap(), Class::IN.to_int());
        assert_eq!(reader.get_u16().unwrap(), 2);
        for addr in [[192, 0, 2, 1], [192, 0, 2, 2]] {
            assert_eq!(reader.get_u32().unwrap(), 3600);
            let rdlen = reader.get_u16().unwrap();
            reader.get_rdata_into(rdlen, &mut buf).unwrap();
            assert_eq!(buf, addr);
        }

        // Trailer.
        assert!(reader.get_dname().unwrap().is_none());
    }

    #[test]
    fn foreign_and_empty_domains_are_omitted() {
        let parent = Zone::new(name("example"), Class::IN);
        let child = Zone::new(name("sub.example"), Class::IN);
        let mut db = Namedb::new();
        let ttl = Ttl::from_secs(300);
        db.insert_rr(
            &parent,
            name("example"),
            Rtype::NS,
            ttl,
            vec![RdataAtom::Domain(name("ns1.example"))],
        )
        .unwrap();
        db.insert_rr(
            &child,
            name("sub.example"),
            Rtype::A,
            ttl,
            vec![RdataAtom::Raw(Bytes::from_static(&[192, 0, 2, 9]))],
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spool");
        spool_zone(&db, &parent, &path, Serial(1)).unwrap();

        let mut reader = SpoolReader::open(&path).unwrap();
        reader.check_header(parent.apex(), Serial(1)).unwrap();
        assert_eq!(reader.get_dname().unwrap().unwrap(), name("example"));
        assert_eq!(reader.get_u32().unwrap(), 1);
        assert_eq!(reader.get_u16().unwrap(), Rtype::NS.to_int());
        assert_eq!(reader.get_u16().unwrap(), Class::IN.to_int());
        assert_eq!(reader.get_u16().unwrap(), 1);
        assert_eq!(reader.get_u32().unwrap(), 300);
        let rdlen = reader.get_u16().unwrap();
        let mut buf = Vec::new();
        reader.get_rdata_into(rdlen, &mut buf).unwrap();
        // The child zone's domain never shows up: straight to the trailer.
        assert!(reader.get_dname().unwrap().is_none());
    }
}
