//! The ordered merge between the spooled old zone and the live new zone.
//!
//! Both inputs arrive as sequences of `(domain, rrsets)` in canonical DNS
//! name order: the old zone streamed from the spool, the new zone walked
//! live in the database. The merge advances two cursors through them in a
//! single linear pass, emitting deletes for spool-only data, adds for
//! zone-only data, and per-RR differences where a domain exists on both
//! sides. Neither side is ever materialized in full.

use core::cmp::Ordering;

use tracing::trace;

use crate::base::{Class, Name, Rtype, Ttl};
use crate::error::{IxfrCreateError, SpoolError};
use crate::spool::iter::SpoolDnameIter;
use crate::spool::reader::SpoolReader;
use crate::store::IxfrStore;
use crate::zonedb::rdata::RdataAtom;
use crate::zonedb::{Domain, Namedb, Rr, Rrset, Zone};

//------------ ZoneDiffer ----------------------------------------------------

/// Merges the spooled old zone with the live new zone.
///
/// The spool reader has to be positioned just past the header; the store
/// receives every delete and add the merge discovers.
pub(crate) struct ZoneDiffer<'a, S> {
    db: &'a Namedb,
    zone: &'a Zone,
    spool: &'a mut SpoolReader,
    store: &'a mut S,
    iter: SpoolDnameIter,

    /// Scratch for one spooled rdata, reused across all RRs of the run.
    rdata_buf: Vec<u8>,
}

impl<'a, S: IxfrStore> ZoneDiffer<'a, S> {
    pub(crate) fn new(
        db: &'a Namedb,
        zone: &'a Zone,
        spool: &'a mut SpoolReader,
        store: &'a mut S,
    ) -> Self {
        ZoneDiffer {
            db,
            zone,
            spool,
            store,
            iter: SpoolDnameIter::new(),
            rdata_buf: Vec::new(),
        }
    }

    /// Walks the new zone against the spool and emits the differences.
    pub(crate) fn walk_zone(mut self) -> Result<(), IxfrCreateError> {
        let db = self.db;
        let zone = self.zone;
        for (name, domain) in db.walk_from(zone.apex()) {
            if domain.rrset_count_of(zone) == 0 {
                continue;
            }
            self.process_domain(name, domain)?;
        }
        self.process_spool_remaining()?;
        trace!("completed difference walk of zone {}", zone.apex());
        Ok(())
    }

    /// Handles one domain of the new zone.
    ///
    /// Catches the spool up first; afterwards the spool either holds this
    /// very domain, in which case the two sides are diffed RR by RR, or it
    /// is at a later name or at the end, in which case the domain only
    /// exists in the new zone and all its RRs are additions. In the latter
    /// case the spool name is left unconsumed so it is compared against
    /// the next new-zone domain again.
    fn process_domain(
        &mut self,
        name: &Name,
        domain: &Domain,
    ) -> Result<(), IxfrCreateError> {
        self.process_spool_before(name)?;
        if self.iter.eof() {
            return self.process_domain_add_rrs(name, domain);
        }
        let at_domain = match self.iter.dname() {
            Some(spool_name) => {
                spool_name.as_slice() == name.as_slice()
            }
            None => false,
        };
        if !at_domain {
            return self.process_domain_add_rrs(name, domain);
        }
        self.process_diff_domain(name, domain)?;
        self.iter.mark_processed();
        Ok(())
    }

    /// Consumes every spooled name smaller than `name` as a deletion.
    ///
    /// Stops with the cursor at the end of the stream or holding a name at
    /// or after `name`.
    fn process_spool_before(
        &mut self,
        name: &Name,
    ) -> Result<(), IxfrCreateError> {
        while !self.iter.eof() {
            self.iter.advance(self.spool)?;
            if self.iter.eof() {
                break;
            }
            let spool_name = match self.iter.dname() {
                Some(spool_name) => spool_name.clone(),
                None => break,
            };
            match spool_name.canonical_cmp(name) {
                Ordering::Less => {
                    self.process_domain_del_rrs(&spool_name)?;
                    self.iter.mark_processed();
                }
                _ => return Ok(()),
            }
        }
        Ok(())
    }

    /// Deletes a whole spooled domain: every rrset, every RR.
    fn process_domain_del_rrs(
        &mut self,
        owner: &Name,
    ) -> Result<(), IxfrCreateError> {
        let rrset_count = self.spool.get_u32()?;
        for _ in 0..rrset_count {
            let (rtype, class, rr_count) = self.read_rrset_header()?;
            self.process_spool_delrrset(owner, rtype, class, rr_count)?;
        }
        Ok(())
    }

    /// Diffs one domain that exists in both the spool and the new zone.
    ///
    /// Spooled rrsets with no counterpart in the new zone are whole
    /// deletions; those with one are diffed RR by RR and their type noted.
    /// Afterwards, new-zone rrsets whose type was never noted are whole
    /// additions.
    fn process_diff_domain(
        &mut self,
        name: &Name,
        domain: &Domain,
    ) -> Result<(), IxfrCreateError> {
        let rrset_count = self.spool.get_u32()?;
        let mut marked_types = Vec::new();
        for _ in 0..rrset_count {
            let (rtype, class, rr_count) = self.read_rrset_header()?;
            match domain.find_rrset(self.zone, rtype) {
                None => {
                    self.process_spool_delrrset(
                        name, rtype, class, rr_count,
                    )?;
                }
                Some(rrset) => {
                    marked_types.push(rtype);
                    self.process_diff_rrset(
                        name, rtype, class, rr_count, rrset,
                    )?;
                }
            }
        }
        let zone = self.zone;
        for rrset in domain.in_zone_rrsets(zone) {
            if marked_types.contains(&rrset.rtype()) {
                continue;
            }
            self.process_add_rrset(name, rrset)?;
        }
        Ok(())
    }

    /// Diffs one rrset that exists in both the spool and the new zone.
    ///
    /// Every spooled RR found unchanged in the new rrset has its index
    /// noted; the rest are deletions. New RRs whose index was never noted
    /// are additions. The pairing is a linear scan per spooled RR; rrsets
    /// are small enough in practice that this does not matter.
    fn process_diff_rrset(
        &mut self,
        owner: &Name,
        rtype: Rtype,
        class: Class,
        rr_count: u16,
        rrset: &Rrset,
    ) -> Result<(), IxfrCreateError> {
        let mut marked_rrs: Vec<u16> = Vec::new();
        for _ in 0..rr_count {
            let (ttl, rdlen) = self.read_rr_header()?;
            self.read_rdata(rdlen)?;
            match rrset_find_rdata(rrset, ttl, &self.rdata_buf) {
                Some(index) => marked_rrs.push(index),
                None => {
                    self.store.del_rr_uncompressed(
                        owner.as_slice(),
                        rtype,
                        class,
                        ttl,
                        &self.rdata_buf,
                    )?;
                }
            }
        }
        for (index, rr) in rrset.rrs().iter().enumerate() {
            if marked_rrs.contains(&(index as u16)) {
                continue;
            }
            self.store.add_rr(
                owner,
                rrset.rtype(),
                rrset.class(),
                rr.ttl(),
                rr.rdata(),
            )?;
        }
        Ok(())
    }

    /// Deletes `rr_count` spooled RRs of one rrset.
    fn process_spool_delrrset(
        &mut self,
        owner: &Name,
        rtype: Rtype,
        class: Class,
        rr_count: u16,
    ) -> Result<(), IxfrCreateError> {
        for _ in 0..rr_count {
            let (ttl, rdlen) = self.read_rr_header()?;
            self.read_rdata(rdlen)?;
            self.store.del_rr_uncompressed(
                owner.as_slice(),
                rtype,
                class,
                ttl,
                &self.rdata_buf,
            )?;
        }
        Ok(())
    }

    /// Adds every RR of one new-zone rrset.
    fn process_add_rrset(
        &mut self,
        owner: &Name,
        rrset: &Rrset,
    ) -> Result<(), IxfrCreateError> {
        for rr in rrset.rrs() {
            self.store.add_rr(
                owner,
                rrset.rtype(),
                rrset.class(),
                rr.ttl(),
                rr.rdata(),
            )?;
        }
        Ok(())
    }

    /// Adds every in-zone RR of one new-zone domain.
    fn process_domain_add_rrs(
        &mut self,
        name: &Name,
        domain: &Domain,
    ) -> Result<(), IxfrCreateError> {
        let zone = self.zone;
        for rrset in domain.in_zone_rrsets(zone) {
            self.process_add_rrset(name, rrset)?;
        }
        Ok(())
    }

    /// Deletes the spooled domains after the last new-zone domain.
    fn process_spool_remaining(&mut self) -> Result<(), IxfrCreateError> {
        while !self.iter.eof() {
            self.iter.advance(self.spool)?;
            if self.iter.eof() {
                break;
            }
            let spool_name = match self.iter.dname() {
                Some(spool_name) => spool_name.clone(),
                None => break,
            };
            self.process_domain_del_rrs(&spool_name)?;
            self.iter.mark_processed();
        }
        Ok(())
    }

    fn read_rrset_header(
        &mut self,
    ) -> Result<(Rtype, Class, u16), SpoolError> {
        let rtype = Rtype::from_int(self.spool.get_u16()?);
        let class = Class::from_int(self.spool.get_u16()?);
        let rr_count = self.spool.get_u16()?;
        Ok((rtype, class, rr_count))
    }

    fn read_rr_header(&mut self) -> Result<(Ttl, u16), SpoolError> {
        let ttl = Ttl::from_secs(self.spool.get_u32()?);
        let rdlen = self.spool.get_u16()?;
        Ok((ttl, rdlen))
    }

    fn read_rdata(&mut self, rdlen: u16) -> Result<(), SpoolError> {
        self.spool.get_rdata_into(rdlen, &mut self.rdata_buf)
    }
}

//------------ Free Functions ------------------------------------------------

/// Finds an RR with the given TTL and canonical rdata in an rrset.
///
/// Returns the index of the first match.
fn rrset_find_rdata(rrset: &Rrset, ttl: Ttl, rdata: &[u8]) -> Option<u16> {
    rrset
        .rrs()
        .iter()
        .position(|rr| rr.ttl() == ttl && rdata_match(rr, rdata))
        .map(|index| index as u16)
}

/// Compares an in-memory RR's atoms against canonical rdata octets.
///
/// Walks the atoms in order, advancing a cursor through `rdata`; name
/// atoms contribute their full wire format, octet runs themselves. The
/// comparison is octet-exact, including ASCII case of names, and the
/// cursor has to land exactly on the end of `rdata`.
fn rdata_match(rr: &Rr, rdata: &[u8]) -> bool {
    let mut pos = 0;
    for atom in rr.rdata() {
        let bytes = match atom {
            RdataAtom::Domain(name) => name.as_slice(),
            RdataAtom::Raw(data) => data.as_ref(),
        };
        if pos + bytes.len() > rdata.len() {
            return false;
        }
        if rdata[pos..pos + bytes.len()] != *bytes {
            return false;
        }
        pos += bytes.len();
    }
    pos == rdata.len()
}

//============ Tests ========================================================

#[cfg(test)]
mod tests {
    use core::str::FromStr;

    use bytes::Bytes;

    use super::*;
    use crate::zonedb::rdata;

    fn name(s: &str) -> Name {
        Name::from_str(s).unwrap()
    }

    fn mx_rdata(pref: u16, exchanger: &str) -> Vec<RdataAtom> {
        vec![
            RdataAtom::Raw(Bytes::copy_from_slice(&pref.to_be_bytes())),
            RdataAtom::Domain(name(exchanger)),
        ]
    }

    #[test]
    fn rdata_match_roundtrip() {
        // Spooling an RR and matching it against itself succeeds for
        // every atom layout.
        let rdatas = [
            vec![RdataAtom::Raw(Bytes::from_static(&[192, 0, 2, 1]))],
            mx_rdata(10, "mx1.example"),
            vec![RdataAtom::Domain(name("ns1.example"))],
        ];
        for atoms in rdatas {
            let rr = Rr::new(Ttl::from_secs(3600), atoms.clone());
            let mut canonical = Vec::new();
            rdata::compose_canonical(&atoms, &mut canonical);
            assert!(rdata_match(&rr, &canonical));
        }
    }

    #[test]
    fn rdata_match_is_exact() {
        let rr = Rr::new(Ttl::ZERO, mx_rdata(10, "mx1.example"));
        let mut canonical = Vec::new();
        rdata::compose_canonical(rr.rdata(), &mut canonical);

        // A trailing octet makes the cursor miss the end.
        let mut long = canonical.clone();
        long.push(0);
        assert!(!rdata_match(&rr, &long));

        // A missing octet runs the atoms past the end.
        let short = &canonical[..canonical.len() - 1];
        assert!(!rdata_match(&rr, short));

        // A case difference in the name is a difference.
        let mut cased = canonical.clone();
        let pos = cased.len() - 2;
        cased[pos] = cased[pos].to_ascii_uppercase();
        assert!(!rdata_match(&rr, &cased));

        // And a preference change is one too.
        let mut other = canonical;
        other[1] = 20;
        assert!(!rdata_match(&rr, &other));
    }

    #[test]
    fn find_rdata_keys_on_ttl_and_rdata() {
        let zone = Zone::new(name("example"), Class::IN);
        let mut db = Namedb::new();
        db.insert_rr(
            &zone,
            name("example"),
            Rtype::MX,
            Ttl::from_secs(3600),
            mx_rdata(10, "mx1.example"),
        )
        .unwrap();
        db.insert_rr(
            &zone,
            name("example"),
            Rtype::MX,
            Ttl::from_secs(3600),
            mx_rdata(20, "mx2.example"),
        )
        .unwrap();
        let rrset = db
            .find_domain(&name("example"))
            .unwrap()
            .find_rrset(&zone, Rtype::MX)
            .unwrap();

        let mut wanted = Vec::new();
        rdata::compose_canonical(&mx_rdata(20, "mx2.example"), &mut wanted);
        assert_eq!(
            rrset_find_rdata(rrset, Ttl::from_secs(3600), &wanted),
            Some(1)
        );
        // A TTL difference means no match even for equal rdata.
        assert_eq!(
            rrset_find_rdata(rrset, Ttl::from_secs(300), &wanted),
            None
        );
    }
}
