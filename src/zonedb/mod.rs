//! The in-memory zone database.
//!
//! A [`Namedb`] is one domain table shared by all zones served from it,
//! kept in canonical DNS name order. A [`Zone`] is a lightweight handle
//! naming an apex within the table. Several zones can occupy the same
//! table, since a delegated child zone lives below its parent's apex, so
//! every [`Rrset`] is tagged with the apex of the zone it belongs to and
//! all per-zone operations filter on that tag.
//!
//! The diff core relies on one property above all others: iterating the
//! table from a zone's apex yields the zone's domains in canonical name
//! order. The table is a `BTreeMap` keyed by [`Name`], whose `Ord` is
//! canonical order, so this holds by construction.

use std::collections::BTreeMap;
use std::fmt::Display;

use crate::base::{Class, Name, Rtype, Serial, Ttl};

pub mod rdata;

pub use self::rdata::RdataAtom;

//------------ Namedb --------------------------------------------------------

/// The domain table shared by the zones of one server.
#[derive(Debug, Default)]
pub struct Namedb {
    domains: BTreeMap<Name, Domain>,
}

impl Namedb {
    /// Creates an empty database.
    pub fn new() -> Self {
        Default::default()
    }

    /// Inserts one RR into the database as data of `zone`.
    ///
    /// The owner has to lie at or below the zone's apex. The RR is
    /// appended to the rrset for `(owner, rtype)` belonging to `zone`,
    /// creating domain and rrset as needed.
    pub fn insert_rr(
        &mut self,
        zone: &Zone,
        owner: Name,
        rtype: Rtype,
        ttl: Ttl,
        rdata: Vec<RdataAtom>,
    ) -> Result<(), OutOfZone> {
        if !owner.is_subdomain_of(zone.apex()) {
            return Err(OutOfZone);
        }
        let domain = self.domains.entry(owner).or_default();
        let index = match domain
            .rrsets
            .iter()
            .position(|rrset| rrset.is_of(zone) && rrset.rtype == rtype)
        {
            Some(index) => index,
            None => {
                domain.rrsets.push(Rrset {
                    zone_apex: zone.apex().clone(),
                    rtype,
                    class: zone.class(),
                    rrs: Vec::new(),
                });
                domain.rrsets.len() - 1
            }
        };
        domain.rrsets[index].rrs.push(Rr { ttl, rdata });
        Ok(())
    }

    /// Looks up a domain by name.
    pub fn find_domain(&self, name: &Name) -> Option<&Domain> {
        self.domains.get(name)
    }

    /// Iterates over the domains at and below `apex` in canonical order.
    ///
    /// Empty domains and domains carrying only foreign zone data are
    /// included; callers filter on per-zone rrset counts.
    pub fn walk_from<'a>(
        &'a self,
        apex: &'a Name,
    ) -> impl Iterator<Item = (&'a Name, &'a Domain)> + 'a {
        self.domains
            .range(apex.clone()..)
            .take_while(move |(name, _)| name.is_subdomain_of(apex))
    }

    /// Returns the current serial of `zone` from its apex SOA.
    pub fn serial_of(&self, zone: &Zone) -> Option<Serial> {
        let domain = self.domains.get(zone.apex())?;
        let rrset = domain.find_rrset(zone, Rtype::SOA)?;
        let rr = rrset.rrs.first()?;
        match rr.rdata.get(2) {
            Some(RdataAtom::Raw(data)) if data.len() >= 4 => Some(
                Serial::from_be_bytes([data[0], data[1], data[2], data[3]]),
            ),
            _ => None,
        }
    }
}

//------------ Zone ----------------------------------------------------------

/// A handle for one zone within a [`Namedb`].
#[derive(Clone, Debug)]
pub struct Zone {
    apex: Name,
    class: Class,
}

impl Zone {
    /// Creates a handle for the zone rooted at `apex`.
    pub fn new(apex: Name, class: Class) -> Self {
        Zone { apex, class }
    }

    /// Returns the apex name of the zone.
    pub fn apex(&self) -> &Name {
        &self.apex
    }

    /// Returns the class of the zone.
    pub fn class(&self) -> Class {
        self.class
    }
}

//------------ Domain --------------------------------------------------------

/// A named node in the domain table.
#[derive(Debug, Default)]
pub struct Domain {
    rrsets: Vec<Rrset>,
}

impl Domain {
    /// Returns all rrsets of the domain, regardless of owning zone.
    pub fn rrsets(&self) -> &[Rrset] {
        &self.rrsets
    }

    /// Iterates over the rrsets belonging to `zone`.
    pub fn in_zone_rrsets<'a>(
        &'a self,
        zone: &'a Zone,
    ) -> impl Iterator<Item = &'a Rrset> + 'a {
        self.rrsets.iter().filter(move |rrset| rrset.is_of(zone))
    }

    /// Counts the rrsets belonging to `zone`.
    pub fn rrset_count_of(&self, zone: &Zone) -> usize {
        self.rrsets.iter().filter(|rrset| rrset.is_of(zone)).count()
    }

    /// Finds the rrset of the given type belonging to `zone`.
    pub fn find_rrset<'a>(
        &'a self,
        zone: &'a Zone,
        rtype: Rtype,
    ) -> Option<&'a Rrset> {
        self.in_zone_rrsets(zone).find(|rrset| rrset.rtype == rtype)
    }
}

//------------ Rrset ---------------------------------------------------------

/// All RRs of one type at one owner, tagged with the zone they belong to.
#[derive(Debug)]
pub struct Rrset {
    zone_apex: Name,
    rtype: Rtype,
    class: Class,
    rrs: Vec<Rr>,
}

impl Rrset {
    /// Returns the record type of the rrset.
    pub fn rtype(&self) -> Rtype {
        self.rtype
    }

    /// Returns the class of the rrset.
    pub fn class(&self) -> Class {
        self.class
    }

    /// Returns the records of the rrset.
    pub fn rrs(&self) -> &[Rr] {
        &self.rrs
    }

    /// Returns whether the rrset belongs to `zone`.
    pub fn is_of(&self, zone: &Zone) -> bool {
        self.zone_apex == *zone.apex()
    }
}

//------------ Rr ------------------------------------------------------------

/// A single resource record's TTL and rdata.
///
/// Owner, type and class are established by the containing domain and
/// rrset. For diff purposes two RRs are equal iff their TTL and their
/// canonical rdata octets are equal; a TTL change is a delete plus an add,
/// not a silent update.
#[derive(Clone, Debug)]
pub struct Rr {
    ttl: Ttl,
    rdata: Vec<RdataAtom>,
}

impl Rr {
    /// Creates a record from its TTL and rdata atoms.
    pub fn new(ttl: Ttl, rdata: Vec<RdataAtom>) -> Self {
        Rr { ttl, rdata }
    }

    /// Returns the TTL of the record.
    pub fn ttl(&self) -> Ttl {
        self.ttl
    }

    /// Returns the rdata atoms of the record.
    pub fn rdata(&self) -> &[RdataAtom] {
        &self.rdata
    }
}

//============ Error Types ==================================================

/// A domain name is not at or below the zone's apex.
#[derive(Clone, Copy, Debug)]
pub struct OutOfZone;

impl Display for OutOfZone {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "out of zone")
    }
}

impl std::error::Error for OutOfZone {}

//============ Tests ========================================================

#[cfg(test)]
mod tests {
    use core::str::FromStr;

    use bytes::Bytes;

    use super::*;

    fn name(s: &str) -> Name {
        Name::from_str(s).unwrap()
    }

    fn soa_rdata(serial: u32) -> Vec<RdataAtom> {
        let mut fields = vec![
            RdataAtom::Domain(name("ns1.example")),
            RdataAtom::Domain(name("host.example")),
        ];
        for value in [serial, 3600, 300, 86400, 300] {
            fields.push(RdataAtom::Raw(Bytes::copy_from_slice(
                &value.to_be_bytes(),
            )));
        }
        fields
    }

    fn a_rdata(addr: [u8; 4]) -> Vec<RdataAtom> {
        vec![RdataAtom::Raw(Bytes::copy_from_slice(&addr))]
    }

    #[test]
    fn walk_order_is_canonical() {
        let zone = Zone::new(name("example"), Class::IN);
        let mut db = Namedb::new();
        let ttl = Ttl::from_secs(3600);
        // Insert shuffled, with mixed case and depth.
        for owner in [
            "z.example",
            "example",
            "yljkjljk.a.example",
            "B.a.example",
            "a.example",
            "sub.b.a.example",
        ] {
            db.insert_rr(
                &zone,
                name(owner),
                Rtype::A,
                ttl,
                a_rdata([192, 0, 2, 1]),
            )
            .unwrap();
        }
        let walked: Vec<&Name> =
            db.walk_from(zone.apex()).map(|(name, _)| name).collect();
        let expected = [
            "example",
            "a.example",
            "B.a.example",
            "sub.b.a.example",
            "yljkjljk.a.example",
            "z.example",
        ];
        assert_eq!(walked.len(), expected.len());
        for (walked, expected) in walked.iter().zip(expected) {
            assert_eq!(**walked, name(expected));
        }
        // And the sequence is strictly increasing in canonical order.
        for pair in walked.windows(2) {
            assert!(pair[0].canonical_cmp(pair[1]).is_lt());
        }
    }

    #[test]
    fn zone_filter() {
        let parent = Zone::new(name("example"), Class::IN);
        let child = Zone::new(name("sub.example"), Class::IN);
        let mut db = Namedb::new();
        let ttl = Ttl::from_secs(3600);
        db.insert_rr(
            &parent,
            name("example"),
            Rtype::SOA,
            ttl,
            soa_rdata(1),
        )
        .unwrap();
        db.insert_rr(
            &child,
            name("sub.example"),
            Rtype::SOA,
            ttl,
            soa_rdata(7),
        )
        .unwrap();
        db.insert_rr(
            &child,
            name("sub.example"),
            Rtype::A,
            ttl,
            a_rdata([192, 0, 2, 2]),
        )
        .unwrap();

        let domain = db.find_domain(&name("sub.example")).unwrap();
        assert_eq!(domain.rrset_count_of(&parent), 0);
        assert_eq!(domain.rrset_count_of(&child), 2);
        assert!(domain.find_rrset(&parent, Rtype::A).is_none());
        assert!(domain.find_rrset(&child, Rtype::A).is_some());
    }

    #[test]
    fn serial_extraction() {
        let zone = Zone::new(name("example"), Class::IN);
        let mut db = Namedb::new();
        assert_eq!(db.serial_of(&zone), None);
        db.insert_rr(
            &zone,
            name("example"),
            Rtype::SOA,
            Ttl::from_secs(3600),
            soa_rdata(20240101),
        )
        .unwrap();
        assert_eq!(db.serial_of(&zone), Some(Serial(20240101)));
    }

    #[test]
    fn out_of_zone_insert() {
        let zone = Zone::new(name("example"), Class::IN);
        let mut db = Namedb::new();
        assert!(db
            .insert_rr(
                &zone,
                name("example.net"),
                Rtype::A,
                Ttl::ZERO,
                a_rdata([192, 0, 2, 3]),
            )
            .is_err());
    }
}
