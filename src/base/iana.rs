//! IANA identifier types.
//!
//! Record types and classes are 16 bit values on the wire and in the
//! spool. The newtypes here carry them around with the handful of
//! well-known constants the crate and its tests refer to by name.

use core::fmt;

//------------ Rtype ---------------------------------------------------------

/// A resource record type.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Rtype(u16);

impl Rtype {
    /// A host address.
    pub const A: Rtype = Rtype(1);

    /// An authoritative name server.
    pub const NS: Rtype = Rtype(2);

    /// The canonical name for an alias.
    pub const CNAME: Rtype = Rtype(5);

    /// Marks the start of a zone of authority.
    pub const SOA: Rtype = Rtype(6);

    /// A domain name pointer.
    pub const PTR: Rtype = Rtype(12);

    /// Mail exchange.
    pub const MX: Rtype = Rtype(15);

    /// Text strings.
    pub const TXT: Rtype = Rtype(16);

    /// IPv6 address.
    pub const AAAA: Rtype = Rtype(28);

    /// Location of services.
    pub const SRV: Rtype = Rtype(33);

    /// Delegation name.
    pub const DNAME: Rtype = Rtype(39);

    /// Creates a record type from its integer value.
    pub const fn from_int(value: u16) -> Self {
        Rtype(value)
    }

    /// Returns the integer value of the record type.
    pub const fn to_int(self) -> u16 {
        self.0
    }
}

impl From<u16> for Rtype {
    fn from(value: u16) -> Self {
        Rtype(value)
    }
}

impl From<Rtype> for u16 {
    fn from(value: Rtype) -> Self {
        value.0
    }
}

impl fmt::Display for Rtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Rtype::A => f.write_str("A"),
            Rtype::NS => f.write_str("NS"),
            Rtype::CNAME => f.write_str("CNAME"),
            Rtype::SOA => f.write_str("SOA"),
            Rtype::PTR => f.write_str("PTR"),
            Rtype::MX => f.write_str("MX"),
            Rtype::TXT => f.write_str("TXT"),
            Rtype::AAAA => f.write_str("AAAA"),
            Rtype::SRV => f.write_str("SRV"),
            Rtype::DNAME => f.write_str("DNAME"),
            Rtype(value) => write!(f, "TYPE{value}"),
        }
    }
}

//------------ Class ---------------------------------------------------------

/// A DNS class.
///
/// In practice only the IN class matters; the value is nonetheless carried
/// through the spool and the diff verbatim.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Class(u16);

impl Class {
    /// Internet (IN).
    pub const IN: Class = Class(1);

    /// Chaosnet (CH).
    pub const CH: Class = Class(3);

    /// Hesiod (HS).
    pub const HS: Class = Class(4);

    /// Creates a class from its integer value.
    pub const fn from_int(value: u16) -> Self {
        Class(value)
    }

    /// Returns the integer value of the class.
    pub const fn to_int(self) -> u16 {
        self.0
    }
}

impl From<u16> for Class {
    fn from(value: u16) -> Self {
        Class(value)
    }
}

impl From<Class> for u16 {
    fn from(value: Class) -> Self {
        value.0
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Class::IN => f.write_str("IN"),
            Class::CH => f.write_str("CH"),
            Class::HS => f.write_str("HS"),
            Class(value) => write!(f, "CLASS{value}"),
        }
    }
}

//============ Tests ========================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(Rtype::SOA.to_string(), "SOA");
        assert_eq!(Rtype::from_int(4711).to_string(), "TYPE4711");
        assert_eq!(Class::IN.to_string(), "IN");
        assert_eq!(Class::from_int(250).to_string(), "CLASS250");
    }

    #[test]
    fn int_roundtrip() {
        assert_eq!(Rtype::from_int(Rtype::MX.to_int()), Rtype::MX);
        assert_eq!(u16::from(Class::IN), 1);
    }
}
