//! Serial numbers.
//!
//! Zone serials are 32 bit values that conceptually live in a larger,
//! wrapping number space. [RFC 1982] defines the arithmetic; [`Serial`]
//! implements the parts the crate needs atop a native `u32`.
//!
//! [RFC 1982]: https://tools.ietf.org/html/rfc1982

use core::cmp::Ordering;
use core::fmt;

//------------ Serial --------------------------------------------------------

/// A zone serial number.
///
/// Because serial numbers wrap, they only implement a partial ordering:
/// two values exactly half the number space apart compare as neither
/// smaller nor greater. Addition is provided as a dedicated method rather
/// than the `Add` trait since only amounts up to `2^31 - 1` are allowed.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Serial(pub u32);

impl Serial {
    /// Creates a serial number from its big-endian wire octets.
    #[must_use]
    pub fn from_be_bytes(bytes: [u8; 4]) -> Self {
        Self(u32::from_be_bytes(bytes))
    }

    /// Returns the serial number as a raw integer.
    #[must_use]
    pub fn into_int(self) -> u32 {
        self.0
    }

    /// Adds `other` to `self`, wrapping around the number space.
    ///
    /// # Panics
    ///
    /// This method panics if `other` is greater than `2^31 - 1`.
    #[allow(clippy::should_implement_trait)]
    #[must_use]
    pub fn add(self, other: u32) -> Self {
        assert!(other <= 0x7FFF_FFFF);
        Serial(self.0.wrapping_add(other))
    }
}

//--- From

impl From<u32> for Serial {
    fn from(value: u32) -> Serial {
        Serial(value)
    }
}

impl From<Serial> for u32 {
    fn from(serial: Serial) -> u32 {
        serial.0
    }
}

//--- PartialOrd

impl PartialOrd for Serial {
    fn partial_cmp(&self, other: &Serial) -> Option<Ordering> {
        match self.0.cmp(&other.0) {
            Ordering::Equal => Some(Ordering::Equal),
            Ordering::Less => {
                let diff = other.0 - self.0;
                match diff.cmp(&0x8000_0000) {
                    Ordering::Less => Some(Ordering::Less),
                    Ordering::Greater => Some(Ordering::Greater),
                    Ordering::Equal => None,
                }
            }
            Ordering::Greater => {
                let diff = self.0 - other.0;
                match diff.cmp(&0x8000_0000) {
                    Ordering::Less => Some(Ordering::Greater),
                    Ordering::Greater => Some(Ordering::Less),
                    Ordering::Equal => None,
                }
            }
        }
    }
}

//--- Display

impl fmt::Display for Serial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

//============ Tests ========================================================
