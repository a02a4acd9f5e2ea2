//! Time-to-live values.

//------------ Ttl -----------------------------------------------------------

/// A time-to-live in whole seconds.
#[derive(
    Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd,
)]
pub struct Ttl(u32);

impl Ttl {
    /// A time-to-live of zero seconds.
    pub const ZERO: Ttl = Ttl(0);

    /// Creates a time-to-live from a number of seconds.
    #[must_use]
    pub const fn from_secs(secs: u32) -> Self {
        Ttl(secs)
    }

    /// Returns the time-to-live in seconds.
    #[must_use]
    pub const fn as_secs(self) -> u32 {
        self.0
    }
}
