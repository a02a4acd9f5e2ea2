//! A streaming cursor over the spool's domain sequence.

use crate::base::Name;
use crate::error::SpoolError;

use super::reader::SpoolReader;

//------------ SpoolDnameIter ------------------------------------------------

/// A one-step-lookahead cursor over the domain names in a spool file.
///
/// The cursor steps over the spool's domain name elements one by one. It
/// keeps track of whether the first name has been read yet, whether the
/// end of the stream has been reached, and whether the currently held name
/// has been processed by the caller.
///
/// [`advance`] establishes the invariant the merge relies on: afterwards,
/// either [`eof`] is true or [`dname`] holds a name the caller has not
/// acted on yet. The caller compares that name against the new zone's
/// current domain without consuming it; only once it has acted on the name
/// does it call [`mark_processed`], after which the next [`advance`] reads
/// the following name. A zero length name on the spool signals the end of
/// the stream; domain names themselves are never zero length.
///
/// [`advance`]: Self::advance
/// [`eof`]: Self::eof
/// [`dname`]: Self::dname
/// [`mark_processed`]: Self::mark_processed
#[derive(Debug, Default)]
pub struct SpoolDnameIter {
    /// The name most recently read, if any.
    dname: Option<Name>,

    /// Whether the first name has been read.
    read_first: bool,

    /// Whether the end-of-stream sentinel has been read.
    eof: bool,

    /// Whether the caller is done with the held name.
    is_processed: bool,
}

impl SpoolDnameIter {
    /// Creates a cursor positioned before the first name.
    pub fn new() -> Self {
        Default::default()
    }

    /// Moves to the next name that needs processing, if there is one.
    ///
    /// Reads from `spool`, which has to be positioned at a domain name
    /// boundary. If the held name is still unprocessed this is a no-op.
    pub fn advance(
        &mut self,
        spool: &mut SpoolReader,
    ) -> Result<(), SpoolError> {
        if self.eof {
            return Ok(());
        }
        if !self.read_first {
            self.read(spool)?;
            self.read_first = true;
            return Ok(());
        }
        if !self.is_processed {
            // The current name still needs processing.
            return Ok(());
        }
        self.read(spool)
    }

    fn read(&mut self, spool: &mut SpoolReader) -> Result<(), SpoolError> {
        match spool.get_dname()? {
            Some(name) => {
                self.dname = Some(name);
                self.is_processed = false;
            }
            None => {
                self.dname = None;
                self.eof = true;
            }
        }
        Ok(())
    }

    /// Returns whether the end of the stream has been reached.
    pub fn eof(&self) -> bool {
        self.eof
    }

    /// Returns the name the cursor holds.
    pub fn dname(&self) -> Option<&Name> {
        self.dname.as_ref()
    }

    /// Marks the held name as processed.
    pub fn mark_processed(&mut self) {
        self.is_processed = true;
    }
}

//============ Tests ========================================================

#[cfg(test)]
mod tests {
    use core::str::FromStr;
    use std::fs::File;
    use std::io::Write;

    use super::*;

    fn name(s: &str) -> Name {
        Name::from_str(s).unwrap()
    }

    fn dname_stream(names: &[&Name]) -> Vec<u8> {
        let mut content = Vec::new();
        for name in names {
            content
                .extend_from_slice(&(name.len() as u16).to_ne_bytes());
            content.extend_from_slice(name.as_slice());
        }
        content.extend_from_slice(&0u16.to_ne_bytes());
        content
    }

    #[test]
    fn lookahead_and_consume() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spool");
        let first = name("example");
        let second = name("a.example");
        let mut file = File::create(&path).unwrap();
        file.write_all(&dname_stream(&[&first, &second])).unwrap();
        drop(file);

        let mut spool = SpoolReader::open(&path).unwrap();
        let mut iter = SpoolDnameIter::new();

        // Before the first advance nothing is held.
        assert!(iter.dname().is_none());
        assert!(!iter.eof());

        iter.advance(&mut spool).unwrap();
        assert_eq!(iter.dname(), Some(&first));

        // Advancing without marking holds the same name.
        iter.advance(&mut spool).unwrap();
        assert_eq!(iter.dname(), Some(&first));

        iter.mark_processed();
        iter.advance(&mut spool).unwrap();
        assert_eq!(iter.dname(), Some(&second));

        iter.mark_processed();
        iter.advance(&mut spool).unwrap();
        assert!(iter.eof());
        assert!(iter.dname().is_none());

        // Advancing past the end stays at the end.
        iter.advance(&mut spool).unwrap();
        assert!(iter.eof());
    }

    #[test]
    fn empty_stream() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spool");
        let mut file = File::create(&path).unwrap();
        file.write_all(&dname_stream(&[])).unwrap();
        drop(file);

        let mut spool = SpoolReader::open(&path).unwrap();
        let mut iter = SpoolDnameIter::new();
        iter.advance(&mut spool).unwrap();
        assert!(iter.eof());
    }
}
