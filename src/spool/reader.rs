//! Reading a spool file back.
//!
//! All reads are blocking and a short read anywhere is fatal: the spool
//! was written in one piece by this very process, so anything missing
//! means the file is damaged and the whole diff is abandoned.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tracing::error;

use crate::base::name::MAX_NAME_LEN;
use crate::base::{Name, Serial};
use crate::error::{
    IxfrCreateError, MalformedSpoolError, SpoolError, StaleSnapshotError,
};

//------------ SpoolReader ---------------------------------------------------

/// Reads the primitive items of a spool file in sequence.
#[derive(Debug)]
pub struct SpoolReader {
    file: BufReader<File>,
    path: PathBuf,
}

impl SpoolReader {
    /// Opens the spool at `path` for reading.
    pub fn open(path: &Path) -> Result<Self, SpoolError> {
        let file = File::open(path)?;
        Ok(SpoolReader {
            file: BufReader::new(file),
            path: path.into(),
        })
    }

    /// Returns the path of the spool file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads a 16 bit value in host byte order.
    pub fn get_u16(&mut self) -> Result<u16, SpoolError> {
        let mut buf = [0; 2];
        self.file.read_exact(&mut buf)?;
        Ok(u16::from_ne_bytes(buf))
    }

    /// Reads a 32 bit value in host byte order.
    pub fn get_u32(&mut self) -> Result<u32, SpoolError> {
        let mut buf = [0; 4];
        self.file.read_exact(&mut buf)?;
        Ok(u32::from_ne_bytes(buf))
    }

    /// Reads a length-prefixed domain name.
    ///
    /// Returns `None` for a zero length, the end-of-stream sentinel.
    pub fn get_dname(&mut self) -> Result<Option<Name>, SpoolError> {
        let len = self.get_u16()?;
        if len == 0 {
            return Ok(None);
        }
        if usize::from(len) > MAX_NAME_LEN {
            return Err(MalformedSpoolError::LongName(len).into());
        }
        let mut buf = vec![0u8; usize::from(len)];
        self.file.read_exact(&mut buf)?;
        Name::from_wire(Bytes::from(buf))
            .map(Some)
            .map_err(|err| MalformedSpoolError::BadName(err).into())
    }

    /// Reads `rdlen` octets of rdata into `buf`, replacing its contents.
    ///
    /// The buffer is handed in by the caller so one allocation can be
    /// reused across all the RRs of a diff run.
    pub fn get_rdata_into(
        &mut self,
        rdlen: u16,
        buf: &mut Vec<u8>,
    ) -> Result<(), SpoolError> {
        buf.clear();
        buf.resize(usize::from(rdlen), 0);
        self.file.read_exact(buf)?;
        Ok(())
    }

    /// Reads the spool header and checks it against the recorded snapshot.
    ///
    /// The apex is compared on exact octets: the header was written from
    /// the very name the session recorded, so even a case difference means
    /// the file is not the session's snapshot.
    pub fn check_header(
        &mut self,
        zone_name: &Name,
        old_serial: Serial,
    ) -> Result<(), IxfrCreateError> {
        let apex = match self.get_dname()? {
            Some(apex) => apex,
            None => {
                error!(
                    "spool {} does not contain the correct zone apex",
                    self.path.display()
                );
                return Err(StaleSnapshotError::ApexMismatch.into());
            }
        };
        if apex.as_slice() != zone_name.as_slice() {
            error!(
                "spool {} does not contain the correct zone apex",
                self.path.display()
            );
            return Err(StaleSnapshotError::ApexMismatch.into());
        }
        let serial = Serial::from(self.get_u32()?);
        if serial != old_serial {
            error!(
                "spool {} does not contain the correct zone serial",
                self.path.display()
            );
            return Err(StaleSnapshotError::SerialMismatch {
                expected: old_serial,
                found: serial,
            }
            .into());
        }
        Ok(())
    }
}

//============ Tests ========================================================
