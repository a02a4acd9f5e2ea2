//! Creating the differences for an incremental zone transfer.
//!
//! An [`IxfrCreate`] session spans a zone reload. [`start`] is called
//! while the zone still holds its old content and spools a snapshot of it
//! to disk; after the reload, [`perform`] streams the snapshot back and
//! merges it with the now-current zone content, producing the delete and
//! add lists an IXFR response is built from.
//!
//! The session exclusively owns its spool file. The path embeds the
//! process id, so concurrent servers working off the same zone file do
//! not collide, and the file is removed when the session is dropped.
//!
//! [`start`]: IxfrCreate::start
//! [`perform`]: IxfrCreate::perform

use std::io;
use std::path::{Path, PathBuf};
use std::{fs, process};

use tracing::{error, trace};

use crate::base::{Name, Serial};
use crate::diff::ZoneDiffer;
use crate::error::IxfrCreateError;
use crate::spool::reader::SpoolReader;
use crate::spool::spool_zone;
use crate::store::{IxfrData, IxfrStore};
use crate::zonedb::{Namedb, Zone};

//------------ IxfrCreate ----------------------------------------------------

/// An IXFR diff session.
///
/// Created by [`start`], driven by [`perform`]; dropping the session
/// removes the spool file. The zone database has to be quiesced while
/// either method runs; diffing against a mutating zone is not supported.
///
/// [`start`]: Self::start
/// [`perform`]: Self::perform
#[derive(Debug)]
pub struct IxfrCreate {
    /// The apex name recorded at snapshot time.
    zone_name: Name,

    /// The zone serial recorded at snapshot time.
    old_serial: Serial,

    /// The zone serial read back at perform time.
    new_serial: Option<Serial>,

    /// The spool file this session owns.
    file_name: PathBuf,
}

impl IxfrCreate {
    /// Snapshots `zone` into a spool file placed next to `zfile`.
    ///
    /// Records the apex name and current serial and writes the complete
    /// zone content to `<zfile>.spoolzone.<pid>`. On failure the partial
    /// spool file is removed and the error returned.
    pub fn start(
        db: &Namedb,
        zone: &Zone,
        zfile: &Path,
    ) -> Result<Self, IxfrCreateError> {
        let file_name = spool_file_name(zfile);
        let old_serial = db.serial_of(zone).unwrap_or(Serial(0));
        let this = IxfrCreate {
            zone_name: zone.apex().clone(),
            old_serial,
            new_serial: None,
            file_name,
        };
        if let Err(err) = spool_zone(db, zone, &this.file_name, old_serial)
        {
            error!(
                "could not write spool {}: {}",
                this.file_name.display(),
                err
            );
            return Err(err.into());
        }
        trace!(
            "spooled zone {} serial {} to {}",
            this.zone_name,
            old_serial,
            this.file_name.display()
        );
        Ok(this)
    }

    /// Returns the apex name recorded at snapshot time.
    pub fn zone_name(&self) -> &Name {
        &self.zone_name
    }

    /// Returns the zone serial recorded at snapshot time.
    pub fn old_serial(&self) -> Serial {
        self.old_serial
    }

    /// Returns the zone serial read at perform time, if any.
    pub fn new_serial(&self) -> Option<Serial> {
        self.new_serial
    }

    /// Returns the path of the session's spool file.
    pub fn file_name(&self) -> &Path {
        &self.file_name
    }

    /// Computes the differences from the snapshot to the current zone.
    ///
    /// Opens the spool, validates its header against the recorded apex
    /// and serial, and merges it with the zone's current content. Returns
    /// the collected differences bound to the old and new serial. If
    /// nothing changed, the returned diff is empty; that is not an error.
    pub fn perform(
        &mut self,
        db: &Namedb,
        zone: &Zone,
    ) -> Result<IxfrData, IxfrCreateError> {
        let new_serial = db.serial_of(zone).unwrap_or(Serial(0));
        let mut store = IxfrData::new(self.old_serial, new_serial);
        self.perform_with_store(db, zone, &mut store)?;
        self.new_serial = Some(new_serial);
        trace!(
            "zone {} differences from serial {} to {}: {} deleted, {} added",
            self.zone_name,
            self.old_serial,
            new_serial,
            store.removed().len(),
            store.added().len()
        );
        Ok(store)
    }

    /// Computes the differences into a caller-provided store.
    ///
    /// Like [`perform`] but leaves store construction to the caller. The
    /// header is validated before any operation is emitted, so on error
    /// the store has received nothing.
    ///
    /// [`perform`]: Self::perform
    pub fn perform_with_store<S: IxfrStore>(
        &self,
        db: &Namedb,
        zone: &Zone,
        store: &mut S,
    ) -> Result<(), IxfrCreateError> {
        let mut spool = match SpoolReader::open(&self.file_name) {
            Ok(spool) => spool,
            Err(err) => {
                error!(
                    "could not open {} for reading: {}",
                    self.file_name.display(),
                    err
                );
                return Err(err.into());
            }
        };
        spool.check_header(&self.zone_name, self.old_serial)?;
        if let Err(err) = ZoneDiffer::new(db, zone, &mut spool, store).walk_zone()
        {
            error!(
                "could not create ixfr for zone {} from {}: {}",
                self.zone_name,
                self.file_name.display(),
                err
            );
            return Err(err);
        }
        Ok(())
    }
}

//--- Drop

impl Drop for IxfrCreate {
    fn drop(&mut self) {
        if let Err(err) = fs::remove_file(&self.file_name) {
            if err.kind() != io::ErrorKind::NotFound {
                error!(
                    "could not remove spool {}: {}",
                    self.file_name.display(),
                    err
                );
            }
        }
    }
}

//------------ Free Functions ------------------------------------------------

/// Builds the session's spool path: `<zfile>.spoolzone.<pid>`.
fn spool_file_name(zfile: &Path) -> PathBuf {
    let mut name = zfile.as_os_str().to_os_string();
    name.push(format!(".spoolzone.{}", process::id()));
    PathBuf::from(name)
}

//============ Tests ========================================================
