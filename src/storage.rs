//! Loading and saving the data files.
//!
//! Each file is read or written whole. A missing file is reported as
//! [`Loaded::Missing`] rather than an error so the caller can fall back to an
//! empty collection or the default tariff and tell the user.

use crate::codec;
use crate::customer::Customer;
use crate::error::Result;
use crate::tariff::Tariff;
use log::{debug, info, warn};
use std::fs;
use std::io::ErrorKind;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Outcome of reading a data file.
#[derive(Debug, Clone, PartialEq)]
pub enum Loaded<T> {
    /// The file existed and decoded cleanly.
    Found(T),

    /// No file at the path.
    Missing,
}

impl<T> Loaded<T> {
    /// Returns the loaded value, or `fallback` when the file was missing.
    pub fn unwrap_or(self, fallback: T) -> T {
        match self {
            Loaded::Found(value) => value,
            Loaded::Missing => fallback,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Loaded::Missing)
    }
}

fn read_if_present(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Moves an undecodable data file to `<name>.bad` and returns the new path.
///
/// A later save then writes a fresh file instead of replacing the only copy
/// of the unreadable records. An existing `.bad` file is replaced.
pub fn quarantine(path: &Path) -> Result<PathBuf> {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(".bad");
    let target = path.with_file_name(name);

    fs::rename(path, &target)?;
    warn!("Moved unreadable {} to {}", path.display(), target.display());
    Ok(target)
}

/// Reads the customer collection.
pub fn load_customers(path: &Path) -> Result<Loaded<Vec<Customer>>> {
    let Some(bytes) = read_if_present(path)? else {
        debug!("No customer file at {}", path.display());
        return Ok(Loaded::Missing);
    };

    let customers = codec::decode_customers(&bytes)?;
    info!(
        "Loaded {} customer records from {}",
        customers.len(),
        path.display()
    );
    Ok(Loaded::Found(customers))
}

/// Writes the customer collection, replacing the file.
pub fn save_customers(path: &Path, customers: &[Customer]) -> Result<()> {
    fs::write(path, codec::encode_customers(customers))?;
    info!(
        "Saved {} customer records to {}",
        customers.len(),
        path.display()
    );
    Ok(())
}

/// Reads the tariff record.
pub fn load_tariff(path: &Path) -> Result<Loaded<Tariff>> {
    let Some(bytes) = read_if_present(path)? else {
        debug!("No tariff file at {}", path.display());
        return Ok(Loaded::Missing);
    };

    let tariff = codec::decode_tariff(&bytes)?;
    info!("Loaded tariff from {}", path.display());
    Ok(Loaded::Found(tariff))
}

/// Writes the tariff record, replacing the file.
pub fn save_tariff(path: &Path, tariff: &Tariff) -> Result<()> {
    fs::write(path, codec::encode_tariff(tariff))?;
    info!("Saved tariff to {}", path.display());
    Ok(())
}
