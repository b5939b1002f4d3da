//! Local storage of activities, keyed by identifier.

use super::{fit, Activity};
use crate::error::StoreError;
use log::debug;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// A collection of activities that can be listed and loaded by identifier.
pub trait ActivityStore {
    /// Lists the identifiers of all available activities.
    fn list(&self) -> Result<Vec<String>, StoreError>;

    /// Loads the activity with the given identifier.
    fn load(&self, id: &str) -> Result<Activity, StoreError>;
}

/// Store reading `.FIT` files from a base directory.
///
/// Activity identifiers are the bare file names. Anything that looks like a
/// path is rejected, to keep requests inside the base directory.
pub struct FitStore {
    basedir: PathBuf,
}

impl FitStore {
    /// Creates a store over the given base directory.
    pub fn new<P: AsRef<Path>>(basedir: P) -> Self {
        Self {
            basedir: basedir.as_ref().to_owned(),
        }
    }

    /// Checks that an identifier is a plain file name.
    fn check_id(id: &str) -> Result<(), StoreError> {
        if id.is_empty() || id == "." || id == ".." || id.contains('/') || id.contains('\\') {
            return Err(StoreError::InvalidId(id.to_owned()));
        }
        Ok(())
    }
}

impl ActivityStore for FitStore {
    fn list(&self) -> Result<Vec<String>, StoreError> {
        let mut ids = Vec::new();
        for entry in std::fs::read_dir(&self.basedir)? {
            let entry = entry?;
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(_) => continue,
            };
            if name.to_ascii_lowercase().ends_with(".fit") && entry.file_type()?.is_file() {
                ids.push(name);
            }
        }
        ids.sort();
        Ok(ids)
    }

    fn load(&self, id: &str) -> Result<Activity, StoreError> {
        Self::check_id(id)?;
        let path = self.basedir.join(id);
        debug!("Loading activity from {}", path.display());
        let file = File::open(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StoreError::NotFound(id.to_owned()),
            _ => StoreError::Io(e),
        })?;
        let mut reader = BufReader::new(file);
        fit::decode(&mut reader)
    }
}

/// Store keeping activities in memory.
///
/// Mainly useful in tests, where a directory of FIT files would be overkill.
#[derive(Default)]
pub struct MemoryStore {
    activities: Vec<(String, Activity)>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an activity under the given identifier.
    pub fn insert(&mut self, id: &str, activity: Activity) {
        self.activities.push((id.to_owned(), activity));
    }
}

impl ActivityStore for MemoryStore {
    fn list(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.activities.iter().map(|(id, _)| id.clone()).collect())
    }

    fn load(&self, id: &str) -> Result<Activity, StoreError> {
        self.activities
            .iter()
            .find(|(known, _)| known == id)
            .map(|(_, activity)| activity.clone())
            .ok_or_else(|| StoreError::NotFound(id.to_owned()))
    }
}
