//! The live contact document and its backing file.

use crate::codec;
use crate::models::{Contact, UserData, UserSettings};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// Holds the currently loaded document and knows where it lives on disk.
pub struct ContactStore {
    path: PathBuf,
    data: UserData,
}

impl ContactStore {
    /// Create a store for the document at `path`.
    ///
    /// Nothing is read until [`ContactStore::refresh`] is called.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            data: UserData::seed(),
        }
    }

    /// Create a store for the per-user document location.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(default_data_path()?))
    }

    /// Reload the document from disk, seeding it first if it doesn't exist.
    pub fn refresh(&mut self) -> Result<()> {
        self.ensure_file()?;
        self.data = Self::load(&self.path)?;
        tracing::info!(
            "Loaded {} contacts from {}",
            self.data.contacts.len(),
            self.path.display()
        );
        Ok(())
    }

    fn ensure_file(&self) -> Result<()> {
        if self.path.is_file() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory: {}", parent.display()))?;
        }
        Self::write_data(&UserData::seed(), &self.path)?;
        tracing::info!("Created seed document: {}", self.path.display());
        Ok(())
    }

    /// Save the current document to its well-known location.
    pub fn write(&self) -> Result<()> {
        self.write_to(&self.path)
    }

    /// Save the current document to an explicit location.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        Self::write_data(&self.data, path)
    }

    /// Save any document to `path`.
    ///
    /// The document is written to a temporary file next to `path` and then
    /// renamed over it, so an interrupted write leaves the old file intact.
    pub fn write_data(data: &UserData, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
        codec::write_document(data, BufWriter::new(tmp.as_file_mut()))
            .with_context(|| format!("Failed to serialize document for {}", path.display()))?;
        tmp.persist(path)
            .with_context(|| format!("Failed to write document: {}", path.display()))?;

        tracing::debug!("Wrote {} contacts to {}", data.contacts.len(), path.display());
        Ok(())
    }

    /// Read a document without adopting it, e.g. for import.
    pub fn load(path: impl AsRef<Path>) -> Result<UserData> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open document: {}", path.display()))?;
        codec::read_document(BufReader::new(file))
            .with_context(|| format!("Failed to read document: {}", path.display()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn data(&self) -> &UserData {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut UserData {
        &mut self.data
    }

    /// Distinct group labels of the loaded contacts.
    pub fn groups(&self) -> Vec<String> {
        self.data.groups()
    }

    pub fn add_contact(&mut self, contact: Contact) {
        self.data.contacts.push(contact.normalized());
    }

    /// Replace the contact at `index`.
    pub fn replace_contact(&mut self, index: usize, contact: Contact) -> Result<()> {
        let slot = self
            .data
            .contacts
            .get_mut(index)
            .with_context(|| format!("No contact at index {}", index))?;
        *slot = contact.normalized();
        Ok(())
    }

    /// Remove and return the contact at `index`.
    pub fn remove_contact(&mut self, index: usize) -> Result<Contact> {
        if index >= self.data.contacts.len() {
            anyhow::bail!("No contact at index {}", index);
        }
        Ok(self.data.contacts.remove(index))
    }

    pub fn set_settings(&mut self, settings: UserSettings) {
        self.data.settings = settings;
    }

    pub fn accept_license(&mut self) {
        self.data.license_agreed = true;
    }

    /// Append the selected contacts of an imported document.
    ///
    /// Indices outside `imported.contacts` are skipped.
    pub fn import(&mut self, imported: UserData, selection: &[usize], replace_settings: bool) {
        let mut count = 0;
        for &idx in selection {
            if let Some(contact) = imported.contacts.get(idx) {
                self.add_contact(contact.clone());
                count += 1;
            } else {
                tracing::warn!("Import selection {} out of range", idx);
            }
        }
        if replace_settings {
            self.data.settings = imported.settings;
        }
        tracing::info!("Imported {} contacts", count);
    }
}

/// Per-user location of the document.
pub fn default_data_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir().context("Could not determine data directory")?;
    Ok(data_dir.join("Janorico").join("JContacts.xml"))
}
