//! Customer registry persistence.
//!
//! A plain text file, one customer per line, kept sorted on disk and in
//! memory. The fallback resolver scans names in order, so sorted order
//! keeps its hits deterministic.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use crate::error::RegistryError;

pub struct CustomerRegistry {
    path: PathBuf,
    names: Vec<String>,
}

impl CustomerRegistry {
    /// Load the registry from `path`. A missing file is an empty registry,
    /// not an error. Blank lines and surrounding whitespace are dropped.
    pub fn load(path: PathBuf) -> Result<Self, RegistryError> {
        let names = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| RegistryError::Read {
                path: path.clone(),
                source: e,
            })?;
            let mut names: Vec<String> = content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(String::from)
                .collect();
            names.sort();
            names
        } else {
            Vec::new()
        };

        tracing::debug!(
            "[registry] loaded {} customers from {}",
            names.len(),
            path.display()
        );

        Ok(Self { path, names })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Add a customer and persist. Returns `false` without touching the
    /// file when the trimmed name is empty or already present.
    pub fn add(&mut self, name: &str) -> Result<bool, RegistryError> {
        let name = name.trim();
        if name.is_empty() || self.names.iter().any(|n| n == name) {
            return Ok(false);
        }

        self.names.push(name.to_string());
        self.names.sort();
        self.save()?;

        tracing::info!("[registry] added customer {:?}", name);
        Ok(true)
    }

    /// Remove a customer and persist. Returns `false` when absent.
    pub fn remove(&mut self, name: &str) -> Result<bool, RegistryError> {
        let before = self.names.len();
        self.names.retain(|n| n != name);
        if self.names.len() == before {
            return Ok(false);
        }

        self.save()?;

        tracing::info!("[registry] removed customer {:?}", name);
        Ok(true)
    }

    /// Atomically write the sorted list: temp file, flush, sync, rename.
    fn save(&self) -> Result<(), RegistryError> {
        let write_err = |e: std::io::Error| RegistryError::Write {
            path: self.path.clone(),
            source: e,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let temp_path = self.path.with_extension("tmp");
        let file = File::create(&temp_path).map_err(write_err)?;
        let mut writer = BufWriter::new(file);

        for name in &self.names {
            writeln!(writer, "{}", name).map_err(write_err)?;
        }

        writer.flush().map_err(write_err)?;
        writer.get_ref().sync_all().map_err(write_err)?;

        fs::rename(&temp_path, &self.path).map_err(write_err)?;

        Ok(())
    }
}
