//! Named validators available to callers.

use std::path::Path;

use buf_validate::Validator;

use crate::embedded::{EMBEDDED_CATALOGS, RESERVED_NAMES};
use crate::error::{CatalogError, Result};
use crate::loader::{load_catalog, parse_catalog};
use crate::schema::CatalogFile;

#[derive(Debug, Clone)]
struct Entry {
    name: String,
    description: Option<String>,
    validator: Option<Validator>,
}

/// Validators by registry name, in registration order.
///
/// A name may be reserved without a validator; looking it up reports it as
/// not available yet.
#[derive(Debug, Clone, Default)]
pub struct ValidatorRegistry {
    entries: Vec<Entry>,
}

impl ValidatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the embedded catalogs and the reserved names.
    pub fn with_defaults() -> Result<Self> {
        let mut registry = Self::new();
        for (origin, contents) in EMBEDDED_CATALOGS {
            registry.register(parse_catalog(contents, origin)?)?;
        }
        for name in RESERVED_NAMES {
            registry.reserve(*name);
        }
        Ok(registry)
    }

    /// Bind and add a catalog. A catalog with an existing name replaces it.
    pub fn register(&mut self, catalog: CatalogFile) -> Result<()> {
        let validator = catalog.bind()?;
        let entry = Entry {
            name: catalog.name.clone(),
            description: catalog.description.clone(),
            validator: Some(validator),
        };
        match self.position(&catalog.name) {
            Some(idx) => {
                tracing::info!(name = %catalog.name, "replacing registered validator");
                self.entries[idx] = entry;
            }
            None => {
                tracing::debug!(name = %catalog.name, "registered validator");
                self.entries.push(entry);
            }
        }
        Ok(())
    }

    /// Load, bind and add a catalog file. Returns the registered name.
    pub fn register_file(&mut self, path: &Path) -> Result<String> {
        let catalog = load_catalog(path)?;
        let name = catalog.name.clone();
        self.register(catalog)?;
        Ok(name)
    }

    /// Reserve a name without a validator. Existing entries are kept.
    pub fn reserve(&mut self, name: impl Into<String>) {
        let name = name.into();
        if self.position(&name).is_none() {
            self.entries.push(Entry {
                name,
                description: None,
                validator: None,
            });
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.name == name)
    }

    /// Look up a validator by registry name.
    pub fn get(&self, name: &str) -> Result<&Validator> {
        let Some(entry) = self.entries.iter().find(|entry| entry.name == name) else {
            return Err(CatalogError::UnknownValidator {
                name: name.to_string(),
                available: self.available().collect::<Vec<_>>().join(", "),
            });
        };
        entry
            .validator
            .as_ref()
            .ok_or_else(|| CatalogError::Unavailable {
                name: name.to_string(),
            })
    }

    /// The first registered name with a validator.
    pub fn default_name(&self) -> Option<&str> {
        self.available().next()
    }

    /// Every registered name, reserved ones included.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    /// Names that have a validator.
    pub fn available(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|entry| entry.validator.is_some())
            .map(|entry| entry.name.as_str())
    }

    /// `(name, description, validator)` for every entry.
    pub fn entries(&self) -> impl Iterator<Item = (&str, Option<&str>, Option<&Validator>)> {
        self.entries.iter().map(|entry| {
            (
                entry.name.as_str(),
                entry.description.as_deref(),
                entry.validator.as_ref(),
            )
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
