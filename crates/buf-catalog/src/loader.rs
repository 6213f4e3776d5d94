//! Reading catalogs and binding them into validators.

use std::path::Path;

use buf_validate::Validator;

use crate::error::{CatalogError, Result};
use crate::schema::CatalogFile;

/// Parse catalog TOML. `origin` names the source in error messages.
pub fn parse_catalog(contents: &str, origin: &str) -> Result<CatalogFile> {
    toml::from_str(contents).map_err(|source| CatalogError::Toml {
        origin: origin.to_string(),
        source,
    })
}

/// Read and parse a catalog file.
pub fn load_catalog(path: &Path) -> Result<CatalogFile> {
    let contents = std::fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;
    let catalog = parse_catalog(&contents, &path.display().to_string())?;
    tracing::debug!(
        path = %path.display(),
        name = %catalog.name,
        checks = catalog.checks.len(),
        "loaded catalog"
    );
    Ok(catalog)
}

impl CatalogFile {
    /// Build every check and bind them to this catalog's data.
    pub fn bind(&self) -> Result<Validator> {
        for spec in &self.checks {
            if let Some(message) = spec.rule.problem() {
                return Err(CatalogError::InvalidRule {
                    catalog: self.name.clone(),
                    code: spec.code.clone(),
                    message,
                });
            }
        }
        let checks = self.checks.iter().map(|spec| spec.to_check()).collect();
        Validator::bind(self.kind.as_str(), self.data.clone(), checks).map_err(|source| {
            CatalogError::Bind {
                catalog: self.name.clone(),
                source,
            }
        })
    }
}
