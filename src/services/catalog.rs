use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use validator::Validate;

use crate::models::Property;

const BUILTIN_CATALOG: &str = include_str!("../../data/properties.json");

/// Errors that can occur while loading the candidate pool
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid property {id}: {source}")]
    Invalid {
        id: String,
        #[source]
        source: validator::ValidationErrors,
    },

    #[error("Duplicate property id: {0}")]
    DuplicateId(String),
}

/// Read-only pool of listings the assistant can recommend
#[derive(Debug, Clone)]
pub struct PropertyCatalog {
    properties: Arc<[Property]>,
}

impl PropertyCatalog {
    /// Build a catalog, validating every listing
    pub fn new(properties: Vec<Property>) -> Result<Self, CatalogError> {
        {
            let mut seen = HashSet::with_capacity(properties.len());
            for property in &properties {
                property.validate().map_err(|source| CatalogError::Invalid {
                    id: property.id.clone(),
                    source,
                })?;

                if !seen.insert(property.id.as_str()) {
                    return Err(CatalogError::DuplicateId(property.id.clone()));
                }
            }
        }

        Ok(Self {
            properties: properties.into(),
        })
    }

    /// Parse a JSON array of listings
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let properties: Vec<Property> = serde_json::from_str(json)?;
        Self::new(properties)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&json)?;

        tracing::info!("Loaded {} properties from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Listings shipped with the app
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Load from `path` when given, otherwise the built-in listings
    pub fn load_or_builtin(path: Option<&str>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => Self::load(path),
            None => Self::builtin(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Property> {
        self.properties.iter().find(|property| property.id == id)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Shared handle to the pool for conversations
    pub fn shared(&self) -> Arc<[Property]> {
        Arc::clone(&self.properties)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = PropertyCatalog::builtin().unwrap();

        assert_eq!(catalog.len(), 3);
        let studio = catalog.get("2").unwrap();
        assert_eq!(studio.title, "Cozy Studio Downtown");
        assert_eq!(studio.distance_miles, 2.1);
        assert!(catalog.get("1").unwrap().has_roommates());
        assert!(catalog.get("missing").is_none());
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let json = r#"[
            {"id": "a", "title": "One", "price": 500, "distance": 1.0, "rating": 4.0},
            {"id": "a", "title": "Two", "price": 600, "distance": 2.0, "rating": 4.2}
        ]"#;

        let result = PropertyCatalog::from_json(json);
        assert!(matches!(result, Err(CatalogError::DuplicateId(id)) if id == "a"));
    }

    #[test]
    fn test_rejects_invalid_listing() {
        let json = r#"[{"id": "b", "title": "", "price": 500, "distance": 1.0, "rating": 4.0}]"#;

        let result = PropertyCatalog::from_json(json);
        assert!(matches!(result, Err(CatalogError::Invalid { .. })));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            PropertyCatalog::from_json("{not json"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = PropertyCatalog::load("/nonexistent/properties.json");
        assert!(matches!(result, Err(CatalogError::Io(_))));
    }
}
