//! Document index: maps source files to their attribution metadata.
//!
//! The index is a JSON file grouping documents by publishing organization:
//!
//! ```json
//! {
//!   "organizations": {
//!     "fao": {
//!       "full_name": "Organización de las Naciones Unidas para la Alimentación y la Agricultura",
//!       "acronym": "FAO",
//!       "documents": [
//!         { "id": "fao/guia", "title": "Guía alimentaria", "year": 2019,
//!           "author": "FAO", "link": "https://...", "location_in_pc": "data/fao/guia.txt" }
//!       ]
//!     }
//!   }
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use nourai_rag::DocSource;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct DocumentIndex {
    #[serde(default)]
    pub organizations: HashMap<String, Organization>,
}

#[derive(Debug, Deserialize)]
pub struct Organization {
    pub full_name: Option<String>,
    pub acronym: Option<String>,
    #[serde(default)]
    pub documents: Vec<IndexedDocument>,
}

#[derive(Debug, Deserialize)]
pub struct IndexedDocument {
    pub id: Option<String>,
    pub title: Option<String>,
    pub year: Option<i32>,
    pub author: Option<String>,
    pub link: Option<String>,
    pub location_in_pc: Option<String>,
}

impl DocumentIndex {
    /// Load the index from a JSON file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading document index {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parsing document index {}", path.display()))
    }

    /// Resolve attribution metadata for a source file.
    ///
    /// Matches on the indexed `location_in_pc` path, falling back to a
    /// filename match; files absent from the index get only path and
    /// filename, leaving placeholders to the citation layer.
    pub fn source_for(&self, source_path: &str, filename: &str) -> DocSource {
        let normalized = source_path.replace('\\', "/");

        for organization in self.organizations.values() {
            for document in &organization.documents {
                let Some(location) = &document.location_in_pc else {
                    continue;
                };
                let location = location.replace('\\', "/");
                let matches_path = location == normalized
                    || normalized.ends_with(&location)
                    || location.ends_with(filename);
                if !matches_path {
                    continue;
                }

                return DocSource {
                    source_path: source_path.to_string(),
                    filename: filename.to_string(),
                    title: document.title.clone(),
                    organization: organization.full_name.clone(),
                    organization_acronym: organization.acronym.clone(),
                    year: document.year,
                    author: document.author.clone(),
                    link: document.link.clone(),
                };
            }
        }

        DocSource::unindexed(source_path, filename)
    }
}
