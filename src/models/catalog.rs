//! Seed catalog: books and members loaded into empty repositories at startup

use serde::{Deserialize, Serialize};

use super::{book::NewBook, member::NewMember};

/// Seed file contents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSeed {
    #[serde(default)]
    pub books: Vec<NewBook>,
    #[serde(default)]
    pub members: Vec<NewMember>,
}

impl CatalogSeed {
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}
