use serde::{Deserialize, Serialize};

/// One canonical checklist item. Immutable reference data; the catalog size
/// is the denominator for completeness scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub item_id: String,
    pub name: String,
    pub category: String,
}

/// On-disk catalog definition (`[[item]]` tables in TOML).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub item: Vec<CatalogItem>,
}
