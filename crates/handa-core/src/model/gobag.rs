use serde::{Deserialize, Serialize};

/// A household's emergency go-bag: the set of held checklist item ids plus
/// an optional photo. One per household, created lazily on first access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoBag {
    pub household_id: String,
    /// Held item ids, sorted ascending. The storage layer enforces the set
    /// invariant; re-adding a held item is a no-op.
    pub items: Vec<String>,
    pub image_ref: Option<String>,
    pub updated_at_us: i64,
}

impl GoBag {
    #[must_use]
    pub fn holds(&self, item_id: &str) -> bool {
        self.items.iter().any(|held| held == item_id)
    }
}
