use serde::{Deserialize, Serialize};

/// One entry of a post's bag snapshot: the item id plus the name/category
/// it had at post time, so later catalog edits never alter past posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotItem {
    pub item_id: String,
    pub name: String,
    pub category: String,
}

/// An append-only community post. Created once; only the verification
/// counters change afterward, until moderation deletes the row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub post_id: String,
    pub household_id: String,
    pub caption: String,
    pub image_ref: Option<String>,
    pub barangay_code: String,
    /// Immutable ordered copy of the go-bag at creation time.
    pub bag_snapshot: Vec<SnapshotItem>,
    pub verified_item_count: u32,
    pub verification_count: u32,
    pub created_at_us: i64,
}

/// Input for creating a post. The snapshot is captured by the store, not
/// supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub household_id: String,
    pub caption: String,
    pub image_ref: Option<String>,
}
