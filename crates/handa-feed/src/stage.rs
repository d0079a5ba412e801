//! Discrete feed-pipeline stages.
//!
//! Each stage is a pure function over the intermediate row set: rows in,
//! rows out, no storage access and no hidden state. [`crate::builder`]
//! applies them in a fixed order:
//!
//! 1. barangay filter (pushed into SQL by the builder)
//! 2. [`dedupe_latest_per_household`] (unique mode only)
//! 3. [`filter_city`], which requires the household join, so in unique mode it
//!    runs after dedup; the result is identical either way, only the row
//!    count the dedup stage touches differs
//! 4. [`filter_search`]
//! 5. [`sort_rows`]
//! 6. [`paginate`]
//!
//! Determinism: every ordering falls back to `post_id` ascending on equal
//! keys, so pagination never duplicates or drops rows across pages.

use crate::builder::FeedPost;
use crate::query::{FeedSort, Page, SortDir};
use std::collections::HashSet;

/// Keep rows whose household city matches exactly.
#[must_use]
pub fn filter_city(rows: Vec<FeedPost>, city: &str) -> Vec<FeedPost> {
    rows.into_iter()
        .filter(|row| row.city_code == city)
        .collect()
}

/// Keep rows matching a case-insensitive substring search, OR-combined
/// over caption, snapshot item names, snapshot categories, and household
/// display name.
#[must_use]
pub fn filter_search(rows: Vec<FeedPost>, needle: &str) -> Vec<FeedPost> {
    let needle = needle.to_lowercase();
    if needle.is_empty() {
        return rows;
    }

    rows.into_iter()
        .filter(|row| matches_search(row, &needle))
        .collect()
}

fn matches_search(row: &FeedPost, lowered_needle: &str) -> bool {
    let caption = row.post.caption.to_lowercase();
    let display = row.display_name.to_lowercase();

    caption.contains(lowered_needle)
        || display.contains(lowered_needle)
        || row.post.bag_snapshot.iter().any(|snap| {
            snap.name.to_lowercase().contains(lowered_needle)
                || snap.category.to_lowercase().contains(lowered_needle)
        })
}

/// Keep only the most recent post per household. Rows are ordered newest
/// first (post id ascending on equal timestamps) and the first row per
/// household wins, so the survivor is deterministic even under timestamp
/// ties.
#[must_use]
pub fn dedupe_latest_per_household(mut rows: Vec<FeedPost>) -> Vec<FeedPost> {
    rows.sort_by(|a, b| {
        b.post
            .created_at_us
            .cmp(&a.post.created_at_us)
            .then_with(|| a.post.post_id.cmp(&b.post.post_id))
    });

    let mut seen = HashSet::new();
    rows.retain(|row| seen.insert(row.post.household_id.clone()));
    rows
}

/// Sort rows by the requested field and direction, `post_id` ascending on
/// equal keys.
pub fn sort_rows(rows: &mut [FeedPost], sort: FeedSort, order: SortDir) {
    rows.sort_by(|a, b| {
        let primary = match sort {
            FeedSort::Created => a.post.created_at_us.cmp(&b.post.created_at_us),
            FeedSort::Verifications => a.post.verification_count.cmp(&b.post.verification_count),
            FeedSort::VerifiedItems => {
                a.post.verified_item_count.cmp(&b.post.verified_item_count)
            }
        };
        let primary = match order {
            SortDir::Asc => primary,
            SortDir::Desc => primary.reverse(),
        };
        primary.then_with(|| a.post.post_id.cmp(&b.post.post_id))
    });
}

/// Slice one page out of the fully filtered/sorted row set. Returns the
/// page rows and the total row count before slicing.
#[must_use]
pub fn paginate(rows: Vec<FeedPost>, page: Page) -> (Vec<FeedPost>, usize) {
    let total = rows.len();
    let window = rows
        .into_iter()
        .skip(page.skip())
        .take(page.limit() as usize)
        .collect();
    (window, total)
}
