//! Fixture generation: a canonical catalog plus a reproducible spread of
//! households, bags, posts, and pending reports.

use crate::rng::DeterministicRng;
use handa_core::model::catalog::CatalogItem;
use handa_core::model::household::NewHousehold;

/// City/barangay pairs the generator spreads households over.
const LOCALITIES: &[(&str, &str)] = &[
    ("quezon-city", "batasan-hills"),
    ("quezon-city", "commonwealth"),
    ("quezon-city", "holy-spirit"),
    ("caloocan", "bagong-silang"),
    ("caloocan", "commonwealth"),
    ("marikina", "malanday"),
];

const FAMILY_NAMES: &[&str] = &[
    "Cruz", "Reyes", "Santos", "Garcia", "Mendoza", "Torres", "Flores", "Ramos", "Gonzales",
    "Bautista", "Villanueva", "Fernandez", "Aquino", "Navarro", "Domingo",
];

const CAPTIONS: &[&str] = &[
    "Go-bag updated for typhoon season",
    "Finally completed our water supply",
    "Added a first aid kit today",
    "Barangay drill tomorrow, bag ready",
    "Restocked after the last storm",
    "New flashlight and batteries packed",
];

const REPORT_REASONS: &[&str] = &["spam", "not a real go-bag", "offensive caption"];

/// One generated household with its bag, point totals, and post captions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureHousehold {
    pub household: NewHousehold,
    pub bag_items: Vec<String>,
    pub go_bag_points: i64,
    pub module_points: i64,
    pub community_points: i64,
    pub post_captions: Vec<String>,
}

/// A reproducible dataset: same seed, same fixture, on every platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    pub seed: u64,
    pub catalog: Vec<CatalogItem>,
    pub households: Vec<FixtureHousehold>,
    /// Reasons for reports to file against the first posts of every
    /// seventh household.
    pub report_reasons: Vec<String>,
}

impl Fixture {
    /// Generate a fixture with `household_count` households from `seed`.
    #[must_use]
    pub fn generate(seed: u64, household_count: usize) -> Self {
        let mut rng = DeterministicRng::new(seed);
        let catalog = canonical_catalog();

        let households = (0..household_count)
            .map(|index| generate_household(&mut rng, &catalog, index))
            .collect();

        let report_reasons = (0..household_count.div_ceil(7))
            .map(|_| (*rng.pick(REPORT_REASONS)).to_string())
            .collect();

        Self {
            seed,
            catalog,
            households,
            report_reasons,
        }
    }
}

fn generate_household(
    rng: &mut DeterministicRng,
    catalog: &[CatalogItem],
    index: usize,
) -> FixtureHousehold {
    let (city, barangay) = *rng.pick(LOCALITIES);
    let family = *rng.pick(FAMILY_NAMES);

    // Bag sizes spread across the readiness buckets.
    let held = usize::try_from(rng.next_bounded(catalog.len() as u64 + 1)).unwrap_or(0);
    let bag_items = catalog
        .iter()
        .take(held)
        .map(|item| item.item_id.clone())
        .collect();

    let post_count = usize::try_from(rng.next_bounded(4)).unwrap_or(0);
    let post_captions = (0..post_count)
        .map(|_| (*rng.pick(CAPTIONS)).to_string())
        .collect();

    FixtureHousehold {
        household: NewHousehold {
            household_id: format!("hh-{index:04}"),
            display_name: format!("Pamilya {family}"),
            city_code: city.to_string(),
            barangay_code: barangay.to_string(),
            profile_image: None,
        },
        bag_items,
        go_bag_points: i64::try_from(held).unwrap_or(0) * 5,
        module_points: i64::try_from(rng.next_bounded(8)).unwrap_or(0) * 10,
        community_points: i64::try_from(rng.next_bounded(5)).unwrap_or(0) * 2,
        post_captions,
    }
}

/// The canonical Philippine go-bag checklist used by demos and tests.
#[must_use]
pub fn canonical_catalog() -> Vec<CatalogItem> {
    [
        ("water", "Drinking water (3 days)", "Food & Water"),
        ("canned-goods", "Canned goods", "Food & Water"),
        ("rice", "Rice pack", "Food & Water"),
        ("can-opener", "Manual can opener", "Food & Water"),
        ("first-aid-kit", "First aid kit", "Health"),
        ("medicines", "Prescription medicines", "Health"),
        ("face-masks", "Face masks", "Health"),
        ("flashlight", "Flashlight", "Tools"),
        ("batteries", "Spare batteries", "Tools"),
        ("radio", "Battery-powered radio", "Tools"),
        ("whistle", "Whistle", "Tools"),
        ("powerbank", "Charged power bank", "Tools"),
        ("documents", "Waterproofed documents", "Essentials"),
        ("cash", "Emergency cash", "Essentials"),
        ("clothes", "Change of clothes", "Essentials"),
        ("blanket", "Emergency blanket", "Essentials"),
    ]
    .into_iter()
    .map(|(id, name, category)| CatalogItem {
        item_id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::Fixture;

    #[test]
    fn same_seed_generates_identical_fixtures() {
        let a = Fixture::generate(42, 30);
        let b = Fixture::generate(42, 30);
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_generate_different_spreads() {
        let a = Fixture::generate(1, 30);
        let b = Fixture::generate(2, 30);
        assert_ne!(a, b);
    }

    #[test]
    fn bags_never_exceed_the_catalog() {
        let fixture = Fixture::generate(7, 50);
        let catalog_size = fixture.catalog.len();
        for household in &fixture.households {
            assert!(household.bag_items.len() <= catalog_size);
        }
    }

    #[test]
    fn household_ids_are_unique_and_stable() {
        let fixture = Fixture::generate(3, 10);
        let ids: Vec<_> = fixture
            .households
            .iter()
            .map(|h| h.household.household_id.as_str())
            .collect();
        assert_eq!(ids[0], "hh-0000");
        assert_eq!(ids[9], "hh-0009");

        let mut deduped = ids.clone();
        deduped.dedup();
        assert_eq!(deduped.len(), ids.len());
    }

    #[test]
    fn canonical_catalog_ids_are_unique() {
        let catalog = super::canonical_catalog();
        let mut ids: Vec<_> = catalog.iter().map(|item| item.item_id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), catalog.len());
    }
}
