use super::{ParseEnumError, normalize};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Point totals split by the source that earned them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointTotals {
    pub go_bag: i64,
    pub modules: i64,
    pub community: i64,
}

impl PointTotals {
    /// Combined total across every point source.
    #[must_use]
    pub const fn all_time(self) -> i64 {
        self.go_bag + self.modules + self.community
    }
}

/// The three activities that award points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PointSource {
    GoBag,
    Modules,
    Community,
}

impl PointSource {
    const fn as_str(self) -> &'static str {
        match self {
            Self::GoBag => "go-bag",
            Self::Modules => "modules",
            Self::Community => "community",
        }
    }

    /// Column holding this source's running total.
    #[must_use]
    pub(crate) const fn column(self) -> &'static str {
        match self {
            Self::GoBag => "points_gobag",
            Self::Modules => "points_modules",
            Self::Community => "points_community",
        }
    }
}

impl fmt::Display for PointSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PointSource {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "go-bag" | "gobag" | "bag" => Ok(Self::GoBag),
            "modules" | "module" => Ok(Self::Modules),
            "community" => Ok(Self::Community),
            _ => Err(ParseEnumError {
                expected: "point source",
                got: s.to_string(),
            }),
        }
    }
}

/// A registered household (the core account entity).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Household {
    pub household_id: String,
    pub display_name: String,
    /// Two-level administrative scope: city first, barangay within it.
    pub city_code: String,
    pub barangay_code: String,
    pub points: PointTotals,
    pub profile_image: Option<String>,
    pub created_at_us: i64,
    pub updated_at_us: i64,
}

/// Input for registering a household.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHousehold {
    pub household_id: String,
    pub display_name: String,
    pub city_code: String,
    pub barangay_code: String,
    pub profile_image: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{PointSource, PointTotals};
    use std::str::FromStr;

    #[test]
    fn all_time_sums_every_source() {
        let points = PointTotals {
            go_bag: 120,
            modules: 45,
            community: 30,
        };
        assert_eq!(points.all_time(), 195);
        assert_eq!(PointTotals::default().all_time(), 0);
    }

    #[test]
    fn point_source_display_parse_roundtrips() {
        for source in [PointSource::GoBag, PointSource::Modules, PointSource::Community] {
            let rendered = source.to_string();
            let reparsed = PointSource::from_str(&rendered).unwrap();
            assert_eq!(source, reparsed);
        }
    }

    #[test]
    fn point_source_parse_accepts_aliases_and_rejects_unknown() {
        assert_eq!(PointSource::from_str("gobag").unwrap(), PointSource::GoBag);
        assert_eq!(PointSource::from_str("module").unwrap(), PointSource::Modules);
        assert!(PointSource::from_str("referrals").is_err());
    }

    #[test]
    fn point_source_json_roundtrips() {
        assert_eq!(
            serde_json::to_string(&PointSource::GoBag).unwrap(),
            "\"go-bag\""
        );
        assert_eq!(
            serde_json::from_str::<PointSource>("\"community\"").unwrap(),
            PointSource::Community
        );
    }
}
