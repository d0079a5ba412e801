use super::{ParseEnumError, normalize};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Moderation lifecycle of a flagged post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pending,
    Resolved,
    Dismissed,
}

impl ReportStatus {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Resolved => "resolved",
            Self::Dismissed => "dismissed",
        }
    }

    /// Validate whether a transition from self to `target` is allowed.
    ///
    /// Valid transitions:
    /// - `pending -> resolved` (deletes the flagged post)
    /// - `pending -> dismissed`
    ///
    /// Both targets are terminal; anything out of a terminal state is
    /// rejected, as is re-entering `pending`.
    pub fn can_transition_to(self, target: Self) -> Result<(), InvalidTransition> {
        if self != Self::Pending {
            return Err(InvalidTransition {
                from: self,
                to: target,
                reason: "resolved and dismissed are terminal",
            });
        }

        if target == Self::Pending {
            return Err(InvalidTransition {
                from: self,
                to: target,
                reason: "reports cannot return to pending",
            });
        }

        Ok(())
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "pending" => Ok(Self::Pending),
            "resolved" => Ok(Self::Resolved),
            "dismissed" => Ok(Self::Dismissed),
            _ => Err(ParseEnumError {
                expected: "report status",
                got: s.to_string(),
            }),
        }
    }
}

/// Error returned when a report transition is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTransition {
    pub from: ReportStatus,
    pub to: ReportStatus,
    pub reason: &'static str,
}

/// A filed moderation report. `post_id` is nullable because the flagged
/// post may already be gone by the time a moderator acts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentReport {
    pub report_id: String,
    pub post_id: Option<String>,
    pub reporter_id: String,
    pub reason: String,
    pub status: ReportStatus,
    pub created_at_us: i64,
    pub updated_at_us: i64,
}
