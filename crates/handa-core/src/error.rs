use crate::model::report::ReportStatus;
use std::fmt;

/// Machine-readable error codes for transport layers and operator tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    HouseholdNotFound,
    PostNotFound,
    ReportNotFound,
    UnknownSortField,
    UnknownMetric,
    MalformedLocality,
    InvalidPageBounds,
    ReportAlreadyClosed,
    DuplicateHousehold,
    WriteConflict,
    StorageUnavailable,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::HouseholdNotFound => "E2001",
            Self::PostNotFound => "E2002",
            Self::ReportNotFound => "E2003",
            Self::UnknownSortField => "E3001",
            Self::UnknownMetric => "E3002",
            Self::MalformedLocality => "E3003",
            Self::InvalidPageBounds => "E3004",
            Self::ReportAlreadyClosed => "E4001",
            Self::DuplicateHousehold => "E4002",
            Self::WriteConflict => "E4003",
            Self::StorageUnavailable => "E5001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::HouseholdNotFound => "Household not found",
            Self::PostNotFound => "Post not found",
            Self::ReportNotFound => "Report not found",
            Self::UnknownSortField => "Unknown feed sort field",
            Self::UnknownMetric => "Unknown leaderboard metric",
            Self::MalformedLocality => "Malformed locality scope",
            Self::InvalidPageBounds => "Invalid page or limit",
            Self::ReportAlreadyClosed => "Report already handled",
            Self::DuplicateHousehold => "Household already registered",
            Self::WriteConflict => "Conflicting concurrent write",
            Self::StorageUnavailable => "Storage unavailable",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::HouseholdNotFound | Self::PostNotFound => None,
            Self::ReportNotFound => Some("List pending reports with `handa report list`."),
            Self::UnknownSortField => {
                Some("Use one of: created, verifications, verified-items.")
            }
            Self::UnknownMetric => Some("Use one of: all-time, go-bag."),
            Self::MalformedLocality => {
                Some("Leaderboards and analytics require a non-empty barangay code.")
            }
            Self::InvalidPageBounds => Some("Pages are 1-based; limit must be at least 1."),
            Self::ReportAlreadyClosed => {
                Some("Another moderator handled this report; refresh the queue.")
            }
            Self::DuplicateHousehold => Some("Pick a different household id."),
            Self::WriteConflict => Some("Retry the request; storage stayed busy past the retry."),
            Self::StorageUnavailable => Some("Check the database path and file permissions."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Coarse taxonomy the transport layer maps onto its own status space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Validation,
    Conflict,
    Internal,
}

/// Typed error surface of the engine's write paths.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("household not found: '{0}'")]
    HouseholdNotFound(String),

    #[error("post not found: '{0}'")]
    PostNotFound(String),

    #[error("report not found: '{0}'")]
    ReportNotFound(String),

    #[error("report '{id}' is already {status}")]
    ReportAlreadyClosed { id: String, status: ReportStatus },

    #[error("household '{0}' already registered")]
    DuplicateHousehold(String),

    #[error("conflicting concurrent write: {0}")]
    WriteConflict(&'static str),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Storage(#[from] rusqlite::Error),
}

impl EngineError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::HouseholdNotFound(_) | Self::PostNotFound(_) | Self::ReportNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::Validation(_) => ErrorKind::Validation,
            Self::ReportAlreadyClosed { .. }
            | Self::DuplicateHousehold(_)
            | Self::WriteConflict(_) => ErrorKind::Conflict,
            Self::Storage(_) => ErrorKind::Internal,
        }
    }

    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::HouseholdNotFound(_) => ErrorCode::HouseholdNotFound,
            Self::PostNotFound(_) => ErrorCode::PostNotFound,
            Self::ReportNotFound(_) => ErrorCode::ReportNotFound,
            Self::ReportAlreadyClosed { .. } => ErrorCode::ReportAlreadyClosed,
            Self::DuplicateHousehold(_) => ErrorCode::DuplicateHousehold,
            Self::WriteConflict(_) => ErrorCode::WriteConflict,
            Self::Validation(_) => ErrorCode::InvalidPageBounds,
            Self::Storage(_) => ErrorCode::StorageUnavailable,
        }
    }
}
