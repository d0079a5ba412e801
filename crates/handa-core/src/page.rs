//! Shared pagination window for the read-side engines.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};

/// A validated 1-based pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    page: u32,
    limit: u32,
}

impl Page {
    /// Validate pagination bounds: pages are 1-based and the limit must be
    /// at least 1.
    ///
    /// # Errors
    ///
    /// `Validation` when either bound is zero.
    pub fn new(page: u32, limit: u32) -> Result<Self, EngineError> {
        if page == 0 || limit == 0 {
            return Err(EngineError::Validation(format!(
                "pages are 1-based and limit must be at least 1 (got page {page}, limit {limit})"
            )));
        }
        Ok(Self { page, limit })
    }

    #[must_use]
    pub const fn page(self) -> u32 {
        self.page
    }

    #[must_use]
    pub const fn limit(self) -> u32 {
        self.limit
    }

    /// Rows to skip before this window starts.
    #[must_use]
    pub const fn skip(self) -> usize {
        (self.page as usize - 1) * self.limit as usize
    }
}

impl Default for Page {
    fn default() -> Self {
        Self { page: 1, limit: 20 }
    }
}

#[cfg(test)]
mod tests {
    use super::Page;
    use crate::error::EngineError;

    #[test]
    fn page_bounds_are_validated() {
        assert!(matches!(Page::new(0, 10), Err(EngineError::Validation(_))));
        assert!(matches!(Page::new(1, 0), Err(EngineError::Validation(_))));

        let page = Page::new(3, 25).expect("valid page");
        assert_eq!(page.skip(), 50);
        assert_eq!(page.limit(), 25);
    }

    #[test]
    fn default_page_is_first_twenty() {
        let page = Page::default();
        assert_eq!(page.page(), 1);
        assert_eq!(page.skip(), 0);
        assert_eq!(page.limit(), 20);
    }
}
