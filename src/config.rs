//! Defaults and safety limits for the filtering engine.
//!
//! `FilterConfig::default()` reproduces the documented listing defaults
//! (`page=0`, `size=10`, `sortBy="id"`, `sortDirection="desc"`). Deployments
//! can deserialize an override from their own configuration source:
//!
//! ```rust,ignore
//! let config: FilterConfig = serde_json::from_str(r#"{"max_page_size": 200}"#)?;
//! ```

use serde::{Deserialize, Serialize};

use crate::filtering::sort::SortDirection;

// Basic safety limits
const DEFAULT_MAX_VALUE_LENGTH: usize = 10_000;
const DEFAULT_MAX_SEARCH_LENGTH: usize = 10_000;
const DEFAULT_MAX_FIELD_LENGTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    /// Page size used when the request carries none (or an invalid one).
    pub default_page_size: u64,
    /// Upper bound for the requested page size; larger values are clamped.
    pub max_page_size: u64,
    /// Sort attribute used when the request carries none or an unknown one.
    pub default_sort_by: String,
    pub default_sort_direction: SortDirection,
    /// Criteria whose value is longer than this are dropped.
    pub max_value_length: usize,
    /// Global search terms are truncated to this many characters.
    pub max_search_length: usize,
    /// Field paths longer than this are rejected before resolution.
    pub max_field_length: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 1_000,
            default_sort_by: "id".to_string(),
            default_sort_direction: SortDirection::Desc,
            max_value_length: DEFAULT_MAX_VALUE_LENGTH,
            max_search_length: DEFAULT_MAX_SEARCH_LENGTH,
            max_field_length: DEFAULT_MAX_FIELD_LENGTH,
        }
    }
}
