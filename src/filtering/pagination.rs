use serde::Serialize;

use crate::config::FilterConfig;
use crate::models::FilterSpecification;

use super::sort::SortDirection;

/// Normalized page and sort parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Zero-based page index
    pub page: u64,
    /// Page size, at least 1 and at most `FilterConfig::max_page_size`
    pub size: u64,
    pub sort_by: String,
    pub direction: SortDirection,
}

impl PageRequest {
    /// Apply defaults and bounds to the raw pagination fields of `spec`.
    ///
    /// A negative page becomes 0, a missing or non-positive size becomes the
    /// default size, and an oversized one is clamped.
    #[must_use]
    pub fn from_spec(spec: &FilterSpecification, config: &FilterConfig) -> Self {
        let page = spec.page.map_or(0, |p| u64::try_from(p).unwrap_or(0));

        let max_size = config.max_page_size.max(1);
        let size = match spec.size.map(u64::try_from) {
            Some(Ok(size)) if size >= 1 => size.min(max_size),
            _ => config.default_page_size.clamp(1, max_size),
        };

        let sort_by = spec
            .sort_by
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(config.default_sort_by.as_str())
            .to_string();

        let direction = spec
            .sort_direction
            .as_deref()
            .map_or(config.default_sort_direction, SortDirection::parse);

        Self {
            page,
            size,
            sort_by,
            direction,
        }
    }

    /// Index of the first record of the page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size)
    }

    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.size
    }
}

/// One page of results plus the totals needed to navigate the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u64,
    /// Zero-based page index
    pub number: u64,
    pub size: u64,
}

impl<T> Page<T> {
    #[must_use]
    pub fn new(content: Vec<T>, total_elements: u64, request: &PageRequest) -> Self {
        let size = request.size.max(1);
        Self {
            content,
            total_elements,
            total_pages: total_elements.div_ceil(size),
            number: request.page,
            size,
        }
    }

    #[must_use]
    pub fn number_of_elements(&self) -> usize {
        self.content.len()
    }

    #[must_use]
    pub const fn is_first(&self) -> bool {
        self.number == 0
    }

    #[must_use]
    pub const fn is_last(&self) -> bool {
        self.number.saturating_add(1) >= self.total_pages
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        !self.is_last()
    }

    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.number > 0
    }

    /// Convert the content while keeping the page metadata.
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            number: self.number,
            size: self.size,
        }
    }
}
