//! # Listing facade
//!
//! Ties the pieces together for callers: a [`FilterSpecification`] goes in,
//! a [`Page`] comes out. Execution is delegated to a [`QueryExecutor`]; the
//! crate ships one for Sea-ORM ([`SeaOrmExecutor`](crate::backend::sql::SeaOrmExecutor))
//! and one for in-process records ([`MemoryExecutor`](crate::backend::memory::MemoryExecutor)).
//!
//! ```rust,ignore
//! let service = ListingService::new(&metamodel, "order");
//! let executor = SeaOrmExecutor::<orders::Entity, _>::new(&db);
//!
//! let spec = FilterSpecification::from_json_lenient(Some(raw_json));
//! let page = service.find_page(&spec, &executor).await?;
//! ```

use async_trait::async_trait;
use tracing::debug;

use crate::config::FilterConfig;
use crate::diagnostics::Diagnostics;
use crate::filtering::{
    Page, PageRequest, Predicate, SortKey, build_specification, resolve_sort,
};
use crate::metamodel::Metamodel;
use crate::models::FilterSpecification;

/// Everything an executor needs to fetch one page.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterQuery {
    pub predicate: Predicate,
    pub page: PageRequest,
    /// Ordering terms, most significant first
    pub sort: Vec<SortKey>,
    pub diagnostics: Diagnostics,
}

/// Runs a prepared [`FilterQuery`] against some record store.
///
/// Errors are the store's own and are passed to the caller untouched.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    type Item: Send;
    type Error: Send;

    /// Records matching `query.predicate`, ordered by `query.sort`, restricted
    /// to the requested page, together with the total number of matches.
    async fn fetch_page(&self, query: &FilterQuery) -> Result<Page<Self::Item>, Self::Error>;

    /// Every record, unfiltered and unpaged.
    async fn fetch_all(&self) -> Result<Vec<Self::Item>, Self::Error>;
}

/// Listing entry point for one entity.
#[derive(Debug, Clone)]
pub struct ListingService<'a> {
    metamodel: &'a Metamodel,
    entity: String,
    config: FilterConfig,
}

impl<'a> ListingService<'a> {
    pub fn new(metamodel: &'a Metamodel, entity: impl Into<String>) -> Self {
        Self {
            metamodel,
            entity: entity.into(),
            config: FilterConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: FilterConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &FilterConfig {
        &self.config
    }

    #[must_use]
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// Build predicate, page request and ordering for `spec` without executing anything.
    #[must_use]
    pub fn prepare(&self, spec: &FilterSpecification) -> FilterQuery {
        let outcome = build_specification(self.metamodel, &self.entity, spec, &self.config);
        let page = PageRequest::from_spec(spec, &self.config);
        let (sort, sort_note) = resolve_sort(self.metamodel, &self.entity, &page, &self.config);

        let mut diagnostics = outcome.diagnostics;
        diagnostics.extend(sort_note);

        FilterQuery {
            predicate: outcome.predicate,
            page,
            sort,
            diagnostics,
        }
    }

    /// Fetch the page of records described by `spec`.
    ///
    /// # Errors
    ///
    /// Only errors raised by `executor`; malformed filter input never fails.
    pub async fn find_page<X: QueryExecutor>(
        &self,
        spec: &FilterSpecification,
        executor: &X,
    ) -> Result<Page<X::Item>, X::Error> {
        self.find_page_with_diagnostics(spec, executor)
            .await
            .map(|(page, _)| page)
    }

    /// Like [`find_page`](Self::find_page), also returning what was ignored or adjusted.
    ///
    /// # Errors
    ///
    /// Only errors raised by `executor`.
    pub async fn find_page_with_diagnostics<X: QueryExecutor>(
        &self,
        spec: &FilterSpecification,
        executor: &X,
    ) -> Result<(Page<X::Item>, Diagnostics), X::Error> {
        let query = self.prepare(spec);
        debug!(
            entity = %self.entity,
            predicate = %query.predicate,
            page = query.page.page,
            size = query.page.size,
            ignored = query.diagnostics.dropped().count(),
            "Listing page"
        );

        let page = executor.fetch_page(&query).await?;
        debug!(
            entity = %self.entity,
            returned = page.number_of_elements(),
            total = page.total_elements,
            "Listed page"
        );
        Ok((page, query.diagnostics))
    }

    /// Fetch every record, ignoring filters and pagination.
    ///
    /// # Errors
    ///
    /// Only errors raised by `executor`.
    pub async fn find_all<X: QueryExecutor>(&self, executor: &X) -> Result<Vec<X::Item>, X::Error> {
        debug!(entity = %self.entity, "Listing all records");
        find_all(executor).await
    }
}

/// One-shot [`ListingService::find_page`] with the default configuration.
///
/// # Errors
///
/// Only errors raised by `executor`.
pub async fn find_page<X: QueryExecutor>(
    spec: &FilterSpecification,
    metamodel: &Metamodel,
    entity: &str,
    executor: &X,
) -> Result<Page<X::Item>, X::Error> {
    ListingService::new(metamodel, entity)
        .find_page(spec, executor)
        .await
}

/// Every record of the executor's store.
///
/// # Errors
///
/// Only errors raised by `executor`.
pub async fn find_all<X: QueryExecutor>(executor: &X) -> Result<Vec<X::Item>, X::Error> {
    let items = executor.fetch_all().await?;
    debug!(count = items.len(), "Listed all records");
    Ok(items)
}
