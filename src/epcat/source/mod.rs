//! # Page Sources
//!
//! The remote side of the catalog is an opaque paged-fetch capability: given a page
//! number, eventually produce that page's records (in display order) and the
//! aggregate totals, or fail. [`PageSource`] is that capability.
//!
//! - [`graphql::GraphqlSource`]: production source, POSTs a GraphQL query.
//! - `scripted::ScriptedSource` (tests / `test_utils`): canned pages, failure
//!   injection, call counting, and per-page gates for holding a fetch in flight.
//!
//! Timeouts are the source's business; the engine just awaits the result.

use crate::error::Result;
use crate::model::{PageInfo, ServerEpisode};
use async_trait::async_trait;
use std::sync::Arc;

pub mod graphql;
#[cfg(any(test, feature = "test_utils"))]
pub mod scripted;

/// One page as delivered by a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// Records in the source's result order.
    pub records: Vec<ServerEpisode>,
    pub info: PageInfo,
}

impl FetchedPage {
    pub fn ids(&self) -> Vec<String> {
        self.records.iter().map(|r| r.id.clone()).collect()
    }
}

#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, page: u32) -> Result<FetchedPage>;
}

#[async_trait]
impl<T> PageSource for Arc<T>
where
    T: PageSource + ?Sized,
{
    async fn fetch_page(&self, page: u32) -> Result<FetchedPage> {
        (**self).fetch_page(page).await
    }
}
