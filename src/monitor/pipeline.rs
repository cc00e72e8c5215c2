//! Paginated streaming aggregation
//!
//! Walks an offset/limit endpoint page by page and folds each record into
//! an aggregation. Only a page of exactly `page_size` records triggers one
//! more fetch at `offset + page_size`; any other length ends the walk.

use std::future::Future;
use tracing::{debug, info};

use super::TimeFrame;
use crate::error::{Error, Result};

/// One page of a paginated endpoint, bounded by a time range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: usize,
    pub limit: usize,
    pub from: i64,
    pub to: i64,
}

/// Immutable settings for one pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub timeframe: TimeFrame,
    pub page_size: usize,
}

impl Pagination {
    pub fn new(timeframe: TimeFrame, page_size: usize) -> Result<Self> {
        if page_size == 0 {
            return Err(Error::Config("Page size must be greater than zero".into()));
        }

        Ok(Self {
            timeframe,
            page_size,
        })
    }

    fn request(&self, offset: usize) -> PageRequest {
        PageRequest {
            offset,
            limit: self.page_size,
            from: self.timeframe.from_millis(),
            to: self.timeframe.to_millis(),
        }
    }
}

/// State folded record by record over a whole result set
pub trait Aggregation: Default {
    type Record;

    fn fold(&mut self, record: &Self::Record);
}

/// Fetches pages sequentially and folds them into a fresh aggregation.
///
/// The next page is requested only after the previous one has been folded.
/// Any fetch failure aborts the walk and is returned as is.
pub async fn paginate<A, F, Fut>(name: &str, pagination: &Pagination, mut fetch: F) -> Result<A>
where
    A: Aggregation,
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = Result<Vec<A::Record>>>,
{
    let mut aggregation = A::default();
    let mut offset = 0;

    loop {
        info!("{} offset: {}", name, offset);

        let page = fetch(pagination.request(offset)).await?;
        debug!("{} page at offset {} returned {} records", name, offset, page.len());

        for record in &page {
            aggregation.fold(record);
        }

        if page.len() != pagination.page_size {
            break;
        }

        offset += pagination.page_size;
    }

    Ok(aggregation)
}
