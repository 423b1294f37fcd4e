//! Search aggregation over the games and movies catalogs
//!
//! Both catalogs are queried concurrently and joined all-or-nothing: the
//! merged list (games first, then movies) is only produced when both succeed.
//! Any failure switches to the built-in sample dataset.
//!
//! [`SearchSession`] holds what the search view displays. A search is split
//! into `begin` / `complete` around the network round trip so that a slower,
//! superseded request can never overwrite a newer result.

use tracing::{debug, info, warn};

use common::http::fetch_json;
use common::{ApiRequest, ClientError, ClientResult, Notice, Transport};

use crate::filter::{FilterCriteria, apply};
use crate::models::MediaItem;
use crate::sample::sample_matching;

/// Notice shown when the sample dataset replaces live results
pub const FALLBACK_NOTICE: &str = "Backend not reachable, showing sample results.";

/// External catalog queried by title
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Catalog {
    Games,
    Movies,
}

impl Catalog {
    pub fn path(&self) -> &'static str {
        match self {
            Catalog::Games => "/search",
            Catalog::Movies => "/movies",
        }
    }
}

/// Query one catalog; a `null` body counts as no results
///
/// Entries that do not decode are logged and skipped.
pub async fn fetch_catalog<T: Transport>(
    transport: &T,
    catalog: Catalog,
    query: &str,
) -> ClientResult<Vec<MediaItem>> {
    let request = ApiRequest::get(catalog.path()).query("q", query);
    let raw: Option<Vec<serde_json::Value>> = fetch_json(transport, request).await?;

    let items: Vec<MediaItem> = raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|value| match serde_json::from_value(value) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!("Skipping malformed {:?} catalog entry: {}", catalog, e);
                None
            }
        })
        .collect();
    debug!("{:?} catalog returned {} items", catalog, items.len());
    Ok(items)
}

/// Handle for one in-flight search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    sequence: u64,
    query: String,
}

impl SearchTicket {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

/// Unfiltered result of an aggregated search
#[derive(Debug)]
pub enum SearchOutcome {
    /// Both catalogs answered
    Live(Vec<MediaItem>),
    /// At least one catalog failed; `items` is the matching sample data
    Fallback {
        items: Vec<MediaItem>,
        cause: ClientError,
    },
}

impl SearchOutcome {
    pub fn items(&self) -> &[MediaItem] {
        match self {
            SearchOutcome::Live(items) => items,
            SearchOutcome::Fallback { items, .. } => items,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, SearchOutcome::Fallback { .. })
    }
}

/// Concurrent two-catalog search
pub struct SearchAggregator<'a, T> {
    transport: &'a T,
}

impl<'a, T: Transport> SearchAggregator<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    /// Query both catalogs and merge, failing if either fails
    ///
    /// Both requests are in flight before either is awaited, and both are
    /// allowed to settle before the result is decided.
    pub async fn fetch(&self, query: &str) -> ClientResult<Vec<MediaItem>> {
        let (games, movies) = tokio::join!(
            fetch_catalog(self.transport, Catalog::Games, query),
            fetch_catalog(self.transport, Catalog::Movies, query),
        );

        let mut merged = games?;
        merged.extend(movies?);
        Ok(merged)
    }

    /// Run the search for `ticket`, substituting sample data on failure
    pub async fn run(&self, ticket: &SearchTicket) -> SearchOutcome {
        info!("Searching catalogs for: {}", ticket.query);
        match self.fetch(&ticket.query).await {
            Ok(items) => {
                info!("Search for {} returned {} items", ticket.query, items.len());
                SearchOutcome::Live(items)
            }
            Err(cause) => {
                warn!(
                    "Catalog search for {} failed, using sample data: {}",
                    ticket.query, cause
                );
                SearchOutcome::Fallback {
                    items: sample_matching(&ticket.query),
                    cause,
                }
            }
        }
    }
}

/// State behind the search view
#[derive(Debug, Default)]
pub struct SearchSession {
    criteria: FilterCriteria,
    items: Vec<MediaItem>,
    notice: Option<Notice>,
    busy: bool,
    sequence: u64,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently displayed items
    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    /// Failure notice from the last completed search, if any
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// True while a search is in flight
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Replace the criteria; displayed items change only on the next
    /// search or [`reapply_filters`](Self::reapply_filters)
    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
    }

    /// Start a search
    ///
    /// A blank query clears results and notice, invalidates anything in
    /// flight and returns `None`: nothing should be fetched.
    pub fn begin(&mut self, query: &str) -> Option<SearchTicket> {
        self.sequence += 1;
        self.notice = None;

        let query = query.trim();
        if query.is_empty() {
            self.items.clear();
            self.busy = false;
            return None;
        }

        self.busy = true;
        Some(SearchTicket {
            sequence: self.sequence,
            query: query.to_string(),
        })
    }

    /// Apply a finished search; returns false when `ticket` was superseded
    pub fn complete(&mut self, ticket: &SearchTicket, outcome: SearchOutcome) -> bool {
        if ticket.sequence != self.sequence {
            debug!(
                "Discarding stale results for {} (#{}, latest #{})",
                ticket.query, ticket.sequence, self.sequence
            );
            return false;
        }

        self.busy = false;
        self.items = apply(outcome.items(), &self.criteria);
        self.notice = outcome
            .is_fallback()
            .then(|| Notice::failure(FALLBACK_NOTICE));
        true
    }

    /// Narrow the displayed items with the current criteria, without fetching
    pub fn reapply_filters(&mut self) {
        self.items = apply(&self.items, &self.criteria);
    }

    /// Run a complete search against `transport`
    pub async fn search<T: Transport>(&mut self, transport: &T, query: &str) {
        let Some(ticket) = self.begin(query) else {
            return;
        };
        let outcome = SearchAggregator::new(transport).run(&ticket).await;
        self.complete(&ticket, outcome);
    }
}
