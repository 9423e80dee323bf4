//! Server-side filter handles and their local bookkeeping.
//!
//! A filter lives on the node; the client only holds its identifier and the
//! kind it was installed as. The kind decides how `eth_getFilterChanges`
//! results are decoded (log objects vs. hashes).
//!
//! A filter is active from the moment the node hands back its id until an
//! `eth_uninstallFilter` call succeeds, after which the client forgets it.
//! Polling an uninstalled filter is still forwarded to the node, which
//! answers with its own error.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use chainweb3_core::H256;

use crate::types::{FilterOptions, Log};

/// Opaque filter identifier returned by the node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterId(pub String);

impl From<String> for FilterId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for FilterId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for FilterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a filter was installed to watch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterKind {
    /// `eth_newFilter` with the given criteria.
    Log(FilterOptions),
    /// `eth_newBlockFilter`.
    Block,
    /// `eth_newPendingTransactionFilter`.
    PendingTransaction,
}

impl FilterKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Log(_) => "log",
            Self::Block => "block",
            Self::PendingTransaction => "pending_transaction",
        }
    }
}

/// Handle to an installed filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    id: FilterId,
    kind: FilterKind,
}

impl Filter {
    pub fn new(id: FilterId, kind: FilterKind) -> Self {
        Self { id, kind }
    }

    pub fn id(&self) -> &FilterId {
        &self.id
    }

    pub fn kind(&self) -> &FilterKind {
        &self.kind
    }
}

/// New entries since the last poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterChanges {
    /// From a log filter.
    Logs(Vec<Log>),
    /// Block hashes or pending transaction hashes.
    Hashes(Vec<H256>),
}

impl FilterChanges {
    pub fn len(&self) -> usize {
        match self {
            Self::Logs(l) => l.len(),
            Self::Hashes(h) => h.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone)]
struct FilterEntry {
    kind: FilterKind,
}

/// Filters installed through one client that have not been uninstalled.
///
/// An entry is dropped as soon as the node confirms the uninstall, so the
/// registry only ever holds live filters.
#[derive(Clone, Default)]
pub struct FilterRegistry {
    entries: Arc<Mutex<HashMap<FilterId, FilterEntry>>>,
}

impl FilterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<FilterId, FilterEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a freshly installed filter.
    pub fn register(&self, filter: &Filter) {
        self.lock().insert(
            filter.id.clone(),
            FilterEntry {
                kind: filter.kind.clone(),
            },
        );
    }

    /// Forget `id`, returning the filter if it was live.
    pub fn remove(&self, id: &FilterId) -> Option<Filter> {
        self.lock()
            .remove(id)
            .map(|e| Filter::new(id.clone(), e.kind))
    }

    pub fn is_active(&self, id: &FilterId) -> bool {
        self.lock().contains_key(id)
    }

    /// Live filters, as handles that can be polled again.
    pub fn active(&self) -> Vec<Filter> {
        self.lock()
            .iter()
            .map(|(id, e)| Filter::new(id.clone(), e.kind.clone()))
            .collect()
    }

    /// Number of live filters.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
