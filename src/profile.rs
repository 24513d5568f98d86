//! Capability-set holder with a stale-response guard for profile loads.
//!
//! Profile data arrives from an asynchronous fetch collaborator and is
//! eventually consistent: a reload can supersede an in-flight one, and the
//! two can resolve in either order. The cell keys every load by an issued
//! sequence number and installs only the latest request's result, so the
//! settled capability set never reflects a merge of overlapping loads and
//! never regresses to an earlier response that happened to arrive last.

#[cfg(feature = "audit")]
use log::debug;

use crate::{
    capability::CapabilitySet,
    resolver::{AccountRecord, PermissionResolver},
};
use std::sync::{
    RwLock,
    atomic::{AtomicU64, Ordering},
};

/// Handle for one profile load, keyed by request sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadToken {
    seq: u64,
}

impl LoadToken {
    /// The sequence number of the load this token belongs to.
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// Owns the session's current [`CapabilitySet`] and re-derives it from
/// profile loads, discarding out-of-order stale responses.
///
/// Before the first load completes the cell holds the empty set, so every
/// gate check against it denies; there is no allow-by-default window.
#[derive(Debug)]
pub struct ProfileCell {
    resolver: PermissionResolver,
    issued: AtomicU64,
    capabilities: RwLock<CapabilitySet>,
}

impl Default for ProfileCell {
    fn default() -> Self {
        Self::new(PermissionResolver::new())
    }
}

impl ProfileCell {
    /// Create a cell resolving through the given resolver.
    pub fn new(resolver: PermissionResolver) -> Self {
        Self {
            resolver,
            issued: AtomicU64::new(0),
            capabilities: RwLock::new(CapabilitySet::empty()),
        }
    }

    /// Start a profile load, superseding any load still in flight.
    pub fn begin_load(&self) -> LoadToken {
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        LoadToken { seq }
    }

    /// Complete a load with the fetched account record.
    ///
    /// Returns whether the result was installed. A token that is no longer
    /// the latest issued is stale and its result is silently dropped.
    pub fn complete(&self, token: &LoadToken, record: &AccountRecord) -> bool {
        if self.is_stale(token) {
            return false;
        }
        *self.capabilities.write().unwrap() = self.resolver.resolve(record);
        true
    }

    /// Complete a load straight from the profile endpoint's JSON payload.
    ///
    /// Malformed payloads install the empty set (fail closed) rather than
    /// leaving an earlier account's capabilities in place.
    pub fn complete_json(&self, token: &LoadToken, payload: &str) -> bool {
        if self.is_stale(token) {
            return false;
        }
        *self.capabilities.write().unwrap() = self.resolver.resolve_json(payload);
        true
    }

    /// Record that the latest load failed, dropping to the empty set.
    ///
    /// Failures of superseded loads are ignored like any stale response.
    pub fn fail(&self, token: &LoadToken) -> bool {
        if self.is_stale(token) {
            return false;
        }
        *self.capabilities.write().unwrap() = CapabilitySet::empty();
        true
    }

    /// The current capability set.
    pub fn capabilities(&self) -> CapabilitySet {
        self.capabilities.read().unwrap().clone()
    }

    /// Discard the capability set on logout.
    pub fn clear(&self) {
        // Bump the sequence so any load still in flight lands stale.
        self.issued.fetch_add(1, Ordering::SeqCst);
        *self.capabilities.write().unwrap() = CapabilitySet::empty();
    }

    fn is_stale(&self, token: &LoadToken) -> bool {
        let stale = token.seq != self.issued.load(Ordering::SeqCst);
        #[cfg(feature = "audit")]
        if stale {
            debug!("Discarding stale profile load #{}", token.seq);
        }
        stale
    }
}
