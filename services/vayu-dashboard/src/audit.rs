//! Filtering and per-type counts over audit log entries

use serde::Serialize;

use crate::types::{BlockchainLogEntry, EventType};

/// Keep only entries whose event type is in `wanted`
///
/// An empty `wanted` keeps everything.
pub fn filter_by_event_type(
    entries: Vec<BlockchainLogEntry>,
    wanted: &[EventType],
) -> Vec<BlockchainLogEntry> {
    if wanted.is_empty() {
        return entries;
    }
    entries
        .into_iter()
        .filter(|entry| wanted.contains(&entry.event_type))
        .collect()
}

/// Event counts shown above the audit log
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EventSummary {
    pub total: usize,
    pub decisions: usize,
    pub faults: usize,
    pub healing: usize,
}

impl EventSummary {
    /// Count `entries` by type; unknown types only add to `total`
    pub fn from_entries(entries: &[BlockchainLogEntry]) -> Self {
        entries
            .iter()
            .fold(Self::default(), |mut summary, entry| {
                summary.total += 1;
                match entry.event_type {
                    EventType::Decision => summary.decisions += 1,
                    EventType::Fault => summary.faults += 1,
                    EventType::Healing => summary.healing += 1,
                    EventType::Unknown(_) => {}
                }
                summary
            })
    }
}

/// Audit log entries together with their summary
#[derive(Debug, Clone, Serialize)]
pub struct AuditLog {
    pub summary: EventSummary,
    pub logs: Vec<BlockchainLogEntry>,
}

impl AuditLog {
    /// Apply the event type filter, then count what is left
    pub fn new(entries: Vec<BlockchainLogEntry>, wanted: &[EventType]) -> Self {
        let logs = filter_by_event_type(entries, wanted);
        tracing::debug!("{} audit log entries after filtering", logs.len());
        Self {
            summary: EventSummary::from_entries(&logs),
            logs,
        }
    }
}
