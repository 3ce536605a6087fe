//! Task status and per-status histograms.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Completion state of a task.
///
/// Declaration order is the display order used by reports and charts.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Complete,
    InProgress,
    NotStarted,
    Blocked,
    #[default]
    Unknown,
}

impl Status {
    pub const ALL: [Status; 5] = [
        Status::Complete,
        Status::InProgress,
        Status::NotStarted,
        Status::Blocked,
        Status::Unknown,
    ];

    /// Progress stage used by roll-ups: lower means less advanced.
    ///
    /// `Unknown` sits below `NotStarted` because nothing has been reported yet.
    /// `Blocked` never reaches stage comparison since it dominates every roll-up.
    pub fn stage(self) -> u8 {
        match self {
            Status::Unknown => 0,
            Status::NotStarted => 1,
            Status::InProgress | Status::Blocked => 2,
            Status::Complete => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Complete => "complete",
            Status::InProgress => "in_progress",
            Status::NotStarted => "not_started",
            Status::Blocked => "blocked",
            Status::Unknown => "unknown",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Status::Complete => "Complete",
            Status::InProgress => "In progress",
            Status::NotStarted => "Not started",
            Status::Blocked => "Blocked",
            Status::Unknown => "Unknown",
        }
    }

    /// Fill colour hint for renderers.
    pub fn color(self) -> &'static str {
        match self {
            Status::Complete => "#008000",
            Status::InProgress => "royalblue",
            Status::NotStarted => "lightsteelblue",
            Status::Blocked => "#d9534f",
            Status::Unknown => "#c8c8c8",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    /// Accepts the canonical names with `_`, `-` or space separators, plus the
    /// vocabulary used in the status sheets (`done`, `committed`, `waiting`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_lowercase().replace(['-', ' '], "_");
        match norm.as_str() {
            "" | "unknown" => Ok(Status::Unknown),
            "complete" | "completed" | "done" => Ok(Status::Complete),
            "in_progress" | "committed" | "commited" => Ok(Status::InProgress),
            "not_started" | "waiting" | "ready" | "todo" => Ok(Status::NotStarted),
            "blocked" => Ok(Status::Blocked),
            _ => Err(format!(
                "invalid status: {:?} (expected complete, in_progress, not_started, blocked or unknown)",
                s.trim()
            )),
        }
    }
}

/// Number of tasks per status. Every status is always present, possibly as 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StatusCounts(BTreeMap<Status, usize>);

impl Default for StatusCounts {
    fn default() -> Self {
        Self(Status::ALL.iter().map(|s| (*s, 0)).collect())
    }
}

impl StatusCounts {
    pub fn from_statuses(statuses: impl IntoIterator<Item = Status>) -> Self {
        let mut counts = Self::default();
        for s in statuses {
            counts.add(s);
        }
        counts
    }

    pub fn add(&mut self, status: Status) {
        *self.0.entry(status).or_default() += 1;
    }

    pub fn get(&self, status: Status) -> usize {
        self.0.get(&status).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    /// Statuses with a non-zero count, in display order.
    pub fn present(&self) -> impl Iterator<Item = Status> + '_ {
        self.0.iter().filter(|(_, n)| **n > 0).map(|(s, _)| *s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_canonical_and_legacy_names() {
        assert_eq!("Complete".parse::<Status>(), Ok(Status::Complete));
        assert_eq!("done".parse::<Status>(), Ok(Status::Complete));
        assert_eq!("In Progress".parse::<Status>(), Ok(Status::InProgress));
        assert_eq!("in-progress".parse::<Status>(), Ok(Status::InProgress));
        assert_eq!("commited".parse::<Status>(), Ok(Status::InProgress));
        assert_eq!("waiting".parse::<Status>(), Ok(Status::NotStarted));
        assert_eq!("BLOCKED".parse::<Status>(), Ok(Status::Blocked));
        assert_eq!("  ".parse::<Status>(), Ok(Status::Unknown));
        assert!("finished-ish".parse::<Status>().is_err());
    }

    #[test]
    fn default_is_unknown() {
        assert_eq!(Status::default(), Status::Unknown);
    }

    #[test]
    fn counts_cover_every_status() {
        let counts = StatusCounts::from_statuses([Status::Blocked, Status::Blocked, Status::Complete]);
        assert_eq!(counts.get(Status::Blocked), 2);
        assert_eq!(counts.get(Status::Unknown), 0);
        assert_eq!(counts.total(), 3);
        assert_eq!(
            counts.present().collect::<Vec<_>>(),
            vec![Status::Complete, Status::Blocked]
        );

        let json = serde_json::to_value(&counts).unwrap();
        assert_eq!(json["blocked"], 2);
        assert_eq!(json["not_started"], 0);
    }
}
