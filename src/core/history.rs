//! Bounded log of the transitions a machine has performed.
//!
//! This is a diagnostic record. It plays no part in dispatch and the
//! machine never re-enters a state because of it.

use super::state::StateId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Record of a single transition.
///
/// `None` on either side means "no state": `from: None` is the transition
/// performed by `enter`, `to: None` the one performed by `exit`.
///
/// # Example
///
/// ```rust
/// use hsm::core::StateTransition;
/// use chrono::Utc;
///
/// let transition = StateTransition {
///     from: None,
///     to: Some(0),
///     timestamp: Utc::now(),
/// };
/// assert!(transition.is_activation());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateTransition {
    /// Id of the state that was exited
    pub from: Option<StateId>,
    /// Id of the state that was entered
    pub to: Option<StateId>,
    /// When the transition occurred
    pub timestamp: DateTime<Utc>,
}

impl StateTransition {
    pub fn is_activation(&self) -> bool {
        self.from.is_none() && self.to.is_some()
    }

    pub fn is_deactivation(&self) -> bool {
        self.from.is_some() && self.to.is_none()
    }
}

/// Ordered history of transitions, keeping at most `limit` entries.
///
/// A limit of zero disables recording entirely.
///
/// # Example
///
/// ```rust
/// use hsm::core::{StateHistory, StateTransition};
/// use chrono::Utc;
///
/// let mut history = StateHistory::with_limit(2);
/// for (from, to) in [(None, Some(0)), (Some(0), Some(1)), (Some(1), Some(2))] {
///     history.record(StateTransition { from, to, timestamp: Utc::now() });
/// }
///
/// // Oldest entry was evicted.
/// assert_eq!(history.get_path(), vec![Some(0), Some(1), Some(2)]);
/// assert_eq!(history.transitions().len(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StateHistory {
    limit: usize,
    transitions: VecDeque<StateTransition>,
}

impl StateHistory {
    /// History that records nothing.
    pub fn new() -> Self {
        Self::with_limit(0)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit,
            transitions: VecDeque::with_capacity(limit.min(64)),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn is_enabled(&self) -> bool {
        self.limit > 0
    }

    /// Append a transition, evicting the oldest entry once full.
    pub fn record(&mut self, transition: StateTransition) {
        if self.limit == 0 {
            return;
        }
        if self.transitions.len() == self.limit {
            self.transitions.pop_front();
        }
        self.transitions.push_back(transition);
    }

    /// States traversed: the `from` of the oldest retained transition,
    /// then the `to` of each transition in order.
    pub fn get_path(&self) -> Vec<Option<StateId>> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.front() {
            path.push(first.from);
        }
        path.extend(self.transitions.iter().map(|t| t.to));
        path
    }

    /// Time between the oldest and newest retained transitions.
    pub fn duration(&self) -> Option<Duration> {
        let first = self.transitions.front()?;
        let last = self.transitions.back()?;
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn transitions(&self) -> Vec<&StateTransition> {
        self.transitions.iter().collect()
    }

    pub fn last(&self) -> Option<&StateTransition> {
        self.transitions.back()
    }

    pub fn clear(&mut self) {
        self.transitions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(from: Option<StateId>, to: Option<StateId>) -> StateTransition {
        StateTransition {
            from,
            to,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn disabled_history_records_nothing() {
        let mut history = StateHistory::new();
        history.record(step(None, Some(0)));

        assert!(!history.is_enabled());
        assert!(history.transitions().is_empty());
        assert!(history.get_path().is_empty());
        assert!(history.duration().is_none());
    }

    #[test]
    fn path_follows_transitions() {
        let mut history = StateHistory::with_limit(8);
        history.record(step(None, Some(0)));
        history.record(step(Some(0), Some(1)));
        history.record(step(Some(1), None));

        assert_eq!(history.get_path(), vec![None, Some(0), Some(1), None]);
        assert!(history.transitions()[0].is_activation());
        assert!(history.last().is_some_and(StateTransition::is_deactivation));
    }

    #[test]
    fn limit_evicts_oldest_first() {
        let mut history = StateHistory::with_limit(3);
        for id in 0..10 {
            history.record(step(Some(id), Some(id + 1)));
        }

        let froms: Vec<_> = history.transitions().iter().map(|t| t.from).collect();
        assert_eq!(froms, vec![Some(7), Some(8), Some(9)]);
    }

    #[test]
    fn duration_spans_first_to_last() {
        let start = Utc::now();
        let mut history = StateHistory::with_limit(4);
        history.record(StateTransition {
            from: None,
            to: Some(0),
            timestamp: start,
        });
        history.record(StateTransition {
            from: Some(0),
            to: Some(1),
            timestamp: start + chrono::Duration::seconds(3),
        });

        assert_eq!(history.duration(), Some(Duration::from_secs(3)));
    }

    #[test]
    fn clear_keeps_limit() {
        let mut history = StateHistory::with_limit(2);
        history.record(step(None, Some(0)));
        history.clear();

        assert!(history.transitions().is_empty());
        assert_eq!(history.limit(), 2);
    }

    #[test]
    fn history_serializes_roundtrip() {
        let mut history = StateHistory::with_limit(4);
        history.record(step(None, Some(0)));
        history.record(step(Some(0), Some(2)));

        let json = serde_json::to_string(&history).unwrap();
        let restored: StateHistory = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, history);
    }
}
