use chrono::{DateTime, Duration, Utc};

/// The span of start times, relative to "now", that qualify an event for a reminder.
///
/// Both edges are inclusive: an event starting exactly at `now` or exactly at
/// `now + lookahead` is due. Events that already started are never due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookaheadWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl LookaheadWindow {
    pub fn starting_at(now: DateTime<Utc>, lookahead: Duration) -> Self {
        let lookahead = lookahead.max(Duration::zero());
        Self {
            start: now,
            end: now + lookahead,
        }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn contains(&self, start_time: DateTime<Utc>) -> bool {
        self.start <= start_time && start_time <= self.end
    }
}
