use near_sdk::borsh::{self, BorshDeserialize, BorshSerialize};

/// `true` once `timeout_ms` has passed since `started_at_ms`.
pub fn has_timed_out(now_ms: u64, started_at_ms: u64, timeout_ms: u64) -> bool {
    now_ms.saturating_sub(started_at_ms) >= timeout_ms
}

/// Timestamps written by phase transitions, in milliseconds.
#[derive(BorshDeserialize, BorshSerialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct RoundTiming {
    /// Last successful payout or restart; the interval gate counts from here.
    pub last_completed_at: u64,
    /// Start of the current drawing; the timeout gate counts from here.
    pub drawing_started_at: Option<u64>,
}

impl RoundTiming {
    pub fn new(now_ms: u64) -> Self {
        Self { last_completed_at: now_ms, drawing_started_at: None }
    }

    pub fn interval_elapsed(&self, now_ms: u64, interval_ms: u64) -> bool {
        now_ms.saturating_sub(self.last_completed_at) >= interval_ms
    }

    pub fn draw_deadline(&self, timeout_ms: u64) -> Option<u64> {
        self.drawing_started_at
            .map(|started| started.saturating_add(timeout_ms))
    }

    pub fn draw_timed_out(&self, now_ms: u64, timeout_ms: u64) -> bool {
        self.drawing_started_at
            .map_or(false, |started| has_timed_out(now_ms, started, timeout_ms))
    }

    pub fn start_drawing(&mut self, now_ms: u64) {
        self.drawing_started_at = Some(now_ms);
    }

    pub fn complete(&mut self, now_ms: u64) {
        self.last_completed_at = now_ms;
        self.drawing_started_at = None;
    }
}
