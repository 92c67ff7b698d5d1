//! Metrics for model operations
//!
//! Metric names are plain dotted strings. Recording without an installed
//! recorder is a no-op, so library code records unconditionally.

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use std::time::Instant;

/// Metric names used by the model
pub mod names {
    pub const USERS_ADDED: &str = "model.users.added";
    pub const CONVERSATIONS_ADDED: &str = "model.conversations.added";
    pub const MESSAGES_ADDED: &str = "model.messages.added";
    pub const MESSAGES_APPENDED: &str = "model.messages.appended";
    pub const BOTS_ADDED: &str = "model.bots.added";
    pub const PERMISSION_TOGGLED: &str = "model.permission.toggled";
    pub const PERMISSION_DENIED: &str = "model.permission.denied";
    pub const STATUS_UPDATES: &str = "model.status.updates";
    pub const USERS_TOTAL: &str = "model.users.total";
    pub const CONVERSATIONS_TOTAL: &str = "model.conversations.total";
    pub const STATUS_DURATION: &str = "model.status.duration_ms";
}

/// Initialize metrics with descriptions
pub fn init_metrics() {
    describe_counter!(names::USERS_ADDED, "Number of users added");
    describe_counter!(names::CONVERSATIONS_ADDED, "Number of conversations added");
    describe_counter!(names::MESSAGES_ADDED, "Number of messages added");
    describe_counter!(names::MESSAGES_APPENDED, "Number of messages appended to a conversation");
    describe_counter!(names::BOTS_ADDED, "Number of bots attached to conversations");
    describe_counter!(names::PERMISSION_TOGGLED, "Accepted permission toggles");
    describe_counter!(names::PERMISSION_DENIED, "Rejected permission toggles and posts");
    describe_counter!(names::STATUS_UPDATES, "Number of status updates served");

    describe_gauge!(names::USERS_TOTAL, "Current number of users");
    describe_gauge!(names::CONVERSATIONS_TOTAL, "Current number of conversations");

    describe_histogram!(names::STATUS_DURATION, "Status update duration in milliseconds");
}

/// Record a counter metric
pub fn record_counter(name: &'static str, value: u64) {
    counter!(name).increment(value);
}

/// Record a gauge metric
pub fn record_gauge(name: &'static str, value: f64) {
    gauge!(name).set(value);
}

/// Record a histogram metric
pub fn record_histogram(name: &'static str, value: f64) {
    histogram!(name).record(value);
}

/// Timer for measuring operation duration
pub struct Timer {
    name: &'static str,
    start: Instant,
}

impl Timer {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            start: Instant::now(),
        }
    }

    /// Stop the timer and record the duration
    pub fn stop(self) {
        record_histogram(self.name, self.start.elapsed().as_secs_f64() * 1000.0);
    }
}
