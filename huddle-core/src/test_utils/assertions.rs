//! Custom assertions for model state
//!
//! Each helper panics with the surrounding state on failure so a failing
//! test shows what the model actually held.

use crate::core_space::{ErrorKind, Model, ModelResult, StatusReport};
use crate::core_store::model::{EntityId, Permission};
use std::fmt::Debug;

/// Assert that a model call failed with the given kind and return the error
pub fn assert_error_kind<T: Debug>(result: ModelResult<T>, kind: ErrorKind) {
    match result {
        Ok(value) => panic!("Expected {:?} error, got Ok({:?})", kind, value),
        Err(e) => assert_eq!(e.kind(), kind, "unexpected error: {}", e),
    }
}

/// Assert the exact permission bits `user` holds in `conversation`
pub fn assert_permission(model: &Model, user: &EntityId, conversation: &EntityId, bits: u8) {
    let actual = model
        .permission(user, conversation)
        .unwrap_or_else(|e| panic!("Permission lookup failed: {}", e));
    assert_eq!(
        actual,
        Permission::from_bits_truncate(bits),
        "permission of {} in {}",
        user,
        conversation
    );
}

/// Assert the unread count reported for a watched conversation
pub fn assert_unread(report: &StatusReport, conversation: &EntityId, expected: usize) {
    match report.conversation(conversation) {
        Some(activity) => assert_eq!(
            activity.new_messages, expected,
            "unread count for {}",
            conversation
        ),
        None => panic!("Conversation {} missing from report:\n{}", conversation, report),
    }
}

/// Assert that the rendered report contains `line`
pub fn assert_report_line(report: &StatusReport, line: &str) {
    let rendered = report.to_string();
    if !rendered.lines().any(|l| l == line) {
        panic!("Expected line {:?} in report:\n{}", line, rendered);
    }
}

/// Assert that no rendered line mentions `needle`
pub fn assert_report_omits(report: &StatusReport, needle: &str) {
    let rendered = report.to_string();
    if rendered.contains(needle) {
        panic!("Expected report without {:?}:\n{}", needle, rendered);
    }
}
