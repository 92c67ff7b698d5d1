//! Span helpers for model operations

use crate::core_store::model::{EntityId, EntityKind, Permission};
use std::time::Instant;
use tracing::{span, Level, Span};
use uuid::Uuid;

/// Correlation ids for a group of related operations
#[derive(Debug, Clone)]
pub struct TraceContext {
    pub trace_id: String,
    pub span_id: String,
    pub parent_span_id: Option<String>,
}

impl TraceContext {
    pub fn new() -> Self {
        Self {
            trace_id: Uuid::new_v4().to_string(),
            span_id: Uuid::new_v4().to_string(),
            parent_span_id: None,
        }
    }

    /// Context for a nested operation within the same trace
    pub fn child(&self) -> Self {
        Self {
            trace_id: self.trace_id.clone(),
            span_id: Uuid::new_v4().to_string(),
            parent_span_id: Some(self.span_id.clone()),
        }
    }
}

impl Default for TraceContext {
    fn default() -> Self {
        Self::new()
    }
}

/// A timed span around one operation
pub struct TracedOperation {
    span: Span,
    start: Instant,
}

impl TracedOperation {
    pub fn new(operation_name: &str) -> Self {
        let span = span!(Level::DEBUG, "operation", name = operation_name);

        Self {
            span,
            start: Instant::now(),
        }
    }

    pub fn with_context(operation_name: &str, ctx: &TraceContext) -> Self {
        let span = span!(
            Level::DEBUG,
            "operation",
            name = operation_name,
            trace_id = %ctx.trace_id,
            span_id = %ctx.span_id,
            parent_span_id = ?ctx.parent_span_id
        );

        Self {
            span,
            start: Instant::now(),
        }
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn record_event(&self, event: &str) {
        tracing::debug!(parent: &self.span, event = event);
    }

    pub fn record_error(&self, error: &str) {
        tracing::warn!(parent: &self.span, error = error);
    }

    /// Complete the operation and record its duration
    pub fn complete(self) {
        tracing::debug!(
            parent: &self.span,
            duration_ms = self.start.elapsed().as_millis() as u64,
            "operation completed"
        );
    }
}

/// Registry insertions
pub mod registry {
    use super::*;

    pub fn trace_insert(kind: EntityKind, id: &EntityId) -> TracedOperation {
        let op = TracedOperation::new("registry_insert");
        tracing::debug!(parent: &op.span, kind = %kind, id = %id);
        op
    }

    pub fn trace_append(conversation: &EntityId, message: &EntityId) -> TracedOperation {
        let op = TracedOperation::new("registry_append");
        tracing::debug!(parent: &op.span, conversation = %conversation, message = %message);
        op
    }
}

/// Permission toggles
pub mod permission {
    use super::*;

    pub fn trace_toggle(
        conversation: &EntityId,
        actor: &EntityId,
        target: &EntityId,
        requested: Permission,
    ) -> TracedOperation {
        let op = TracedOperation::new("permission_toggle");
        tracing::debug!(
            parent: &op.span,
            conversation = %conversation,
            actor = %actor,
            target = %target,
            requested = %requested
        );
        op
    }
}

/// Status updates
pub mod activity {
    use super::*;

    pub fn trace_status_update(user: &EntityId) -> TracedOperation {
        let op = TracedOperation::new("status_update");
        tracing::debug!(parent: &op.span, user = %user);
        op
    }
}
