//! Dispatch tracing
//!
//! A [`Tracer`] observes every committed dispatch: it sees the action, the
//! state the reducer produced and how many listeners are about to be
//! notified. It runs after the state is committed and before listeners.

use crate::action::Action;
use crate::value::Value;

/// Observer called after each committed dispatch
pub trait Tracer {
    fn trace(&self, action: &Action, state: &Value, listeners: usize);
}

/// LogTracer - logs every dispatch through the `log` facade
pub struct LogTracer {
    label: String,
}

impl LogTracer {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl Default for LogTracer {
    fn default() -> Self {
        Self::new("store")
    }
}

impl Tracer for LogTracer {
    fn trace(&self, action: &Action, state: &Value, listeners: usize) {
        log::debug!(
            "[{}] Action: {} -> State: {} ({} listeners)",
            self.label,
            action,
            state,
            listeners
        );
    }
}

/// Tracer that ignores every dispatch
pub struct NoopTracer;

impl Tracer for NoopTracer {
    fn trace(&self, _action: &Action, _state: &Value, _listeners: usize) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_tracer() {
        let tracer = LogTracer::default();
        assert_eq!(tracer.label, "store");

        tracer.trace(&Action::new("INC"), &Value::from(1), 0);
    }

    #[test]
    fn test_noop_tracer() {
        NoopTracer.trace(&Action::new("INC"), &Value::Null, 3);
    }
}
