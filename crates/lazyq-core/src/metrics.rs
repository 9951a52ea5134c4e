//! Metrics/tracing hooks.
//!
//! This module purposefully avoids pulling heavy telemetry stacks.
//! With the `tracing` feature off `emit_span` compiles to nothing; the
//! per-thread event count is kept either way.

use std::cell::Cell;

use crate::config::QueryConfig;
use crate::id::StateId;

thread_local! {
    static MATERIALIZE_EVENTS: Cell<u64> = Cell::new(0);
}

#[cfg(feature = "tracing")]
pub fn emit_span(event: &str, key_values: &[(&str, String)]) {
    let span = tracing::trace_span!("lazyq", event = %event);
    let _entered = span.enter();
    for (k, v) in key_values {
        tracing::trace!(%event, %k, %v, "metric");
    }
}

#[cfg(not(feature = "tracing"))]
pub fn emit_span(_event: &str, _key_values: &[(&str, String)]) { /* no-op */
}

/// Report that the application `id` of operator `op` built its shared state.
pub fn record_materialization(op: &'static str, id: StateId, rows: usize) {
    if !QueryConfig::current().trace_materialization {
        return;
    }
    MATERIALIZE_EVENTS.with(|n| n.set(n.get() + 1));
    emit_span(
        "materialize",
        &[
            ("op", op.to_string()),
            ("state", id.get().to_string()),
            ("rows", rows.to_string()),
        ],
    );
}

/// `materialize` events emitted so far on the calling thread.
///
/// Applications are single-threaded, so the delta around a pipeline run is
/// the number of shared states it built.
pub fn materialize_events() -> u64 {
    MATERIALIZE_EVENTS.with(Cell::get)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_events_per_thread() {
        let before = materialize_events();
        record_materialization("test", StateId::next(), 3);
        record_materialization("test", StateId::next(), 0);
        let expected = if QueryConfig::current().trace_materialization { 2 } else { 0 };
        assert_eq!(materialize_events() - before, expected);

        let other = std::thread::spawn(materialize_events).join().unwrap();
        assert_eq!(other, 0);
    }
}
