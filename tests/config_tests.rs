//! Process-wide configuration. Lives in its own test binary because
//! installing a config is a one-shot, process-wide effect.

mod test_data_gen;

use lazyq::lazyq_core::metrics::materialize_events;
use lazyq::prelude::*;
use test_data_gen::{forward_only, sample};

#[test]
fn test_installed_config_disables_backward_paths() {
    // Building pipelines must not read the configuration.
    let reversed = sample().apply(reverse());
    let sorted = sample().apply(order_by(|x: &i32| *x));
    let _cursor = reversed.cursor();

    let cfg = QueryConfig {
        backward_paths: false,
        trace_materialization: false,
    };
    cfg.clone().install().expect("first install succeeds");
    assert_eq!(QueryConfig::current(), &cfg);

    let again = QueryConfig::default().install();
    assert!(matches!(again, Err(Error::Config(_))));
    assert_eq!(QueryConfig::current(), &cfg);

    assert_eq!(reversed.to_vec(), vec![6, 2, 9, 5, 1, 4, 1, 3]);

    // Silenced tracing emits no materialize events.
    let before = materialize_events();
    assert_eq!(sorted.to_vec(), vec![1, 1, 2, 3, 4, 5, 6, 9]);
    assert_eq!(materialize_events(), before);

    // Forward fallbacks give the same answers on backward-capable sources.
    let buffered = sample().into_seq();
    assert!(buffered.is_bidirectional());
    assert_eq!(last(&buffered), Ok(6));
    assert_eq!(last_if(&buffered, |x: &i32| *x == 1), Ok(1));
    assert_eq!(
        buffered.clone().apply(reverse()).to_vec(),
        vec![6, 2, 9, 5, 1, 4, 1, 3]
    );
    assert_eq!(
        forward_only(sample()).apply(reverse()).apply(reverse()).to_vec(),
        sample()
    );

    let json = serde_json::to_string(QueryConfig::current()).expect("serialize");
    let back: QueryConfig = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, cfg);
}
