//! Structured log events emitted while resolving advice.

mod common;

use std::{
    io::{self, Write},
    sync::{Arc, Mutex},
};

use common::{Maze, THREAT_ROOM, extractor};
use multi_advice::{
    Direction, PolicyFusionEngine,
    advice::{AdviceRecord, AdvisorPolicyResolver, InMemoryAdvisorSource},
    q_learning::QTable,
};

/// Writer appending formatted events to a shared buffer.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_abstaining_advisor_logs_warning() {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter("multi_advice=warn")
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();

    let records = vec![
        vec![AdviceRecord::new("feature", "Near-food", "value", "1")],
        vec![AdviceRecord::new("feature", "Facing-ghost", "value", "1")],
    ];
    let resolver = AdvisorPolicyResolver::new(Arc::new(InMemoryAdvisorSource::new(records)), extractor())
        .with_count(2);
    let engine = PolicyFusionEngine::new(resolver);
    let state = Maze::parse(&THREAT_ROOM).facing(Direction::East);
    let mut table: QTable<Maze> = QTable::new();

    let outcome = tracing::subscriber::with_default(subscriber, || engine.fuse(&mut table, &state))
        .unwrap();
    assert_eq!(outcome.advisor_weights, vec![None, Some(1.0)]);

    let logs = captured.contents();
    assert!(logs.contains("WARN"), "{logs}");
    assert!(logs.contains("advisor abstains"), "{logs}");
    assert!(logs.contains("Near-food"), "{logs}");
    // Debug-level decision events stay below the filter.
    assert!(!logs.contains("fused policy"), "{logs}");
}
