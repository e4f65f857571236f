//! # Settlement Flows
//!
//! End-to-end scenarios for qc-18-tx-lifecycle driven through the
//! `TxLifecycleApi` port, with the logging decorator in front of the
//! recording observer as a deployment would wire it.
//!
//! ## Scenarios
//!
//! 1. **Sparse finality**: one notification completes a whole chain segment
//! 2. **Fork re-attribution**: completion follows the finalized sibling
//! 3. **Unpinning**: forks and superseded ancestors released, head kept
//! 4. **Idempotent re-delivery**: duplicates cost no callbacks or queries

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use qc_18_tx_lifecycle::{
        InMemoryChain, LifecycleConfig, LoggingObserver, RecordingObserver, SettlementEngine,
        TxLifecycleApi, TxPhase,
    };
    use shared_types::{BlockHash, IncomingEvent, SettledState, SettlementOutcome, TxId};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    type Engine = SettlementEngine<InMemoryChain, LoggingObserver<RecordingObserver>>;

    fn create_engine(chain: InMemoryChain) -> (Engine, Arc<InMemoryChain>) {
        let chain = Arc::new(chain);
        let observer = Arc::new(LoggingObserver::new(RecordingObserver::new()));
        let engine = SettlementEngine::new(LifecycleConfig::for_testing(), Arc::clone(&chain), observer);
        (engine, chain)
    }

    fn recorder(engine: &Engine) -> &RecordingObserver {
        engine.observer().inner()
    }

    fn feed(engine: &mut Engine, events: Vec<IncomingEvent>) {
        for event in events {
            engine.handle_event(event).expect("event should be accepted");
        }
    }

    fn h(s: &str) -> BlockHash {
        BlockHash::from(s)
    }

    /// ```text
    /// G ─ A1 ─ A2 ─ A3 ─ A4
    ///   │    └ F2 ─ F3
    ///   └ E1
    /// ```
    fn forked_chain() -> InMemoryChain {
        InMemoryChain::new()
            .with_block("A1", &["tx-1"])
            .with_block("A2", &["tx-3", "tx-2"])
            .with_block("A3", &["tx-4"])
            .with_block("F2", &["tx-4", "tx-5"])
            .with_block("F3", &["tx-6"])
            .with_block("E1", &["tx-7"])
            .with_failed("A2", "tx-2")
            .with_invalid("F2", "tx-5")
    }

    fn forked_events() -> Vec<IncomingEvent> {
        let mut events: Vec<IncomingEvent> = (1..=7)
            .map(|i| IncomingEvent::new_transaction(format!("tx-{i}").as_str()))
            .collect();
        events.extend([
            IncomingEvent::new_block("G", None),
            IncomingEvent::new_block("A1", Some("G")),
            IncomingEvent::new_block("E1", Some("G")),
            IncomingEvent::new_block("F2", Some("A1")),
            IncomingEvent::new_block("A2", Some("A1")),
            IncomingEvent::new_block("F3", Some("F2")),
            IncomingEvent::new_block("A3", Some("A2")),
            IncomingEvent::new_block("A4", Some("A3")),
        ]);
        events
    }

    // =============================================================================
    // SCENARIOS
    // =============================================================================

    #[test]
    fn test_sparse_finality_completes_segment_in_arrival_order() {
        let (mut engine, _chain) = create_engine(forked_chain());
        feed(&mut engine, forked_events());

        // tx-4 and tx-5 settled first on the F2 fork.
        assert_eq!(
            recorder(&engine).settled_ids(),
            vec!["tx-1", "tx-7", "tx-4", "tx-5", "tx-2", "tx-3", "tx-6"]
        );
        recorder(&engine).take();

        feed(&mut engine, vec![IncomingEvent::finalized("A3")]);

        // tx-4 re-attributed to A3; tx-5, tx-6 and tx-7 lost their forks.
        assert_eq!(recorder(&engine).done_ids(), vec!["tx-1", "tx-2", "tx-3", "tx-4"]);
        let done = recorder(&engine).done();
        assert_eq!(
            done[1].1,
            SettledState::new(h("A2"), SettlementOutcome::Valid { successful: false })
        );
        assert_eq!(done[3].1.block_hash, h("A3"));

        for tx in ["tx-5", "tx-6", "tx-7"] {
            assert_eq!(engine.tx_phase(&TxId::from(tx)), Some(TxPhase::Pending));
        }
        let stats = engine.stats();
        assert_eq!((stats.pending, stats.settled, stats.done), (3, 0, 4));
    }

    #[test]
    fn test_unpinning_keeps_finalized_head_and_descendants() {
        let (mut engine, chain) = create_engine(forked_chain());
        feed(&mut engine, forked_events());
        feed(&mut engine, vec![IncomingEvent::finalized("A3")]);

        let mut unpinned: Vec<String> = chain.unpinned().into_iter().map(|b| b.0).collect();
        unpinned.sort();
        assert_eq!(unpinned, vec!["A1", "A2", "E1", "F2", "F3", "G"]);

        assert!(engine.is_block_pinned(&h("A3")));
        assert!(engine.is_block_pinned(&h("A4")));
        assert_eq!(engine.finalized_block(), Some(h("A3")));

        // A child of an unpinned fork block is released on arrival.
        feed(&mut engine, vec![IncomingEvent::new_block("F4", Some("F3"))]);
        assert!(chain.is_unpinned("F4"));
        assert_eq!(chain.body_fetches("F4"), 0);
    }

    #[test]
    fn test_stranded_transaction_completes_on_later_block() {
        let (mut engine, chain) = create_engine(forked_chain());
        feed(&mut engine, forked_events());
        feed(&mut engine, vec![IncomingEvent::finalized("A3")]);
        recorder(&engine).take();

        chain.insert_block("A5", &["tx-6"]);
        feed(
            &mut engine,
            vec![
                IncomingEvent::new_block("A5", Some("A4")),
                IncomingEvent::finalized("A5"),
            ],
        );

        // Settlement already announced on F3; only completion fires.
        let notifications = recorder(&engine).notifications();
        assert_eq!(notifications.len(), 1);
        assert!(notifications[0].is_done());
        assert_eq!(notifications[0].tx().as_str(), "tx-6");
        assert_eq!(notifications[0].state().block_hash, h("A5"));
    }

    #[test]
    fn test_idempotent_redelivery() {
        let (mut engine, chain) = create_engine(forked_chain());
        feed(&mut engine, forked_events());
        feed(&mut engine, vec![IncomingEvent::finalized("A3")]);

        let calls = chain.calls();
        let seen = recorder(&engine).len();

        for event in [
            IncomingEvent::new_transaction("tx-1"),
            IncomingEvent::new_block("A2", Some("A1")),
            IncomingEvent::finalized("A3"),
            IncomingEvent::finalized("A1"),
            IncomingEvent::finalized("G"),
        ] {
            let outcome = engine.handle_event(event).unwrap();
            assert!(outcome.is_noop());
        }

        assert_eq!(chain.calls(), calls);
        assert_eq!(recorder(&engine).len(), seen);
    }

    #[test]
    fn test_each_block_body_fetched_once() {
        let (mut engine, chain) = create_engine(forked_chain());
        feed(&mut engine, forked_events());
        feed(&mut engine, vec![IncomingEvent::finalized("A2")]);
        feed(&mut engine, vec![IncomingEvent::finalized("A4")]);

        for block in ["G", "A1", "A2", "A3", "E1", "F2", "F3"] {
            assert!(chain.body_fetches(block) <= 1, "{block} fetched twice");
        }
    }
}
