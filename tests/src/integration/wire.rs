//! # Wire Format Flows
//!
//! Drives qc-18-tx-lifecycle from the JSON form of chain-head events and
//! checks the JSON form of the callbacks it emits.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use qc_18_tx_lifecycle::{
        InMemoryChain, LifecycleConfig, LifecycleError, RecordingObserver, SettlementEngine,
        TxLifecycleApi,
    };
    use serde_json::{json, Value};
    use shared_types::IncomingEvent;

    const SCRIPT: &str = r#"[
        {"type": "newTransaction", "value": "0xaa"},
        {"type": "newTransaction", "value": "0xbb"},
        {"type": "newBlock", "blockHash": "0x01"},
        {"type": "newBlock", "blockHash": "0x02", "parent": "0x01"},
        {"type": "newBlock", "blockHash": "0x02f", "parent": "0x01"},
        {"type": "finalized", "blockHash": "0x02"}
    ]"#;

    fn run_script(chain: InMemoryChain, script: &str) -> (Vec<Value>, Arc<InMemoryChain>) {
        let chain = Arc::new(chain);
        let observer = Arc::new(RecordingObserver::new());
        let mut engine = SettlementEngine::new(
            LifecycleConfig::for_testing(),
            Arc::clone(&chain),
            Arc::clone(&observer),
        );

        let events: Vec<IncomingEvent> = serde_json::from_str(script).unwrap();
        for event in events {
            engine.handle_event(event).unwrap();
        }

        let emitted = observer
            .notifications()
            .iter()
            .map(|n| serde_json::to_value(n).unwrap())
            .collect();
        (emitted, chain)
    }

    #[test]
    fn test_script_produces_expected_callbacks() {
        let chain = InMemoryChain::new()
            .with_block("0x02", &["0xbb", "0xaa"])
            .with_block("0x02f", &["0xaa"])
            .with_invalid("0x02", "0xbb");

        let (emitted, chain) = run_script(chain, SCRIPT);
        assert_eq!(
            emitted,
            vec![
                json!({"event": "settled", "tx": "0xaa",
                       "state": {"blockHash": "0x02", "type": "valid", "successful": true}}),
                json!({"event": "settled", "tx": "0xbb",
                       "state": {"blockHash": "0x02", "type": "invalid"}}),
                json!({"event": "done", "tx": "0xaa",
                       "state": {"blockHash": "0x02", "type": "valid", "successful": true}}),
                json!({"event": "done", "tx": "0xbb",
                       "state": {"blockHash": "0x02", "type": "invalid"}}),
            ]
        );

        let unpinned: Vec<String> = chain.unpinned().into_iter().map(|b| b.0).collect();
        assert_eq!(unpinned, vec!["0x01", "0x02f"]);
    }

    #[test]
    fn test_event_round_trips_through_json() {
        let event = IncomingEvent::new_block("0x02", Some("0x01"));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(
            json,
            json!({"type": "newBlock", "blockHash": "0x02", "parent": "0x01"})
        );
    }

    #[test]
    fn test_finality_for_unannounced_block_is_rejected() {
        let chain = Arc::new(InMemoryChain::new());
        let observer = Arc::new(RecordingObserver::new());
        let mut engine =
            SettlementEngine::new(LifecycleConfig::for_testing(), chain, Arc::clone(&observer));

        let event: IncomingEvent =
            serde_json::from_str(r#"{"type": "finalized", "blockHash": "0xdead"}"#).unwrap();
        let err = engine.handle_event(event).unwrap_err();

        assert!(matches!(err, LifecycleError::UnknownBlock { .. }));
        assert_eq!(err.to_string(), "Unknown block: 0xdead");
        assert!(observer.is_empty());
    }

    #[test]
    fn test_unknown_event_type_fails_to_parse() {
        let parsed = serde_json::from_str::<IncomingEvent>(r#"{"type": "reorg", "depth": 3}"#);
        assert!(parsed.is_err());
    }
}
