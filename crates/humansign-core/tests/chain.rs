use humansign_canonical::GENESIS_HASH;
use humansign_core::{
    Block, Chain, ChainBuilder, ChainError, ChainFlattener, Event, HashChainVerifier,
};
use serde_json::json;

/// Builds `blocks` blocks of `per_block` keystrokes, 100ms apart.
fn make_chain(blocks: usize, per_block: usize) -> Chain {
    let mut builder = ChainBuilder::new();
    let mut ts = 1_000;
    for _ in 0..blocks {
        let events = (0..per_block)
            .map(|_| {
                ts += 100;
                Event::new(ts, "keydown")
            })
            .collect();
        builder.push_events(events).unwrap();
    }
    builder.finish()
}

fn verify(chain: Chain) -> Result<(), ChainError> {
    HashChainVerifier::default().verify(chain).map(|_| ())
}

#[test]
fn test_well_formed_chains_of_any_length_verify() {
    for n in 1..=8 {
        assert_eq!(verify(make_chain(n, 4)), Ok(()), "chain of {} blocks", n);
    }
}

#[test]
fn test_mutated_event_timestamp_is_block_hash_mismatch() {
    for target in 0..4 {
        let mut blocks = make_chain(4, 3).into_blocks();
        blocks[target].events[1].timestamp += 1;
        assert_eq!(
            verify(Chain::new(blocks)),
            Err(ChainError::BlockHashMismatch { index: target })
        );
    }
}

#[test]
fn test_mutated_event_kind_is_block_hash_mismatch() {
    for target in 0..4 {
        let mut blocks = make_chain(4, 3).into_blocks();
        blocks[target].events[0].kind = "paste".to_string();
        assert_eq!(
            verify(Chain::new(blocks)),
            Err(ChainError::BlockHashMismatch { index: target })
        );
    }
}

#[test]
fn test_added_payload_is_block_hash_mismatch() {
    let mut blocks = make_chain(2, 3).into_blocks();
    blocks[1].events[2].payload = Some(json!({"len": 400}));
    assert_eq!(
        verify(Chain::new(blocks)),
        Err(ChainError::BlockHashMismatch { index: 1 })
    );
}

#[test]
fn test_swapped_blocks_break_the_chain() {
    let mut blocks = make_chain(3, 2).into_blocks();
    blocks.swap(0, 1);
    assert_eq!(
        verify(Chain::new(blocks)),
        Err(ChainError::ChainBroken { index: 0 })
    );

    let mut blocks = make_chain(3, 2).into_blocks();
    blocks.swap(1, 2);
    assert_eq!(
        verify(Chain::new(blocks)),
        Err(ChainError::ChainBroken { index: 1 })
    );
}

#[test]
fn test_dropped_block_breaks_the_chain() {
    let mut blocks = make_chain(4, 2).into_blocks();
    blocks.remove(2);
    assert_eq!(
        verify(Chain::new(blocks)),
        Err(ChainError::ChainBroken { index: 2 })
    );
}

#[test]
fn test_first_block_must_link_to_genesis() {
    let mut builder = ChainBuilder::new();
    builder.push_events(vec![Event::new(1, "keydown")]).unwrap();
    let mut blocks = builder.finish().into_blocks();

    // Re-hash block 0 against a non-genesis predecessor so only linkage fails.
    let forged_prev = "ab".repeat(32);
    let b = &blocks[0];
    let rehashed = humansign_core::compute_block_hash(
        &forged_prev,
        b.start_ts,
        b.end_ts,
        &b.events,
        &Default::default(),
    )
    .unwrap();
    blocks[0].prev_hash = forged_prev;
    blocks[0].block_hash = rehashed.to_hex();

    assert_eq!(
        verify(Chain::new(blocks)),
        Err(ChainError::ChainBroken { index: 0 })
    );
}

#[test]
fn test_event_outside_block_range_is_time_range_violation() {
    let mut builder = ChainBuilder::new();
    builder
        .push_range(0, 10, vec![Event::new(5, "keydown")])
        .unwrap();
    builder
        .push_range(20, 30, vec![Event::new(25, "keydown"), Event::new(31, "keydown")])
        .unwrap();
    assert_eq!(
        verify(builder.finish()),
        Err(ChainError::TimeRangeViolation { index: 1 })
    );
}

#[test]
fn test_inverted_block_range_is_time_range_violation() {
    let mut builder = ChainBuilder::new();
    builder.push_range(50, 40, Vec::new()).unwrap();
    assert_eq!(
        verify(builder.finish()),
        Err(ChainError::TimeRangeViolation { index: 0 })
    );
}

#[test]
fn test_overlapping_blocks_are_non_monotonic() {
    let mut builder = ChainBuilder::new();
    builder
        .push_range(0, 100, vec![Event::new(100, "keydown")])
        .unwrap();
    builder
        .push_range(90, 120, vec![Event::new(95, "keydown")])
        .unwrap();
    assert_eq!(
        verify(builder.finish()),
        Err(ChainError::NonMonotonicChain { index: 0 })
    );
}

#[test]
fn test_touching_block_ranges_are_allowed() {
    let mut builder = ChainBuilder::new();
    builder
        .push_range(0, 100, vec![Event::new(100, "keydown")])
        .unwrap();
    builder
        .push_range(100, 120, vec![Event::new(100, "keydown")])
        .unwrap();
    assert_eq!(verify(builder.finish()), Ok(()));
}

#[test]
fn test_flatten_length_and_order() {
    let chain = make_chain(5, 3);
    let expected: Vec<(i64, String)> = chain
        .blocks()
        .iter()
        .flat_map(|b| b.events.iter().map(|e| (e.timestamp, e.kind.clone())))
        .collect();

    let verified = HashChainVerifier::default().verify(chain).unwrap();
    let flat = ChainFlattener::flatten(&verified);

    assert_eq!(flat.len(), 15);
    let got: Vec<(i64, String)> = flat.into_iter().map(|e| (e.timestamp, e.kind)).collect();
    assert_eq!(got, expected);
}

#[test]
fn test_chain_from_wire_json_verifies() {
    let chain = make_chain(2, 2);
    let wire = serde_json::to_string(&chain).unwrap();
    let parsed: Chain = serde_json::from_str(&wire).unwrap();
    assert_eq!(verify(parsed), Ok(()));
}

#[test]
fn test_garbage_hash_strings_are_mismatches() {
    let block = Block {
        start_ts: 0,
        end_ts: 0,
        events: vec![],
        prev_hash: GENESIS_HASH.to_string(),
        block_hash: "not-hex".to_string(),
    };
    assert_eq!(
        verify(Chain::new(vec![block])),
        Err(ChainError::BlockHashMismatch { index: 0 })
    );
}
