//! Hash-linked event blocks and the chain that orders them.
//!
//! Block hash rule: `lowercase_hex(sha256(jcs({"end_ts", "events", "prev_hash", "start_ts"})))`
//! where events keep their wire tuple shape and `block_hash` is excluded.

use humansign_canonical::{CanonicalizationError, Canonicalizer, HexDigest, GENESIS_HASH};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::errors::CoreError;
use crate::event::Event;

/// A contiguous, hash-linked unit of events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// First timestamp covered by the block.
    pub start_ts: i64,
    /// Last timestamp covered by the block.
    pub end_ts: i64,
    /// Events in capture order.
    pub events: Vec<Event>,
    /// Hash of the previous block, or [`GENESIS_HASH`].
    pub prev_hash: String,
    /// Digest over `(prev_hash, start_ts, end_ts, events)`.
    pub block_hash: String,
}

impl Block {
    /// Recomputes this block's hash from its contents, ignoring the stored `block_hash`.
    pub fn compute_hash(&self, canonicalizer: &Canonicalizer) -> Result<HexDigest, CanonicalizationError> {
        compute_block_hash(
            &self.prev_hash,
            self.start_ts,
            self.end_ts,
            &self.events,
            canonicalizer,
        )
    }
}

/// Computes a block hash from its hashed fields.
pub fn compute_block_hash(
    prev_hash: &str,
    start_ts: i64,
    end_ts: i64,
    events: &[Event],
    canonicalizer: &Canonicalizer,
) -> Result<HexDigest, CanonicalizationError> {
    let events = serde_json::to_value(events)
        .map_err(|e| CanonicalizationError::InvalidStructure(e.to_string()))?;
    let header = json!({
        "prev_hash": prev_hash,
        "start_ts": start_ts,
        "end_ts": end_ts,
        "events": events,
    });
    let bytes = canonicalizer.canonicalize(&header)?;
    Ok(HexDigest::of(&bytes))
}

/// Ordered sequence of blocks as carried in an envelope.
///
/// A `Chain` is untrusted until it has passed
/// [`HashChainVerifier`](crate::chain::HashChainVerifier).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Chain {
    blocks: Vec<Block>,
}

impl Chain {
    /// Wraps an ordered list of blocks.
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// Blocks in chain order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the chain has no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Unwraps the block list.
    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }
}

impl From<Vec<Block>> for Chain {
    fn from(blocks: Vec<Block>) -> Self {
        Self::new(blocks)
    }
}

/// Builds a correctly linked chain, computing every block hash.
///
/// This is the sealing side of the chain rule, used by fixtures and the
/// `seal` tooling; verification never goes through it.
#[derive(Debug, Default)]
pub struct ChainBuilder {
    canonicalizer: Canonicalizer,
    blocks: Vec<Block>,
}

impl ChainBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a block whose time range spans its first and last event.
    ///
    /// Events must be in non-decreasing timestamp order and must not start
    /// before the previous block ends.
    pub fn push_events(&mut self, events: Vec<Event>) -> Result<&Block, CoreError> {
        let (start_ts, end_ts) = match (events.first(), events.last()) {
            (Some(first), Some(last)) => (first.timestamp, last.timestamp),
            _ => return Err(CoreError::InvalidBlock("block has no events".to_string())),
        };
        if let Some(i) = events
            .windows(2)
            .position(|w| w[1].timestamp < w[0].timestamp)
        {
            return Err(CoreError::InvalidBlock(format!(
                "event {} is earlier than the event before it",
                i + 1
            )));
        }
        if let Some(prev) = self.blocks.last() {
            if start_ts < prev.end_ts {
                return Err(CoreError::InvalidBlock(
                    "block starts before the previous block ends".to_string(),
                ));
            }
        }
        self.push_range(start_ts, end_ts, events)
    }

    /// Appends a block with an explicit time range.
    pub fn push_range(
        &mut self,
        start_ts: i64,
        end_ts: i64,
        events: Vec<Event>,
    ) -> Result<&Block, CoreError> {
        let prev_hash = self
            .blocks
            .last()
            .map(|b| b.block_hash.clone())
            .unwrap_or_else(|| GENESIS_HASH.to_string());
        let block_hash =
            compute_block_hash(&prev_hash, start_ts, end_ts, &events, &self.canonicalizer)?;
        self.blocks.push(Block {
            start_ts,
            end_ts,
            events,
            prev_hash,
            block_hash: block_hash.to_hex(),
        });
        let index = self.blocks.len() - 1;
        Ok(&self.blocks[index])
    }

    /// Finishes the chain.
    pub fn finish(self) -> Chain {
        Chain::new(self.blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builder_links_blocks() {
        let mut builder = ChainBuilder::new();
        builder
            .push_events(vec![Event::new(1, "keydown"), Event::new(2, "keydown")])
            .unwrap();
        builder.push_events(vec![Event::new(3, "paste")]).unwrap();
        let chain = builder.finish();

        assert_eq!(chain.blocks()[0].prev_hash, GENESIS_HASH);
        assert_eq!(chain.blocks()[1].prev_hash, chain.blocks()[0].block_hash);
        assert_eq!(chain.blocks()[1].start_ts, 3);
    }

    #[test]
    fn builder_rejects_empty_event_batch() {
        let mut builder = ChainBuilder::new();
        assert!(matches!(
            builder.push_events(Vec::new()),
            Err(CoreError::InvalidBlock(_))
        ));
    }

    #[test]
    fn builder_rejects_events_out_of_order() {
        let mut builder = ChainBuilder::new();
        let err = builder
            .push_events(vec![
                Event::new(10, "keydown"),
                Event::new(30, "keydown"),
                Event::new(20, "keydown"),
            ])
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidBlock(ref msg) if msg.contains("event 2")));
        assert!(builder.finish().is_empty());
    }

    #[test]
    fn builder_rejects_block_starting_before_previous_end() {
        let mut builder = ChainBuilder::new();
        builder
            .push_events(vec![Event::new(10, "keydown"), Event::new(50, "keydown")])
            .unwrap();
        assert!(matches!(
            builder.push_events(vec![Event::new(40, "keydown")]),
            Err(CoreError::InvalidBlock(_))
        ));
        // Equal boundary timestamps are allowed.
        builder.push_events(vec![Event::new(50, "paste")]).unwrap();
        assert_eq!(builder.finish().len(), 2);
    }

    #[test]
    fn hash_matches_golden_vector() {
        let events = vec![
            Event::new(1000, "keydown"),
            Event::new(1200, "keydown"),
            Event::with_payload(1450, "paste", json!({"len": 12})),
        ];
        let hash =
            compute_block_hash(GENESIS_HASH, 1000, 1450, &events, &Canonicalizer::new()).unwrap();
        assert_eq!(
            hash.to_hex(),
            "1dadc66410effbc866e60d1b4324228eaa520c07f69a2fb722b9fbd81b844cc0"
        );
    }

    #[test]
    fn chain_round_trips_as_plain_array() {
        let mut builder = ChainBuilder::new();
        builder.push_events(vec![Event::new(1, "keydown")]).unwrap();
        let chain = builder.finish();
        let value = serde_json::to_value(&chain).unwrap();
        assert!(value.is_array());
        let back: Chain = serde_json::from_value(value).unwrap();
        assert_eq!(back, chain);
    }
}
