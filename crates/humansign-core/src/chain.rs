//! Hash-chain verification and flattening.
//!
//! [`VerifiedChain`] has no public constructor: the only way to obtain one is
//! [`HashChainVerifier::verify`], so [`ChainFlattener`] can never see an
//! unverified chain.

use humansign_canonical::{Canonicalizer, HexDigest};
use tracing::{debug, warn};

use crate::block::{Block, Chain};
use crate::errors::ChainError;
use crate::event::SessionEvent;

/// A chain that passed every integrity check.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedChain {
    blocks: Vec<Block>,
}

impl VerifiedChain {
    /// Verified blocks in chain order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Total number of events across all blocks.
    pub fn event_count(&self) -> usize {
        self.blocks.iter().map(|b| b.events.len()).sum()
    }

    /// Hash of the last block.
    pub fn tip_hash(&self) -> &str {
        // A verified chain is never empty.
        self.blocks
            .last()
            .map(|b| b.block_hash.as_str())
            .unwrap_or_default()
    }
}

/// Validates linkage, block hashes and time ranges of a [`Chain`].
#[derive(Debug, Clone, Default)]
pub struct HashChainVerifier {
    canonicalizer: Canonicalizer,
}

impl HashChainVerifier {
    /// Creates a verifier hashing with the given canonicalizer.
    pub fn new(canonicalizer: Canonicalizer) -> Self {
        Self { canonicalizer }
    }

    /// Verifies `chain`, failing on the first violation.
    ///
    /// Per block, in order: hash recomputation, linkage, time range, and
    /// ordering against the next block.
    pub fn verify(&self, chain: Chain) -> Result<VerifiedChain, ChainError> {
        let blocks = chain.into_blocks();
        if blocks.is_empty() {
            warn!(kind = "EMPTY_CHAIN", "chain verification failed");
            return Err(ChainError::EmptyChain);
        }

        let mut expected_prev = HexDigest::GENESIS;
        for (index, block) in blocks.iter().enumerate() {
            match self.check_block(index, block, &expected_prev, blocks.get(index + 1)) {
                Ok(recomputed) => expected_prev = recomputed,
                Err(err) => {
                    warn!(index, error = %err, "chain verification failed");
                    return Err(err);
                }
            }
        }

        debug!(blocks = blocks.len(), "event chain verified");
        Ok(VerifiedChain { blocks })
    }

    fn check_block(
        &self,
        index: usize,
        block: &Block,
        expected_prev: &HexDigest,
        next: Option<&Block>,
    ) -> Result<HexDigest, ChainError> {
        let recomputed = block
            .compute_hash(&self.canonicalizer)
            .map_err(|_| ChainError::BlockHashMismatch { index })?;
        match HexDigest::parse("block_hash", &block.block_hash) {
            Ok(stored) if stored == recomputed => {}
            _ => return Err(ChainError::BlockHashMismatch { index }),
        }

        match HexDigest::parse("prev_hash", &block.prev_hash) {
            Ok(prev) if prev == *expected_prev => {}
            _ => return Err(ChainError::ChainBroken { index }),
        }

        if block.start_ts > block.end_ts {
            return Err(ChainError::TimeRangeViolation { index });
        }
        let mut last = block.start_ts;
        for event in &block.events {
            if event.timestamp < last || event.timestamp > block.end_ts {
                return Err(ChainError::TimeRangeViolation { index });
            }
            last = event.timestamp;
        }

        if let Some(next) = next {
            if block.end_ts > next.start_ts {
                return Err(ChainError::NonMonotonicChain { index });
            }
        }

        Ok(recomputed)
    }
}

/// Merges a verified chain into one ordered event sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChainFlattener;

impl ChainFlattener {
    /// Concatenates block events in block order, keeping intra-block order.
    pub fn flatten(chain: &VerifiedChain) -> Vec<SessionEvent> {
        let mut events = Vec::with_capacity(chain.event_count());
        for block in chain.blocks() {
            events.extend(block.events.iter().map(SessionEvent::from));
        }
        events
    }
}
