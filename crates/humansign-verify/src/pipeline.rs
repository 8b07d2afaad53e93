//! Stage orchestration.
//!
//! Order is fixed: envelope (structure, then signature, then payload),
//! document hash binding, chain integrity, flattening, features, scoring.
//! No stage runs unless every earlier stage succeeded.

use std::io::Read;

use humansign_core::{
    extract_token, ChainFlattener, EnvelopeVerifier, HashChainVerifier, IntegrityBinder,
    JwsOracle, SignatureOracle, VerifiedSession, VerifyingKey,
};
use humansign_features::{AuthorshipScorer, FeatureExtractor, HeuristicScorer};
use tracing::{debug, warn};

use crate::config::VerifierConfig;
use crate::error::PipelineError;
use crate::report::VerificationReport;

/// Runs the full verification pipeline.
///
/// Holds no per-request state; one instance can serve concurrent requests.
pub struct Verifier<O = JwsOracle, S = HeuristicScorer> {
    envelope: EnvelopeVerifier<O>,
    binder: IntegrityBinder,
    chain: HashChainVerifier,
    extractor: FeatureExtractor,
    scorer: S,
}

impl Verifier<JwsOracle, HeuristicScorer> {
    /// Builds a verifier checking JWS signatures against `key` and scoring
    /// with the built-in heuristic.
    pub fn with_key(config: &VerifierConfig, key: &VerifyingKey) -> Result<Self, PipelineError> {
        let oracle = JwsOracle::new(key, &config.envelope.allowed_algorithms)?;
        Self::new(config, oracle, HeuristicScorer::new())
    }
}

impl<O: SignatureOracle, S: AuthorshipScorer> Verifier<O, S> {
    /// Builds a verifier from explicit collaborators.
    pub fn new(config: &VerifierConfig, oracle: O, scorer: S) -> Result<Self, PipelineError> {
        Ok(Self {
            envelope: EnvelopeVerifier::new(&config.envelope, oracle)?,
            binder: IntegrityBinder::new(),
            chain: HashChainVerifier::default(),
            extractor: FeatureExtractor::new(config.features.clone()),
            scorer,
        })
    }

    /// Verifies signature, document binding and chain, returning the
    /// flattened session without scoring it.
    pub fn verify_session<R: Read>(
        &self,
        document: R,
        humansign: &[u8],
    ) -> Result<VerifiedSession, PipelineError> {
        self.run_integrity(document, humansign).inspect_err(log_failure)
    }

    /// Runs every stage and reports authorship for a verified session.
    pub fn verify<R: Read>(
        &self,
        document: R,
        humansign: &[u8],
    ) -> Result<VerificationReport, PipelineError> {
        self.run(document, humansign).inspect_err(log_failure)
    }

    fn run<R: Read>(&self, document: R, humansign: &[u8]) -> Result<VerificationReport, PipelineError> {
        let session = self.run_integrity(document, humansign)?;

        let features = self.extractor.extract(&session.metadata(), &session.events)?;
        debug!(version = features.version, "feature vector ready");

        let authorship = self.scorer.score(&features)?;
        debug!("verification complete");
        Ok(VerificationReport::verified(authorship))
    }

    fn run_integrity<R: Read>(
        &self,
        document: R,
        humansign: &[u8],
    ) -> Result<VerifiedSession, PipelineError> {
        let token = extract_token(humansign)?;
        let envelope = self.envelope.verify(&token)?;
        debug!(blocks = envelope.chain.len(), "envelope verified");

        self.binder.bind_reader(document, &envelope.document_hash)?;

        let metadata = envelope.metadata();
        let document_hash = envelope.document_hash;
        let verified = self.chain.verify(envelope.chain)?;
        let events = ChainFlattener::flatten(&verified);
        debug!(events = events.len(), "session flattened");

        Ok(VerifiedSession::new(metadata, document_hash, events))
    }
}

fn log_failure(err: &PipelineError) {
    match err.block_index() {
        Some(index) => warn!(kind = %err.kind(), index, "verification failed"),
        None => warn!(kind = %err.kind(), "verification failed"),
    }
}
