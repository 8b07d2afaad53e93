//! Session identity and the flattened, verified session view.

use serde::Serialize;

use crate::event::SessionEvent;

/// Identity of an authoring session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionMetadata {
    /// Subject (author) identifier.
    pub subject: String,
    /// Session number for the subject.
    #[serde(rename = "sessionIndex")]
    pub session_index: i64,
    /// Optional repetition index.
    pub rep: Option<i64>,
}

/// Flattened view of a session whose envelope, document hash and chain all verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifiedSession {
    /// Subject (author) identifier.
    pub subject: String,
    /// Session number for the subject.
    #[serde(rename = "sessionIndex")]
    pub session_index: i64,
    /// Optional repetition index.
    pub rep: Option<i64>,
    /// Sealed document hash.
    pub document_hash: String,
    /// Events in chain order.
    pub events: Vec<SessionEvent>,
}

impl VerifiedSession {
    /// Assembles a session from its verified parts.
    pub fn new(metadata: SessionMetadata, document_hash: String, events: Vec<SessionEvent>) -> Self {
        Self {
            subject: metadata.subject,
            session_index: metadata.session_index,
            rep: metadata.rep,
            document_hash,
            events,
        }
    }

    /// Session identity.
    pub fn metadata(&self) -> SessionMetadata {
        SessionMetadata {
            subject: self.subject.clone(),
            session_index: self.session_index,
            rep: self.rep,
        }
    }
}
