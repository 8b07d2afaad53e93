//! Event kind classification.

/// Behavioral class of an event kind string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventClass {
    /// Character-producing input.
    Keystroke,
    /// Backspace or delete.
    Deletion,
    /// Clipboard paste.
    Paste,
    /// Explicit pause or idle marker.
    Pause,
    /// Anything else (focus, selection, ...).
    Other,
}

impl EventClass {
    /// Classifies `kind`, ignoring ASCII case.
    pub fn classify(kind: &str) -> Self {
        const KEYSTROKE: [&str; 6] = ["key", "keydown", "keypress", "char", "insert", "input"];
        const DELETION: [&str; 2] = ["backspace", "delete"];
        const PAUSE: [&str; 2] = ["pause", "idle"];

        let matches = |names: &[&str]| names.iter().any(|n| kind.eq_ignore_ascii_case(n));
        if matches(&KEYSTROKE) {
            EventClass::Keystroke
        } else if matches(&DELETION) {
            EventClass::Deletion
        } else if kind.eq_ignore_ascii_case("paste") {
            EventClass::Paste
        } else if matches(&PAUSE) {
            EventClass::Pause
        } else {
            EventClass::Other
        }
    }
}
