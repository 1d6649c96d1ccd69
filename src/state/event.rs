use super::model::SignaturePresence;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceEvent {
    InkStroke,
    TextRendered,
    Cleared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresenceTransition {
    pub from: SignaturePresence,
    pub event: PresenceEvent,
    pub to: SignaturePresence,
}

impl PresenceTransition {
    pub const fn new(from: SignaturePresence, event: PresenceEvent, to: SignaturePresence) -> Self {
        Self { from, event, to }
    }
}
