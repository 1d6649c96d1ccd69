use super::event::PresenceEvent;
use super::model::SignaturePresence;
use thiserror::Error;

pub type StateResult<T> = std::result::Result<T, StateError>;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("invalid presence transition: from {from:?} using event {event:?}")]
    InvalidPresenceTransition {
        from: SignaturePresence,
        event: PresenceEvent,
    },
}
