pub mod error;
pub mod event;
pub mod machine;
pub mod model;

pub use error::{StateError, StateResult};
pub use event::PresenceEvent;
pub use machine::PresenceMachine;
pub use model::SignaturePresence;
