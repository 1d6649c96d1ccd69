use super::error::{StateError, StateResult};
use super::{event::PresenceTransition, PresenceEvent, SignaturePresence};

#[derive(Debug)]
pub struct PresenceMachine {
    presence: SignaturePresence,
    transition_history: Vec<PresenceTransition>,
}

impl PresenceMachine {
    pub fn new() -> Self {
        Self {
            presence: SignaturePresence::default(),
            transition_history: Vec::new(),
        }
    }

    pub fn presence(&self) -> SignaturePresence {
        self.presence
    }

    pub fn can_transition(&self, event: PresenceEvent) -> bool {
        self.next_presence(event).is_some()
    }

    pub fn next_presence(&self, event: PresenceEvent) -> Option<SignaturePresence> {
        use PresenceEvent::*;
        use SignaturePresence::*;
        match (self.presence, event) {
            (_, Cleared) => Some(Empty),
            (Empty | Drawn, InkStroke) => Some(Drawn),
            (Empty | Generated, TextRendered) => Some(Generated),
            (Generated, InkStroke) | (Drawn, TextRendered) => None,
        }
    }

    /// Applies `event`; repeated events that keep the presence unchanged are not recorded.
    pub fn transition(&mut self, event: PresenceEvent) -> StateResult<SignaturePresence> {
        let next = self.next_presence(event).ok_or_else(|| {
            let from = self.presence;
            tracing::warn!(from = ?from, event = ?event, "invalid presence transition requested");
            StateError::InvalidPresenceTransition { from, event }
        })?;

        if next != self.presence {
            tracing::debug!(from = ?self.presence, event = ?event, to = ?next, "presence changed");
            self.transition_history
                .push(PresenceTransition::new(self.presence, event, next));
            self.presence = next;
        }

        Ok(self.presence)
    }

    pub fn history(&self) -> &[PresenceTransition] {
        &self.transition_history
    }
}

impl Default for PresenceMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PresenceMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SignaturePresence::{:?}", self.presence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_transition_tracks_valid_and_invalid_events() {
        let mut machine = PresenceMachine::new();
        assert!(machine.can_transition(PresenceEvent::InkStroke));
        assert!(machine.can_transition(PresenceEvent::TextRendered));
        assert!(machine.can_transition(PresenceEvent::Cleared));

        let _ = machine
            .transition(PresenceEvent::InkStroke)
            .expect("empty -> drawn should transition");

        assert!(!machine.can_transition(PresenceEvent::TextRendered));
        assert!(machine.can_transition(PresenceEvent::Cleared));
    }

    #[test]
    fn transition_records_only_presence_changes() {
        let mut machine = PresenceMachine::new();
        for _ in 0..5 {
            let _ = machine
                .transition(PresenceEvent::InkStroke)
                .expect("ink should keep drawing");
        }
        let _ = machine
            .transition(PresenceEvent::Cleared)
            .expect("clear should work");
        let _ = machine
            .transition(PresenceEvent::Cleared)
            .expect("second clear should work");
        let _ = machine
            .transition(PresenceEvent::TextRendered)
            .expect("render should work");

        assert_eq!(machine.presence(), SignaturePresence::Generated);
        assert_eq!(
            machine.history(),
            &[
                PresenceTransition::new(
                    SignaturePresence::Empty,
                    PresenceEvent::InkStroke,
                    SignaturePresence::Drawn
                ),
                PresenceTransition::new(
                    SignaturePresence::Drawn,
                    PresenceEvent::Cleared,
                    SignaturePresence::Empty
                ),
                PresenceTransition::new(
                    SignaturePresence::Empty,
                    PresenceEvent::TextRendered,
                    SignaturePresence::Generated
                ),
            ]
        );
    }

    #[test]
    fn invalid_transition_returns_error_without_mutating_history() {
        let mut machine = PresenceMachine::new();
        let _ = machine
            .transition(PresenceEvent::TextRendered)
            .expect("empty -> generated should transition");

        let err = machine
            .transition(PresenceEvent::InkStroke)
            .expect_err("generated -> drawn should fail");
        assert!(matches!(
            err,
            StateError::InvalidPresenceTransition {
                from: SignaturePresence::Generated,
                event: PresenceEvent::InkStroke
            }
        ));
        assert_eq!(machine.presence(), SignaturePresence::Generated);
        assert_eq!(machine.history().len(), 1);
    }
}
