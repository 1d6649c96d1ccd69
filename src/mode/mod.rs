use serde::Deserialize;
use std::str::FromStr;

pub const MANUAL_HINT: &str = "Draw your signature in the box above.";
pub const LIVE_GENERATED_HINT: &str =
    "Type your name to see your signature generated automatically.";
pub const BUTTON_GENERATED_HINT: &str =
    "Press 'Generate signature' to create your signature from your name.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureMode {
    #[default]
    Manual,
    Generated,
}

impl SignatureMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Generated => "generated",
        }
    }
}

impl FromStr for SignatureMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "manual" | "draw" => Ok(Self::Manual),
            "generated" | "name" => Ok(Self::Generated),
            other => Err(format!("unknown signature mode: {other}")),
        }
    }
}

/// How generated signatures are (re)rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerateTrigger {
    /// Every name keystroke re-renders; no generate button.
    #[default]
    Live,
    /// An explicit generate button renders on demand.
    Button,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeUi {
    pub generate_visible: bool,
    pub hint: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceAction {
    /// Render the (untrimmed) name; an empty name clears the surface.
    Render(String),
    Clear,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeSync {
    pub ui: ModeUi,
    pub action: SurfaceAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeCoordinator {
    mode: SignatureMode,
    trigger: GenerateTrigger,
}

impl ModeCoordinator {
    pub const fn new(mode: SignatureMode, trigger: GenerateTrigger) -> Self {
        Self { mode, trigger }
    }

    pub const fn mode(&self) -> SignatureMode {
        self.mode
    }

    pub const fn trigger(&self) -> GenerateTrigger {
        self.trigger
    }

    pub const fn drawing_enabled(&self) -> bool {
        matches!(self.mode, SignatureMode::Manual)
    }

    pub const fn ui(&self) -> ModeUi {
        match (self.mode, self.trigger) {
            (SignatureMode::Manual, _) => ModeUi {
                generate_visible: false,
                hint: MANUAL_HINT,
            },
            (SignatureMode::Generated, GenerateTrigger::Live) => ModeUi {
                generate_visible: false,
                hint: LIVE_GENERATED_HINT,
            },
            (SignatureMode::Generated, GenerateTrigger::Button) => ModeUi {
                generate_visible: true,
                hint: BUTTON_GENERATED_HINT,
            },
        }
    }

    pub fn switch_to(&mut self, mode: SignatureMode, name: &str) -> ModeSync {
        if self.mode != mode {
            tracing::debug!(from = self.mode.as_str(), to = mode.as_str(), "signature mode switched");
        }
        self.mode = mode;
        self.sync(name)
    }

    pub fn sync(&self, name: &str) -> ModeSync {
        let action = match self.mode {
            SignatureMode::Generated if !name.trim().is_empty() => {
                SurfaceAction::Render(name.to_string())
            }
            SignatureMode::Generated | SignatureMode::Manual => SurfaceAction::Clear,
        };
        ModeSync {
            ui: self.ui(),
            action,
        }
    }

    pub fn on_name_input(&self, name: &str) -> Option<SurfaceAction> {
        match (self.mode, self.trigger) {
            (SignatureMode::Generated, GenerateTrigger::Live) => {
                Some(SurfaceAction::Render(name.to_string()))
            }
            _ => None,
        }
    }
}

impl Default for ModeCoordinator {
    fn default() -> Self {
        Self::new(SignatureMode::default(), GenerateTrigger::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switching_to_generated_with_name_renders_preview() {
        let mut modes = ModeCoordinator::default();
        let sync = modes.switch_to(SignatureMode::Generated, "Ada Lovelace");
        assert_eq!(sync.action, SurfaceAction::Render("Ada Lovelace".to_string()));
        assert_eq!(sync.ui.hint, LIVE_GENERATED_HINT);
        assert!(!sync.ui.generate_visible);
        assert!(!modes.drawing_enabled());
    }

    #[test]
    fn switching_to_generated_without_name_clears() {
        let mut modes = ModeCoordinator::default();
        let sync = modes.switch_to(SignatureMode::Generated, "   ");
        assert_eq!(sync.action, SurfaceAction::Clear);
    }

    #[test]
    fn switching_to_manual_always_clears() {
        let mut modes = ModeCoordinator::new(SignatureMode::Generated, GenerateTrigger::Live);
        let sync = modes.switch_to(SignatureMode::Manual, "Ada Lovelace");
        assert_eq!(sync.action, SurfaceAction::Clear);
        assert_eq!(sync.ui.hint, MANUAL_HINT);
        assert!(modes.drawing_enabled());
    }

    #[test]
    fn button_trigger_shows_generate_only_in_generated_mode() {
        let mut modes = ModeCoordinator::new(SignatureMode::Manual, GenerateTrigger::Button);
        assert!(!modes.ui().generate_visible);
        let sync = modes.switch_to(SignatureMode::Generated, "");
        assert!(sync.ui.generate_visible);
        assert_eq!(sync.ui.hint, BUTTON_GENERATED_HINT);
    }

    #[test]
    fn name_input_regenerates_only_in_live_generated_mode() {
        let live = ModeCoordinator::new(SignatureMode::Generated, GenerateTrigger::Live);
        assert_eq!(
            live.on_name_input("A"),
            Some(SurfaceAction::Render("A".to_string()))
        );
        assert_eq!(
            live.on_name_input(""),
            Some(SurfaceAction::Render(String::new()))
        );

        let manual = ModeCoordinator::new(SignatureMode::Manual, GenerateTrigger::Live);
        assert_eq!(manual.on_name_input("A"), None);

        let button = ModeCoordinator::new(SignatureMode::Generated, GenerateTrigger::Button);
        assert_eq!(button.on_name_input("A"), None);
    }

    #[test]
    fn signature_mode_parses_cli_values() {
        assert_eq!("manual".parse::<SignatureMode>(), Ok(SignatureMode::Manual));
        assert_eq!(
            " Generated ".parse::<SignatureMode>(),
            Ok(SignatureMode::Generated)
        );
        assert!("stamp".parse::<SignatureMode>().is_err());
    }
}
