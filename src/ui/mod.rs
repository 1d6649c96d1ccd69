pub mod style;
pub mod widgets;

pub use style::{install_runtime_css, StyleTokens, LAYOUT_TOKENS};
pub use widgets::{mode_radio, text_button, wrapped_label};
