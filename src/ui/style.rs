use gtk4::CssProvider;

/// Compile-time layout tokens for the signing dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleTokens {
    pub spacing_8: i32,
    pub spacing_12: i32,
    pub spacing_16: i32,
    pub card_radius: u16,
    pub control_radius: u16,
    pub control_height: i32,
    pub border_width: u16,
    pub dialog_default_width: i32,
    pub dialog_default_height: i32,
    pub surface_min_width: i32,
    pub surface_min_height: i32,
}

pub const LAYOUT_TOKENS: StyleTokens = StyleTokens {
    spacing_8: 8,
    spacing_12: 12,
    spacing_16: 16,
    card_radius: 12,
    control_radius: 8,
    control_height: 36,
    border_width: 1,
    dialog_default_width: 560,
    dialog_default_height: 460,
    surface_min_width: 320,
    surface_min_height: 180,
};

pub fn runtime_css(tokens: StyleTokens) -> String {
    format!(
        "
window.signpad-root {{
  padding: {spacing_16}px;
}}
.signpad-surface-frame {{
  border: {border_width}px solid alpha(currentColor, 0.35);
  border-radius: {card_radius}px;
  background: #ffffff;
}}
.signpad-hint {{
  opacity: 0.75;
}}
.signpad-message {{
  color: #c01c28;
}}
.signpad-actions button {{
  min-height: {control_height}px;
  border-radius: {control_radius}px;
  padding: 0 {spacing_12}px;
}}
",
        spacing_16 = tokens.spacing_16,
        spacing_12 = tokens.spacing_12,
        border_width = tokens.border_width,
        card_radius = tokens.card_radius,
        control_height = tokens.control_height,
        control_radius = tokens.control_radius,
    )
}

pub fn install_runtime_css(tokens: StyleTokens) {
    let provider = CssProvider::new();
    provider.load_from_data(&runtime_css(tokens));
    if let Some(display) = gtk4::gdk::Display::default() {
        gtk4::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk4::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    } else {
        tracing::warn!("no display available; skipping runtime css");
    }
}
