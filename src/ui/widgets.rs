use gtk4::prelude::*;
use gtk4::{Button, CheckButton, Label};

pub fn text_button(label: &str, tooltip: &str, extra_classes: &[&str]) -> Button {
    let button = Button::with_label(label);
    button.set_focus_on_click(false);
    button.set_tooltip_text(Some(tooltip));
    for css_class in extra_classes {
        button.add_css_class(css_class);
    }
    button
}

/// A radio-style check button; pass the first radio as `group` for the rest.
pub fn mode_radio(label: &str, group: Option<&CheckButton>) -> CheckButton {
    let radio = CheckButton::with_label(label);
    if let Some(group) = group {
        radio.set_group(Some(group));
    }
    radio
}

pub fn wrapped_label(css_class: &str) -> Label {
    let label = Label::new(None);
    label.set_xalign(0.0);
    label.set_wrap(true);
    label.add_css_class(css_class);
    label
}
