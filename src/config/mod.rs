use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::geometry::Color;
use crate::location::Coordinates;
use crate::mode::{GenerateTrigger, SignatureMode};
use crate::session::SessionOptions;
use crate::stroke::StrokeStyle;
use crate::submit::{PayloadFormat, SubmissionEncoder, DEFAULT_SIGNATURE_FIELD, DEFAULT_SIGNER_FIELD};
use crate::surface::DEFAULT_MAX_SETUP_RETRIES;
use crate::text::TextSignatureOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConfigPathError {
    MissingHomeDirectory,
}

const APP_DIR: &str = "signpad";
const APP_CONFIG_FILE: &str = "config.json";
const MAX_SETUP_RETRIES_LIMIT: u32 = 120;

/// Settings from `config.json`; every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct SignpadConfig {
    pub(crate) payload_format: Option<PayloadFormat>,
    pub(crate) signature_field: Option<String>,
    pub(crate) signer_field: Option<String>,
    pub(crate) max_setup_retries: Option<u32>,
    pub(crate) stroke_width: Option<f64>,
    pub(crate) stroke_color: Option<String>,
    pub(crate) generate_trigger: Option<GenerateTrigger>,
    pub(crate) font_family: Option<String>,
    pub(crate) base_font_size: Option<f64>,
    pub(crate) min_font_size: Option<f64>,
    pub(crate) font_size_step: Option<f64>,
    pub(crate) text_margin: Option<f64>,
    pub(crate) location: Option<Coordinates>,
}

impl SignpadConfig {
    pub(crate) fn session_options(&self, initial_mode: SignatureMode) -> SessionOptions {
        let mut stroke = StrokeStyle::default();
        if let Some(width) = self.stroke_width {
            stroke.set_width(width);
        }
        if let Some(raw) = self.stroke_color.as_deref() {
            match Color::parse_hex(raw) {
                Some(color) => stroke.color = color,
                None => tracing::warn!(raw, "invalid stroke_color in config; expected #RRGGBB"),
            }
        }

        let mut text = TextSignatureOptions::default();
        if let Some(family) = self
            .font_family
            .as_deref()
            .map(str::trim)
            .filter(|family| !family.is_empty())
        {
            text.family = family.to_string();
        }
        text.color = stroke.color;
        if let Some(size) = positive(self.base_font_size, "base_font_size") {
            text.fit.base_size = size;
        }
        if let Some(size) = positive(self.min_font_size, "min_font_size") {
            text.fit.min_size = size;
        }
        if let Some(step) = positive(self.font_size_step, "font_size_step") {
            text.fit.step = step;
        }
        if let Some(margin) = self.text_margin.filter(|margin| margin.is_finite() && *margin >= 0.0) {
            text.margin = margin;
        }

        let max_setup_retries = self
            .max_setup_retries
            .unwrap_or(DEFAULT_MAX_SETUP_RETRIES)
            .min(MAX_SETUP_RETRIES_LIMIT);

        let encoder = SubmissionEncoder::new(
            self.payload_format.unwrap_or_default(),
            non_empty_or(self.signature_field.as_deref(), DEFAULT_SIGNATURE_FIELD),
            non_empty_or(self.signer_field.as_deref(), DEFAULT_SIGNER_FIELD),
        );

        SessionOptions {
            max_setup_retries,
            stroke,
            text,
            initial_mode,
            trigger: self.generate_trigger.unwrap_or_default(),
            encoder,
            location: self.location,
        }
    }
}

fn positive(value: Option<f64>, key: &str) -> Option<f64> {
    let value = value?;
    if value.is_finite() && value > 0.0 {
        return Some(value);
    }
    tracing::warn!(key, value, "ignoring non-positive config value");
    None
}

fn non_empty_or<'a>(value: Option<&'a str>, fallback: &'a str) -> &'a str {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(fallback)
}

pub(crate) fn load_app_config() -> SignpadConfig {
    let (xdg_config_home, home) = config_env_dirs();
    load_app_config_with(xdg_config_home.as_deref(), home.as_deref())
}

fn load_app_config_with(xdg_config_home: Option<&Path>, home: Option<&Path>) -> SignpadConfig {
    let path = match app_config_path(APP_DIR, APP_CONFIG_FILE, xdg_config_home, home) {
        Ok(p) => p,
        Err(_) => return SignpadConfig::default(),
    };
    if !path.exists() {
        return SignpadConfig::default();
    }
    match std::fs::read_to_string(&path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
            tracing::warn!(?err, ?path, "failed to parse config.json; using defaults");
            SignpadConfig::default()
        }),
        Err(err) => {
            tracing::warn!(?err, ?path, "failed to read config.json; using defaults");
            SignpadConfig::default()
        }
    }
}

pub(crate) fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub(crate) fn app_config_path(
    app_dir: &str,
    file_name: &str,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    let mut path = config_root(xdg_config_home, home)?;
    path.push(app_dir);
    path.push(file_name);
    Ok(path)
}

fn config_root(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    if let Some(xdg) = xdg_config_home.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigPathError::MissingHomeDirectory)?;
    Ok(home.join(".config"))
}
