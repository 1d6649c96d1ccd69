use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::location::Coordinates;
use crate::state::SignaturePresence;
use crate::surface::{SurfaceError, SurfaceGeometryManager};

pub const DEFAULT_SIGNATURE_FIELD: &str = "signature";
pub const DEFAULT_SIGNER_FIELD: &str = "signed_by";
pub const LATITUDE_FIELD: &str = "signed_latitude";
pub const LONGITUDE_FIELD: &str = "signed_longitude";
const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

pub type SubmitResult<T> = std::result::Result<T, SubmitError>;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("signer name is required")]
    MissingName,
    #[error("no signature was drawn or generated")]
    MissingSignature,
    #[error("drawing surface was never initialized")]
    SurfaceNotReady,
    #[error("signature encoding failed: {0}")]
    Encode(#[source] SurfaceError),
}

impl SubmitError {
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::MissingName => "Please enter your full name.",
            Self::MissingSignature => {
                "Please draw your signature or generate one from your name before continuing."
            }
            Self::SurfaceNotReady => {
                "The signature area is not ready yet. Close and reopen the dialog, then try again."
            }
            Self::Encode(_) => "The signature could not be prepared. Please try again.",
        }
    }
}

/// How the encoded image is written into the transmission field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadFormat {
    /// Bare base64 of the PNG bytes, no prefix.
    #[default]
    Base64Body,
    /// `data:image/png;base64,<payload>`.
    DataUri,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignaturePayload {
    png: Vec<u8>,
}

impl SignaturePayload {
    pub fn from_png(png: Vec<u8>) -> Self {
        Self { png }
    }

    pub fn png_bytes(&self) -> &[u8] {
        &self.png
    }

    pub fn is_empty(&self) -> bool {
        self.png.is_empty()
    }

    pub fn base64_body(&self) -> String {
        BASE64.encode(&self.png)
    }

    pub fn data_uri(&self) -> String {
        format!("{PNG_DATA_URI_PREFIX}{}", self.base64_body())
    }

    pub fn transmission_value(&self, format: PayloadFormat) -> String {
        match format {
            PayloadFormat::Base64Body => self.base64_body(),
            PayloadFormat::DataUri => self.data_uri(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormFields {
    fields: BTreeMap<String, String>,
}

impl FormFields {
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionEncoder {
    format: PayloadFormat,
    signature_field: String,
    signer_field: String,
}

impl Default for SubmissionEncoder {
    fn default() -> Self {
        Self::new(
            PayloadFormat::default(),
            DEFAULT_SIGNATURE_FIELD,
            DEFAULT_SIGNER_FIELD,
        )
    }
}

impl SubmissionEncoder {
    pub fn new(
        format: PayloadFormat,
        signature_field: impl Into<String>,
        signer_field: impl Into<String>,
    ) -> Self {
        Self {
            format,
            signature_field: signature_field.into(),
            signer_field: signer_field.into(),
        }
    }

    pub fn format(&self) -> PayloadFormat {
        self.format
    }

    pub fn signature_field(&self) -> &str {
        &self.signature_field
    }

    /// Reads only; calling it twice without a state change yields identical bytes.
    pub fn validate_and_encode(
        &self,
        name: &str,
        presence: SignaturePresence,
        surface: &SurfaceGeometryManager,
    ) -> SubmitResult<SignaturePayload> {
        if name.trim().is_empty() {
            return Err(SubmitError::MissingName);
        }
        if !presence.has_mark() {
            return Err(SubmitError::MissingSignature);
        }
        if !surface.is_ready() {
            return Err(SubmitError::SurfaceNotReady);
        }

        let png = surface.encode_png().map_err(|err| match err {
            SurfaceError::NotReady => SubmitError::SurfaceNotReady,
            other => SubmitError::Encode(other),
        })?;
        let payload = SignaturePayload::from_png(png);
        if payload.is_empty() {
            return Err(SubmitError::Encode(SurfaceError::PixelLayout));
        }
        tracing::debug!(
            bytes = payload.png_bytes().len(),
            presence = presence.as_str(),
            "signature encoded"
        );
        Ok(payload)
    }

    pub fn build_form(
        &self,
        name: &str,
        payload: &SignaturePayload,
        location: Option<Coordinates>,
    ) -> FormFields {
        let mut form = FormFields::default();
        form.insert(
            self.signature_field.as_str(),
            payload.transmission_value(self.format),
        );
        form.insert(self.signer_field.as_str(), name.trim());
        if let Some(coordinates) = location {
            form.insert(LATITUDE_FIELD, coordinates.latitude.to_string());
            form.insert(LONGITUDE_FIELD, coordinates.longitude.to_string());
        }
        form
    }
}
