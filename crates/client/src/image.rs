//! Service images.
//!
//! Uploads are sent as base64 `data:` URLs. The client also keeps its own
//! copy per service id so a freshly added service shows its image even when
//! the backend does not echo `imageData` back.

use std::fs;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use glc_core::{Service, ServiceId};

use crate::error::ValidationError;
use crate::store::{KeyValueStore, StoreError, keys};

/// Shown when neither the client nor the backend has an image.
pub const PLACEHOLDER_IMAGE: &str = "/images2/default_profile.jpg";

/// MIME type guessed from the file extension.
#[must_use]
pub fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Encode raw bytes as a `data:` URL.
#[must_use]
pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Read an image file into a `data:` URL.
///
/// # Errors
///
/// Returns [`ValidationError::Image`] if the file cannot be read.
pub fn load_data_url(path: &Path) -> Result<String, ValidationError> {
    let bytes = fs::read(path).map_err(|e| ValidationError::Image {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    Ok(data_url(mime_for(path), &bytes))
}

/// Remember the image uploaded for `id`.
///
/// # Errors
///
/// Returns an error if the store cannot be written.
pub fn cache_service_image(
    store: &mut impl KeyValueStore,
    id: ServiceId,
    data: &str,
) -> Result<(), StoreError> {
    store.set(&keys::service_image(id), data.to_string())
}

/// The image uploaded for `id` from this client, if any.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn cached_service_image(
    store: &impl KeyValueStore,
    id: ServiceId,
) -> Result<Option<String>, StoreError> {
    Ok(store
        .get(&keys::service_image(id))?
        .filter(|v| !v.is_empty()))
}

/// Drop the cached image for `id`.
///
/// # Errors
///
/// Returns an error if the store cannot be written.
pub fn forget_service_image(store: &mut impl KeyValueStore, id: ServiceId) -> Result<(), StoreError> {
    store.remove(&keys::service_image(id))
}

/// Where a service card's image comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Uploaded from this client.
    Cached(String),
    /// `imageData` returned by the backend.
    Server(String),
    Placeholder,
}

impl ImageSource {
    /// Pick the image for `service`: client cache, then backend, then placeholder.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn resolve(store: &impl KeyValueStore, service: &Service) -> Result<Self, StoreError> {
        if let Some(cached) = cached_service_image(store, service.id)? {
            return Ok(Self::Cached(cached));
        }
        Ok(service
            .image_data
            .as_deref()
            .filter(|d| !d.is_empty())
            .map_or(Self::Placeholder, |d| Self::Server(d.to_string())))
    }

    /// Image URL to show.
    #[must_use]
    pub fn src(&self) -> &str {
        match self {
            Self::Cached(src) | Self::Server(src) => src,
            Self::Placeholder => PLACEHOLDER_IMAGE,
        }
    }

    /// Short label for text output.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Cached(_) => "uploaded from this device",
            Self::Server(_) => "from server",
            Self::Placeholder => "default",
        }
    }
}
