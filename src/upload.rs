//! Image picking and upload to the third-party image host
//!
//! The host takes a `multipart/form-data` POST with a `file` part and an
//! `upload_preset` part, and answers with JSON carrying `secure_url`.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use awc::{http::header, Client};
use serde::Deserialize;
use uuid::Uuid;

use crate::core::{data::server_message, settings::Settings};
use crate::error::{Error, Result};

const MAX_RESPONSE_SIZE: usize = 256 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedImage {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Source of user-picked images, gated by photo-library permission.
pub trait MediaLibrary {
    fn request_permission(&self) -> Permission;

    /// `Ok(None)` when the user backed out of the picker.
    fn pick_image(&self) -> Result<Option<PickedImage>>;
}

/// A single image file on disk.
#[derive(Debug, Clone)]
pub struct LocalImage {
    path: PathBuf,
}

impl LocalImage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        LocalImage { path: path.into() }
    }
}

impl MediaLibrary for LocalImage {
    fn request_permission(&self) -> Permission {
        match fs::File::open(&self.path) {
            Err(error) if error.kind() == ErrorKind::PermissionDenied => Permission::Denied,
            _ => Permission::Granted,
        }
    }

    fn pick_image(&self) -> Result<Option<PickedImage>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                tracing::debug!("No image at {}", self.path.display());
                return Ok(None);
            }
            Err(error) => return Err(error.into()),
        };
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image.jpg".to_string());
        Ok(Some(PickedImage {
            content_type: content_type_for(&self.path).to_string(),
            file_name,
            bytes,
        }))
    }
}

fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|extension| extension.to_string_lossy().to_ascii_lowercase());
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        _ => "image/jpeg",
    }
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
}

pub struct ImageUploader {
    client: Client,
    upload_url: String,
    upload_preset: String,
}

impl ImageUploader {
    pub fn new(settings: &Settings) -> Self {
        let client = Client::builder().timeout(settings.timeout()).finish();
        Self::with_client(
            &settings.upload_url.value,
            &settings.upload_preset.value,
            client,
        )
    }

    pub fn with_client(upload_url: &str, upload_preset: &str, client: Client) -> Self {
        ImageUploader {
            client,
            upload_url: upload_url.to_string(),
            upload_preset: upload_preset.to_string(),
        }
    }

    /// Checks permission, lets the user pick, then uploads.
    ///
    /// Never touches the network when permission is denied. `Ok(None)`
    /// means the pick was cancelled.
    pub async fn pick_and_upload(&self, library: &impl MediaLibrary) -> Result<Option<String>> {
        if library.request_permission() == Permission::Denied {
            tracing::warn!("Photo library access denied");
            return Err(Error::PermissionDenied);
        }
        match library.pick_image()? {
            Some(image) => self.upload(&image).await.map(Some),
            None => Ok(None),
        }
    }

    pub async fn upload(&self, image: &PickedImage) -> Result<String> {
        let boundary = format!("folio-{}", Uuid::new_v4().simple());
        let body = multipart_body(&boundary, image, &self.upload_preset);

        let mut response = self
            .client
            .post(&self.upload_url)
            .insert_header((
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", boundary),
            ))
            .send_body(body)
            .await
            .map_err(|error| Error::upload_failed(error.to_string()))?;

        let status = response.status();
        let body = response
            .body()
            .limit(MAX_RESPONSE_SIZE)
            .await
            .map_err(|error| Error::upload_failed(error.to_string()))?;

        let secure_url = serde_json::from_slice::<UploadResponse>(&body)
            .ok()
            .and_then(|response| response.secure_url)
            .filter(|url| !url.trim().is_empty());
        match secure_url {
            Some(url) if status.is_success() => {
                tracing::info!("Uploaded {} ({} bytes)", image.file_name, image.bytes.len());
                Ok(url)
            }
            _ => {
                let reason = server_message(&body)
                    .unwrap_or_else(|| "Failed to upload image to the image host".to_string());
                tracing::warn!("Image upload rejected with {}: {}", status.as_u16(), reason);
                Err(Error::upload_failed(reason))
            }
        }
    }
}

fn multipart_body(boundary: &str, image: &PickedImage, upload_preset: &str) -> Vec<u8> {
    let mut body = Vec::with_capacity(image.bytes.len() + 512);
    body.extend_from_slice(
        format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{name}\"\r\n\
             Content-Type: {content_type}\r\n\r\n",
            boundary = boundary,
            name = image.file_name.replace('"', "_"),
            content_type = image.content_type,
        )
        .as_bytes(),
    );
    body.extend_from_slice(&image.bytes);
    body.extend_from_slice(
        format!(
            "\r\n--{boundary}\r\n\
             Content-Disposition: form-data; name=\"upload_preset\"\r\n\r\n\
             {preset}\r\n\
             --{boundary}--\r\n",
            boundary = boundary,
            preset = upload_preset,
        )
        .as_bytes(),
    );
    body
}
