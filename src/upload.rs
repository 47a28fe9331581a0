//! Clipboard image upload pipeline.
//!
//! The controller takes whatever image is on the pasteboard, compresses it,
//! builds a thumbnail and hands both to an [`Uploader`]. Network hosts are
//! plugged in through that trait.

use std::borrow::Cow;

use image::{DynamicImage, RgbaImage};

use crate::config::AppConfig;
use crate::error::{CuImageError, CuImageResult, OptionExt};
use crate::hosts::{QiniuHostInfo, SupportedHost};
use crate::imaging::ImageConvenience;
use crate::preferences::keys::{CURRENT_HOST, QINIU_HOST_INFO};
use crate::preferences::PreferenceManager;

/// Source of the image to upload.
pub trait Pasteboard {
    /// The image currently on the pasteboard, if any.
    fn image(&self) -> Option<DynamicImage>;
}

/// The system clipboard.
#[derive(Debug, Default)]
pub struct SystemPasteboard;

impl SystemPasteboard {
    pub fn new() -> Self {
        Self
    }
}

impl Pasteboard for SystemPasteboard {
    fn image(&self) -> Option<DynamicImage> {
        let mut clipboard = match arboard::Clipboard::new() {
            Ok(clipboard) => clipboard,
            Err(e) => {
                log::warn!("[UPLOAD] Clipboard unavailable: {}", e);
                return None;
            },
        };

        let data = match clipboard.get_image() {
            Ok(data) => data,
            Err(e) => {
                log::debug!("[UPLOAD] No image on the clipboard: {}", e);
                return None;
            },
        };

        let (width, height) = (data.width as u32, data.height as u32);
        let bytes: Cow<'_, [u8]> = data.bytes;
        RgbaImage::from_raw(width, height, bytes.into_owned())
            .map(DynamicImage::ImageRgba8)
            .or_else(|| {
                log::warn!("[UPLOAD] Clipboard image has a malformed {}x{} buffer", width, height);
                None
            })
    }
}

/// An image ready to hand to a host.
#[derive(Debug, Clone)]
pub struct PreparedUpload {
    pub host: SupportedHost,
    pub file_name: String,
    /// JPEG bytes
    pub data: Vec<u8>,
    pub thumbnail: Option<DynamicImage>,
    pub host_info: QiniuHostInfo,
}

/// Delivers prepared images to a host.
pub trait Uploader {
    fn upload(&self, upload: PreparedUpload) -> CuImageResult<()>;
}

/// Uploader that only logs what it would send.
#[derive(Debug, Default)]
pub struct LoggingUploader;

impl Uploader for LoggingUploader {
    fn upload(&self, upload: PreparedUpload) -> CuImageResult<()> {
        if !upload.host_info.is_configured() {
            log::warn!("[UPLOAD] {} account is not configured", upload.host);
        }
        log::info!(
            "[UPLOAD] {} to {}: {} bytes, thumbnail {}",
            upload.file_name,
            upload.host,
            upload.data.len(),
            upload
                .thumbnail
                .as_ref()
                .map(|t| format!("{}x{}", t.width(), t.height()))
                .unwrap_or_else(|| "none".to_string())
        );
        Ok(())
    }
}

/// Turns pasteboard images into uploads.
pub struct UploadController<P: Pasteboard, U: Uploader> {
    pasteboard: P,
    uploader: U,
    compression_factor: f32,
    thumbnail_max_size: f32,
}

impl<P: Pasteboard, U: Uploader> UploadController<P, U> {
    pub fn new(pasteboard: P, uploader: U, config: &AppConfig) -> Self {
        Self {
            pasteboard,
            uploader,
            compression_factor: config.compression_factor,
            thumbnail_max_size: config.thumbnail_max_size,
        }
    }

    /// Upload the pasteboard image to the current host.
    ///
    /// Returns the uploaded file name. Failures are logged and yield `None`.
    pub fn upload_image_on_pasteboard(&self, preferences: &PreferenceManager) -> Option<String> {
        let prepared = match self.prepare(preferences) {
            Ok(prepared) => prepared,
            Err(e) => {
                log::warn!("[UPLOAD] Nothing uploaded: {}", e);
                return None;
            },
        };

        let file_name = prepared.file_name.clone();
        match self.uploader.upload(prepared) {
            Ok(()) => Some(file_name),
            Err(e) => {
                log::error!("[UPLOAD] Failed to upload {}: {}", file_name, e);
                None
            },
        }
    }

    fn prepare(&self, preferences: &PreferenceManager) -> CuImageResult<PreparedUpload> {
        let host = current_host(preferences);

        let image = self
            .pasteboard
            .image()
            .ok_or_else(|| CuImageError::Clipboard("no image on the pasteboard".to_string()))?;

        let data = image.compressed_data(self.compression_factor).with_context(|| {
            format!(
                "failed to compress {}x{} image at factor {}",
                image.width(),
                image.height(),
                self.compression_factor
            )
        })?;

        let thumbnail = image.bounded_thumbnail(self.thumbnail_max_size);
        if thumbnail.is_none() {
            log::debug!("[UPLOAD] No thumbnail at max size {}", self.thumbnail_max_size);
        }

        let host_info = QiniuHostInfo::from_dictionary(&preferences.get(QINIU_HOST_INFO))
            .unwrap_or_default();

        Ok(PreparedUpload {
            host,
            file_name: upload_file_name(),
            data,
            thumbnail,
            host_info,
        })
    }
}

/// The host chosen in preferences, falling back to the default host.
pub fn current_host(preferences: &PreferenceManager) -> SupportedHost {
    let name = preferences.get(CURRENT_HOST);
    name.parse().unwrap_or_else(|e| {
        log::warn!("[UPLOAD] {}, using {}", e, SupportedHost::default());
        SupportedHost::default()
    })
}

/// `<local timestamp>.jpg`
fn upload_file_name() -> String {
    format!("{}.jpg", chrono::Local::now().format("%Y%m%d%H%M%S%3f"))
}
