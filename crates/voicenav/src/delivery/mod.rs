//! Getting a rendered route to the user: image, upload, QR code, SMS.
//!
//! Each step is a trait so the session can run against fakes. Upload and SMS
//! block on HTTP through a shared [`ureq::Agent`] with a global timeout; images
//! and QR codes are produced locally.

pub mod drive;
pub mod phone;
pub mod qr;
pub mod route_image;
pub mod sms;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;

use crate::navigation::Coord;

pub use drive::GoogleDrive;
pub use phone::{PhoneError, PhoneNumber, normalize_phone};
pub use qr::QrCodeWriter;
pub use route_image::RouteImageRenderer;
pub use sms::TwilioSms;

/// Draws a route layout to a file.
pub trait ImageRenderer {
    /// `labels` has one entry per coordinate.
    fn render(&self, coordinates: &[Coord], labels: &[String]) -> Result<PathBuf>;
}

/// Stores a file and returns a link anyone can open.
pub trait CloudStorage {
    fn upload(&self, path: &Path) -> Result<String>;
}

/// Turns a link into a QR code image.
pub trait QrGenerator {
    fn encode(&self, url: &str) -> Result<PathBuf>;
}

/// Sends a text message.
pub trait SmsGateway {
    fn send(&self, to: &PhoneNumber, body: &str) -> Result<DeliveryReceipt>;
}

/// Provider acknowledgement of an accepted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub id: String,
    pub status: String,
}

/// HTTP agent shared by the network collaborators.
pub fn http_agent(timeout: Duration) -> ureq::Agent {
    ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .build()
        .into()
}

/// Open a file in the system viewer, logging instead of failing.
pub fn show(path: &Path) {
    if let Err(e) = open::that(path) {
        log::warn!("Could not open {}: {e}", path.display());
    }
}
