use std::path::PathBuf;

use anyhow::{Context, Result};
use image::{ImageBuffer, Luma};
use log::info;
use qrcode::QrCode;

use super::QrGenerator;

const FILENAME: &str = "drive_link_qr.png";
const MIN_SIZE: u32 = 300;

/// QR codes encoded locally and saved as `drive_link_qr.png`.
pub struct QrCodeWriter {
    output_dir: PathBuf,
    display: bool,
}

impl QrCodeWriter {
    pub fn new(output_dir: PathBuf, display: bool) -> Self {
        Self {
            output_dir,
            display,
        }
    }

    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(FILENAME)
    }
}

/// Black-on-white QR image for `data`, at least [`MIN_SIZE`] pixels square.
pub fn qr_image(data: &str) -> Result<ImageBuffer<Luma<u8>, Vec<u8>>> {
    let code = QrCode::new(data.as_bytes()).context("Failed to encode QR code")?;
    Ok(code
        .render::<Luma<u8>>()
        .min_dimensions(MIN_SIZE, MIN_SIZE)
        .build())
}

impl QrGenerator for QrCodeWriter {
    fn encode(&self, url: &str) -> Result<PathBuf> {
        if url.trim().is_empty() {
            anyhow::bail!("Cannot encode an empty link");
        }
        let img = qr_image(url)?;

        std::fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("Failed to create {}", self.output_dir.display()))?;
        let path = self.output_path();
        img.save(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("QR code for drive link: {}", path.display());

        if self.display {
            super::show(&path);
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINK: &str = "https://drive.google.com/file/d/abc/view";

    #[test]
    fn output_goes_to_configured_dir() {
        let dir = tempfile::tempdir().unwrap();
        let writer = QrCodeWriter::new(dir.path().to_path_buf(), false);
        assert_eq!(writer.output_path(), dir.path().join(FILENAME));
    }

    #[test]
    fn empty_link_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let writer = QrCodeWriter::new(dir.path().to_path_buf(), false);
        assert!(writer.encode("  ").is_err());
        assert!(!dir.path().join(FILENAME).exists());
    }

    #[test]
    fn image_is_square_black_and_white() {
        let img = qr_image(LINK).unwrap();
        assert_eq!(img.width(), img.height());
        assert!(img.width() >= MIN_SIZE);
        assert!(img.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
        assert!(img.pixels().any(|p| p.0[0] == 0));
        // Quiet zone around the symbol.
        assert_eq!(img.get_pixel(0, 0).0[0], 255);
    }

    #[test]
    fn writes_png_without_network() {
        let dir = tempfile::tempdir().unwrap();
        let writer = QrCodeWriter::new(dir.path().join("nested"), false);
        let path = writer.encode(LINK).unwrap();
        assert_eq!(path, dir.path().join("nested").join(FILENAME));
        let saved = image::open(&path).unwrap().to_luma8();
        assert_eq!(saved.dimensions(), qr_image(LINK).unwrap().dimensions());
    }
}
