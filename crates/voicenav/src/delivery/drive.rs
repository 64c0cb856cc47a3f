use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info};
use serde::Deserialize;

use super::CloudStorage;

const UPLOAD_BASE: &str = "https://www.googleapis.com/upload/drive/v3";
const API_BASE: &str = "https://www.googleapis.com/drive/v3";

/// File resource fields returned by the Drive v3 API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveFile {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    web_view_link: Option<String>,
}

/// Uploads route images to Google Drive and shares them with anyone who has the link.
pub struct GoogleDrive {
    agent: ureq::Agent,
    access_token: Option<String>,
}

impl GoogleDrive {
    pub fn new(agent: ureq::Agent, access_token: Option<String>) -> Self {
        Self {
            agent,
            access_token,
        }
    }

    fn token(&self) -> Result<&str> {
        self.access_token.as_deref().ok_or_else(|| {
            anyhow::anyhow!(
                "Google Drive is not configured. Set drive.access_token or the GOOGLE_DRIVE_ACCESS_TOKEN environment variable."
            )
        })
    }
}

impl CloudStorage for GoogleDrive {
    fn upload(&self, path: &Path) -> Result<String> {
        let token = self.token()?;
        let auth = format!("Bearer {token}");
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "route".to_string());
        let bytes =
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;

        debug!("Uploading {} ({} bytes)", path.display(), bytes.len());
        let created: DriveFile = self
            .agent
            .post(format!("{UPLOAD_BASE}/files"))
            .query("uploadType", "media")
            .query("fields", "id")
            .header("Authorization", &auth)
            .header("Content-Type", mime_type(path))
            .send(&bytes[..])
            .context("Failed to upload file to Google Drive")?
            .body_mut()
            .read_json()
            .context("Failed to parse Google Drive upload response")?;

        let file: DriveFile = self
            .agent
            .patch(format!("{API_BASE}/files/{}", created.id))
            .query("fields", "id,name,webViewLink")
            .header("Authorization", &auth)
            .send_json(serde_json::json!({ "name": name }))
            .context("Failed to name uploaded file")?
            .body_mut()
            .read_json()
            .context("Failed to parse Google Drive file metadata")?;

        self.agent
            .post(format!("{API_BASE}/files/{}/permissions", file.id))
            .header("Authorization", &auth)
            .send_json(anyone_reader())
            .context("Failed to share uploaded file")?;

        info!(
            "Uploaded to Google Drive: {}",
            file.name.as_deref().unwrap_or(&name)
        );
        Ok(file
            .web_view_link
            .unwrap_or_else(|| fallback_link(&file.id)))
    }
}

/// Permission granting read access to anyone with the link.
fn anyone_reader() -> serde_json::Value {
    serde_json::json!({
        "type": "anyone",
        "role": "reader"
    })
}

fn fallback_link(id: &str) -> String {
    format!("https://drive.google.com/file/d/{id}/view")
}

fn mime_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::http_agent;
    use std::time::Duration;

    #[test]
    fn unconfigured_upload_fails_before_network() {
        let drive = GoogleDrive::new(http_agent(Duration::from_secs(1)), None);
        let err = drive.upload(Path::new("/nonexistent/route.svg")).unwrap_err();
        assert!(err.to_string().contains("not configured"));
    }

    #[test]
    fn missing_file_is_reported() {
        let drive = GoogleDrive::new(
            http_agent(Duration::from_secs(1)),
            Some("token".into()),
        );
        let err = drive.upload(Path::new("/nonexistent/route.svg")).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }

    #[test]
    fn mime_type_from_extension() {
        assert_eq!(mime_type(Path::new("route.svg")), "image/svg+xml");
        assert_eq!(mime_type(Path::new("route.png")), "image/png");
        assert_eq!(mime_type(Path::new("route")), "application/octet-stream");
    }

    #[test]
    fn share_permission_is_public_read() {
        let perm = anyone_reader();
        assert_eq!(perm["type"], "anyone");
        assert_eq!(perm["role"], "reader");
    }

    #[test]
    fn parses_file_metadata() {
        let file: DriveFile = serde_json::from_str(
            r#"{"id":"abc","name":"route.svg","webViewLink":"https://drive.google.com/file/d/abc/view"}"#,
        )
        .unwrap();
        assert_eq!(file.id, "abc");
        assert_eq!(
            file.web_view_link.as_deref(),
            Some("https://drive.google.com/file/d/abc/view")
        );
        assert_eq!(fallback_link("abc"), "https://drive.google.com/file/d/abc/view");
    }
}
