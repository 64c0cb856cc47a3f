use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const FILENAME: &str = "config.yaml";
const APP_DIR: &str = "voicenav";

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_COUNTRY_CODE: &str = "+91";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const VALID_KEYS: &str = "session.max_attempts, voice.tts_command, render.format, \
    render.output_dir, render.display, render.width, render.height, sms.country_code, \
    http.timeout_secs, drive.access_token, twilio.account_sid, \
    twilio.auth_token, twilio.from_number";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<VoiceConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render: Option<RenderConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sms: Option<SmsConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http: Option<HttpConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drive: Option<DriveConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twilio: Option<TwilioConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// How many times a question is asked before giving up.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VoiceConfig {
    /// Speech synthesizer command; the text is passed as the last argument.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tts_command: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default)]
    pub format: ImageFormat,

    /// Where route images are written. Defaults to the system temp directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,

    /// Open rendered images in the system viewer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImageFormat {
    /// Segments, markers and the per-point name and distance labels.
    #[default]
    Svg,
    /// Segments and start/finish markers only; labels are not drawn.
    Png,
}

impl ImageFormat {
    /// Whether point labels appear in the image.
    pub fn draws_labels(&self) -> bool {
        matches!(self, Self::Svg)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
        }
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SmsConfig {
    /// Calling code prefixed to 10-digit national numbers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DriveConfig {
    /// OAuth access token. If not set, falls back to GOOGLE_DRIVE_ACCESS_TOKEN.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl DriveConfig {
    pub const ENV_TOKEN: &'static str = "GOOGLE_DRIVE_ACCESS_TOKEN";

    /// Resolve the access token from config or environment variable.
    pub fn resolve_access_token(&self) -> Option<String> {
        non_empty(self.access_token.as_deref()).or_else(|| env_var(Self::ENV_TOKEN))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TwilioConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_sid: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,

    /// Sender number in E.164 form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_number: Option<String>,
}

/// Fully resolved Twilio credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TwilioCredentials {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
}

impl TwilioConfig {
    pub const ENV_ACCOUNT_SID: &'static str = "TWILIO_ACCOUNT_SID";
    pub const ENV_AUTH_TOKEN: &'static str = "TWILIO_AUTH_TOKEN";
    pub const ENV_FROM_NUMBER: &'static str = "TWILIO_PHONE_NUMBER";

    /// Resolve credentials, each field falling back to its environment variable.
    pub fn resolve(&self) -> Option<TwilioCredentials> {
        Some(TwilioCredentials {
            account_sid: non_empty(self.account_sid.as_deref())
                .or_else(|| env_var(Self::ENV_ACCOUNT_SID))?,
            auth_token: non_empty(self.auth_token.as_deref())
                .or_else(|| env_var(Self::ENV_AUTH_TOKEN))?,
            from_number: non_empty(self.from_number.as_deref())
                .or_else(|| env_var(Self::ENV_FROM_NUMBER))?,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR).join(FILENAME))
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
    }

    /// Load `path`, starting from defaults only when the file does not exist.
    ///
    /// Unreadable or malformed files are errors, so callers that save
    /// afterwards never overwrite settings they failed to parse.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse config {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(anyhow::anyhow!("Failed to read config: {e}")),
        }
    }

    /// Settings for a run. A broken config file is logged and ignored.
    pub fn load_or_default() -> Self {
        Self::path()
            .and_then(|path| Self::load_from(&path))
            .unwrap_or_else(|e| {
                log::warn!("{e:#}; using default settings");
                Self::default()
            })
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        let contents = format!("# voicenav configuration\n{yaml}");
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn max_attempts(&self) -> u32 {
        self.session
            .as_ref()
            .and_then(|s| s.max_attempts)
            .unwrap_or(DEFAULT_MAX_ATTEMPTS)
    }

    pub fn tts_command(&self) -> Option<Vec<String>> {
        self.voice.as_ref().and_then(|v| v.tts_command.clone())
    }

    pub fn render(&self) -> RenderConfig {
        self.render.clone().unwrap_or_default()
    }

    pub fn country_code(&self) -> String {
        self.sms
            .as_ref()
            .and_then(|s| non_empty(s.country_code.as_deref()))
            .unwrap_or_else(|| DEFAULT_COUNTRY_CODE.to_string())
    }

    pub fn http_timeout(&self) -> Duration {
        let secs = self
            .http
            .as_ref()
            .and_then(|h| h.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    pub fn drive_access_token(&self) -> Option<String> {
        self.drive.clone().unwrap_or_default().resolve_access_token()
    }

    pub fn twilio_credentials(&self) -> Option<TwilioCredentials> {
        self.twilio.clone().unwrap_or_default().resolve()
    }

    /// Copy with secrets masked, for display.
    pub fn redacted(&self) -> Self {
        let mask = |v: &Option<String>| v.as_ref().map(|_| "********".to_string());
        let mut out = self.clone();
        if let Some(drive) = out.drive.as_mut() {
            drive.access_token = mask(&drive.access_token);
        }
        if let Some(twilio) = out.twilio.as_mut() {
            twilio.auth_token = mask(&twilio.auth_token);
        }
        out
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "session.max_attempts" => {
                let attempts: u32 = value
                    .parse()
                    .ok()
                    .filter(|n| *n >= 1)
                    .ok_or_else(|| {
                        anyhow::anyhow!("Invalid max_attempts: {value}. Must be a positive integer.")
                    })?;
                self.session
                    .get_or_insert_with(SessionConfig::default)
                    .max_attempts = Some(attempts);
            }
            "voice.tts_command" => {
                let parts: Vec<String> = value.split_whitespace().map(str::to_string).collect();
                self.voice.get_or_insert_with(VoiceConfig::default).tts_command =
                    if parts.is_empty() { None } else { Some(parts) };
            }
            "render.format" => {
                let format = match value {
                    "svg" => ImageFormat::Svg,
                    "png" => ImageFormat::Png,
                    _ => anyhow::bail!(
                        "Invalid format: {value}. Must be 'svg' (labelled) or 'png' (markers only, no labels)."
                    ),
                };
                self.render.get_or_insert_with(RenderConfig::default).format = format;
            }
            "render.output_dir" => {
                self.render.get_or_insert_with(RenderConfig::default).output_dir =
                    Some(PathBuf::from(value));
            }
            "render.display" => {
                let display = match value {
                    "true" | "yes" | "on" => true,
                    "false" | "no" | "off" => false,
                    _ => anyhow::bail!("Invalid display: {value}. Must be 'true' or 'false'."),
                };
                self.render.get_or_insert_with(RenderConfig::default).display = Some(display);
            }
            "render.width" | "render.height" => {
                let pixels: u32 = value
                    .parse()
                    .ok()
                    .filter(|n| (100..=8000).contains(n))
                    .ok_or_else(|| {
                        anyhow::anyhow!("Invalid size: {value}. Must be between 100 and 8000.")
                    })?;
                let render = self.render.get_or_insert_with(RenderConfig::default);
                if key == "render.width" {
                    render.width = Some(pixels);
                } else {
                    render.height = Some(pixels);
                }
            }
            "sms.country_code" => {
                let digits = value.strip_prefix('+').unwrap_or_default();
                if digits.is_empty()
                    || digits.len() > 3
                    || !digits.chars().all(|c| c.is_ascii_digit())
                {
                    anyhow::bail!("Invalid country code: {value}. Must look like '+91'.");
                }
                self.sms.get_or_insert_with(SmsConfig::default).country_code =
                    Some(value.to_string());
            }
            "http.timeout_secs" => {
                let secs: u64 = value
                    .parse()
                    .ok()
                    .filter(|n| *n >= 1)
                    .ok_or_else(|| {
                        anyhow::anyhow!("Invalid timeout: {value}. Must be a positive integer.")
                    })?;
                self.http.get_or_insert_with(HttpConfig::default).timeout_secs = Some(secs);
            }
            "drive.access_token" => {
                self.drive.get_or_insert_with(DriveConfig::default).access_token =
                    Some(value.to_string());
            }
            "twilio.account_sid" => {
                self.twilio.get_or_insert_with(TwilioConfig::default).account_sid =
                    Some(value.to_string());
            }
            "twilio.auth_token" => {
                self.twilio.get_or_insert_with(TwilioConfig::default).auth_token =
                    Some(value.to_string());
            }
            "twilio.from_number" => {
                if !value.starts_with('+') {
                    anyhow::bail!("Invalid from_number: {value}. Must be in E.164 form (+...).");
                }
                self.twilio.get_or_insert_with(TwilioConfig::default).from_number =
                    Some(value.to_string());
            }
            _ => anyhow::bail!("Unknown config key: {key}. Valid keys: {VALID_KEYS}"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_file() {
        let config = Config::default();
        assert_eq!(config.max_attempts(), DEFAULT_MAX_ATTEMPTS);
        assert_eq!(config.country_code(), "+91");
        assert_eq!(config.http_timeout(), Duration::from_secs(30));
        assert_eq!(config.render().format, ImageFormat::Svg);
        assert!(config.tts_command().is_none());
    }

    #[test]
    fn set_and_reload_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(FILENAME);

        let mut config = Config::default();
        config.set("session.max_attempts", "3").unwrap();
        config.set("voice.tts_command", "espeak -s 150").unwrap();
        config.set("render.format", "png").unwrap();
        config.set("render.display", "false").unwrap();
        config.set("sms.country_code", "+44").unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.max_attempts(), 3);
        assert_eq!(
            loaded.tts_command().unwrap(),
            ["espeak", "-s", "150"].map(String::from)
        );
        assert_eq!(loaded.render().format, ImageFormat::Png);
        assert_eq!(loaded.render().display, Some(false));
        assert_eq!(loaded.country_code(), "+44");
    }

    #[test]
    fn rejects_invalid_values() {
        let mut config = Config::default();
        assert!(config.set("session.max_attempts", "0").is_err());
        assert!(config.set("render.format", "gif").is_err());
        assert!(config.set("render.width", "5").is_err());
        assert!(config.set("sms.country_code", "91").is_err());
        assert!(config.set("sms.country_code", "+9a").is_err());
        assert!(config.set("qr.endpoint", "https://x").is_err());
        assert!(config.set("twilio.from_number", "5550100").is_err());
        assert!(config.set("nonsense.key", "1").is_err());
    }

    #[test]
    fn malformed_file_is_not_replaced_by_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FILENAME);
        let original = "twilio:\n  account_sid: AC1\n  auth_token: [unterminated\n";
        std::fs::write(&path, original).unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn absent_file_starts_from_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join(FILENAME)).unwrap();
        assert_eq!(config.max_attempts(), DEFAULT_MAX_ATTEMPTS);
        assert!(config.twilio.is_none());
    }

    #[test]
    fn retired_sections_are_ignored() {
        let yaml = "qr:\n  endpoint: https://example.com/qr\nsms:\n  country_code: '+44'\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.country_code(), "+44");
    }

    #[test]
    fn png_format_is_unlabelled() {
        assert!(ImageFormat::Svg.draws_labels());
        assert!(!ImageFormat::Png.draws_labels());
        let err = Config::default().set("render.format", "gif").unwrap_err();
        assert!(err.to_string().contains("no labels"));
    }

    #[test]
    fn parses_partial_yaml() {
        let yaml = "render:\n  format: png\n  width: 640\nhttp:\n  timeout_secs: 5\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.render().format, ImageFormat::Png);
        assert_eq!(config.render().width, Some(640));
        assert_eq!(config.http_timeout(), Duration::from_secs(5));
        assert_eq!(config.max_attempts(), DEFAULT_MAX_ATTEMPTS);
    }

    #[test]
    fn configured_secrets_take_precedence() {
        let twilio = TwilioConfig {
            account_sid: Some("AC123".into()),
            auth_token: Some("secret".into()),
            from_number: Some("+15550100".into()),
        };
        let creds = twilio.resolve().unwrap();
        assert_eq!(creds.account_sid, "AC123");
        assert_eq!(creds.from_number, "+15550100");

        let drive = DriveConfig {
            access_token: Some("ya29.token".into()),
        };
        assert_eq!(drive.resolve_access_token().as_deref(), Some("ya29.token"));
    }

    #[test]
    fn redacted_hides_tokens() {
        let mut config = Config::default();
        config.set("drive.access_token", "ya29.secret").unwrap();
        config.set("twilio.auth_token", "hunter2").unwrap();
        config.set("twilio.account_sid", "AC1").unwrap();
        let shown = serde_yaml::to_string(&config.redacted()).unwrap();
        assert!(!shown.contains("ya29.secret"));
        assert!(!shown.contains("hunter2"));
        assert!(shown.contains("AC1"));
    }
}
