use anyhow::{Context, Result};
use log::{debug, info};
use serde::Deserialize;

use super::{DeliveryReceipt, PhoneNumber, SmsGateway};
use crate::config::TwilioCredentials;

const API_BASE: &str = "https://api.twilio.com/2010-04-01";

/// Message resource returned by the Twilio Messages API.
#[derive(Debug, Deserialize)]
struct MessageResource {
    sid: String,
    #[serde(default)]
    status: Option<String>,
}

/// SMS delivery through Twilio.
pub struct TwilioSms {
    agent: ureq::Agent,
    credentials: Option<TwilioCredentials>,
}

impl TwilioSms {
    pub fn new(agent: ureq::Agent, credentials: Option<TwilioCredentials>) -> Self {
        Self { agent, credentials }
    }

    fn credentials(&self) -> Result<&TwilioCredentials> {
        self.credentials.as_ref().ok_or_else(|| {
            anyhow::anyhow!(
                "Twilio is not configured. Set twilio.account_sid, twilio.auth_token and \
                 twilio.from_number or the TWILIO_* environment variables."
            )
        })
    }
}

impl SmsGateway for TwilioSms {
    fn send(&self, to: &PhoneNumber, body: &str) -> Result<DeliveryReceipt> {
        let creds = self.credentials()?;
        debug!("Sending {} character SMS to {to}", body.chars().count());

        let message: MessageResource = self
            .agent
            .post(messages_url(&creds.account_sid))
            .header("Authorization", &basic_auth(creds))
            .send_form([
                ("To", to.as_str()),
                ("From", creds.from_number.as_str()),
                ("Body", body),
            ])
            .context("Failed to call Twilio API")?
            .body_mut()
            .read_json()
            .context("Failed to parse Twilio response")?;

        let receipt = DeliveryReceipt {
            id: message.sid,
            status: message.status.unwrap_or_else(|| "queued".to_string()),
        };
        info!("SMS {} accepted with status {}", receipt.id, receipt.status);
        Ok(receipt)
    }
}

fn messages_url(account_sid: &str) -> String {
    format!("{API_BASE}/Accounts/{account_sid}/Messages.json")
}

fn basic_auth(creds: &TwilioCredentials) -> String {
    use base64::Engine;
    let raw = format!("{}:{}", creds.account_sid, creds.auth_token);
    format!(
        "Basic {}",
        base64::engine::general_purpose::STANDARD.encode(raw)
    )
}
