//! One voice navigation session, from asking for the endpoints to delivering
//! the route.
//!
//! Nothing here returns an error. Every way a session can end is a
//! [`SessionOutcome`], and every user-facing failure is spoken before the
//! session returns.

use std::fmt;
use std::path::PathBuf;

use log::{error, info, warn};

use crate::delivery::{
    CloudStorage, DeliveryReceipt, ImageRenderer, PhoneError, PhoneNumber, QrGenerator,
    SmsGateway, normalize_phone,
};
use crate::navigation::{self, LocationGraph, NavError, RouteDescription};
use crate::voice::{self, PromptError, VoiceIo};

pub const ASK_START: &str = "Please say your starting location:";
pub const ASK_END: &str = "Please say your destination:";
pub const ASK_RECEIVE: &str = "Do you want to receive this route? Say 'Yes' or 'No'.";
pub const ASK_MODE: &str = "Would you like to receive it by QR code or phone number?";
pub const ASK_PHONE: &str = "Please say your phone number digit by digit.";

const INVALID_LOCATION: &str = "Invalid start or end location. Please check and try again.";
const INVALID_PHONE: &str = "Invalid phone number. It should be 10 digits. Please try again.";
const DELIVERY_FAILED: &str = "Sorry, the route could not be delivered.";
const ABORTED: &str = "Sorry, I could not understand you. Ending the session.";
const ROUTE_HEADER: &str = "Route directions:";

/// Tunables read from configuration.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub max_attempts: u32,
    pub country_code: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            max_attempts: crate::config::DEFAULT_MAX_ATTEMPTS,
            country_code: crate::config::DEFAULT_COUNTRY_CODE.to_string(),
        }
    }
}

/// Everything a session talks to.
pub struct SessionContext<'a> {
    pub graph: &'a LocationGraph,
    pub voice: &'a mut dyn VoiceIo,
    pub renderer: &'a dyn ImageRenderer,
    pub storage: &'a dyn CloudStorage,
    pub qr: &'a dyn QrGenerator,
    pub sms: &'a dyn SmsGateway,
    pub settings: SessionSettings,
}

/// How the route reached the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Qr { link: String, image: PathBuf },
    Sms { to: PhoneNumber, receipt: DeliveryReceipt },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Start or destination is not a known location.
    InvalidLocation { start: String, end: String },
    NoPath { start: String, end: String },
    /// Directions were given; the user did not want them delivered.
    Declined,
    /// A prompt produced no answer.
    Aborted(PromptError),
    DeliveryFailed(String),
    InvalidPhone(PhoneError),
    Delivered(Delivery),
}

impl fmt::Display for SessionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLocation { start, end } => {
                write!(f, "invalid location ({start:?} -> {end:?})")
            }
            Self::NoPath { start, end } => write!(f, "no path from {start} to {end}"),
            Self::Declined => f.write_str("route not requested"),
            Self::Aborted(e) => write!(f, "aborted: {e}"),
            Self::DeliveryFailed(reason) => write!(f, "delivery failed: {reason}"),
            Self::InvalidPhone(e) => write!(f, "{e}"),
            Self::Delivered(Delivery::Qr { image, .. }) => {
                write!(f, "delivered by QR code ({})", image.display())
            }
            Self::Delivered(Delivery::Sms { to, receipt }) => {
                write!(f, "delivered by SMS to {to} ({})", receipt.id)
            }
        }
    }
}

pub struct Session<'a> {
    ctx: SessionContext<'a>,
}

impl<'a> Session<'a> {
    pub fn new(ctx: SessionContext<'a>) -> Self {
        Self { ctx }
    }

    /// Run the whole conversation once.
    pub fn run(mut self) -> SessionOutcome {
        let outcome = match self.converse() {
            Ok(outcome) | Err(outcome) => outcome,
        };
        info!("Session finished: {outcome}");
        outcome
    }

    // Early exits travel as `Err` so `?` ends the conversation.
    fn converse(&mut self) -> Result<SessionOutcome, SessionOutcome> {
        let start = self.ask(ASK_START)?;
        let end = self.ask(ASK_END)?;

        let graph = self.ctx.graph;
        if !graph.contains(&start) || !graph.contains(&end) {
            warn!("Unknown location in {start:?} -> {end:?}");
            self.ctx.voice.speak(INVALID_LOCATION);
            return Ok(SessionOutcome::InvalidLocation { start, end });
        }

        let (path, description) = match navigation::plan_route(graph, &start, &end) {
            Ok(planned) => planned,
            Err(NavError::NoPathExists { from, to }) => {
                warn!("No path from {from} to {to}");
                self.ctx
                    .voice
                    .speak(&format!("No path found between {from} and {to}."));
                return Ok(SessionOutcome::NoPath {
                    start: from,
                    end: to,
                });
            }
            Err(e) => {
                error!("Route planning failed: {e}");
                self.ctx.voice.speak(DELIVERY_FAILED);
                return Ok(SessionOutcome::DeliveryFailed(e.to_string()));
            }
        };
        info!("Route {path} ({} m)", path.distance());

        self.recite(&description);

        let choice = self.ask(ASK_RECEIVE)?;
        if !voice::mentions(&choice, "yes") {
            return Ok(SessionOutcome::Declined);
        }
        let mode = self.ask(ASK_MODE)?;

        self.ctx.voice.speak("Generating image of your route.");
        let image = self
            .ctx
            .renderer
            .render(&description.coordinates, &description.labels)
            .map_err(|e| self.delivery_failed("render route image", e))?;

        self.ctx.voice.speak("Uploading image to cloud storage.");
        let link = self
            .ctx
            .storage
            .upload(&image)
            .map_err(|e| self.delivery_failed("upload route image", e))?;

        if voice::mentions(&mode, "qr") {
            self.deliver_qr(link)
        } else {
            self.deliver_sms(&description, &link)
        }
    }

    fn ask(&mut self, question: &str) -> Result<String, SessionOutcome> {
        match voice::ask(&mut *self.ctx.voice, question, self.ctx.settings.max_attempts) {
            Ok(answer) => Ok(answer),
            Err(e) => {
                error!("Giving up on {question:?}: {e}");
                self.ctx.voice.speak(ABORTED);
                Err(SessionOutcome::Aborted(e))
            }
        }
    }

    fn recite(&mut self, description: &RouteDescription) {
        self.ctx.voice.display(ROUTE_HEADER);
        for sentence in description.sentences() {
            self.ctx.voice.speak(sentence);
        }
    }

    fn deliver_qr(&mut self, link: String) -> Result<SessionOutcome, SessionOutcome> {
        self.ctx
            .voice
            .speak("Generating QR code for the route image.");
        let image = self
            .ctx
            .qr
            .encode(&link)
            .map_err(|e| self.delivery_failed("generate QR code", e))?;
        self.ctx
            .voice
            .display(&format!("QR code for drive link: {}", image.display()));
        Ok(SessionOutcome::Delivered(Delivery::Qr { link, image }))
    }

    fn deliver_sms(
        &mut self,
        description: &RouteDescription,
        link: &str,
    ) -> Result<SessionOutcome, SessionOutcome> {
        let spoken = self.ask(ASK_PHONE)?;
        let to = match normalize_phone(&spoken, &self.ctx.settings.country_code) {
            Ok(to) => to,
            Err(e) => {
                warn!("{e}");
                self.ctx.voice.speak(INVALID_PHONE);
                return Ok(SessionOutcome::InvalidPhone(e));
            }
        };

        self.ctx
            .voice
            .speak(&format!("Sending the route image to {to}"));
        let body = sms_body(description, link);
        let receipt = self
            .ctx
            .sms
            .send(&to, &body)
            .map_err(|e| self.delivery_failed("send SMS", e))?;
        self.ctx
            .voice
            .display(&format!("Message sent! SID: {}", receipt.id));
        Ok(SessionOutcome::Delivered(Delivery::Sms { to, receipt }))
    }

    fn delivery_failed(&mut self, action: &str, e: anyhow::Error) -> SessionOutcome {
        error!("Failed to {action}: {e:#}");
        self.ctx.voice.speak(DELIVERY_FAILED);
        SessionOutcome::DeliveryFailed(format!("failed to {action}: {e}"))
    }
}

/// Text message carrying the directions and the image link.
pub fn sms_body(description: &RouteDescription, link: &str) -> String {
    format!(
        "Your route directions:\n{}\n\nView image: {link}",
        description.full_text()
    )
}
