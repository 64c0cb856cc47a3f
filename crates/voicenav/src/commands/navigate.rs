use anyhow::Result;
use colored::Colorize;
use log::debug;

use crate::config::Config;
use crate::delivery::{self, GoogleDrive, QrCodeWriter, RouteImageRenderer, TwilioSms};
use crate::navigation::LocationGraph;
use crate::session::{Session, SessionContext, SessionOutcome, SessionSettings};
use crate::voice::TerminalVoice;

/// Run one interactive session with the collaborators named in the config.
pub fn run(quiet: bool) -> Result<()> {
    let config = Config::load_or_default();
    let graph = LocationGraph::campus()?;
    debug!(
        "Campus graph: {} locations, {} paths",
        graph.location_count(),
        graph.edge_count()
    );

    let render = config.render();
    let agent = delivery::http_agent(config.http_timeout());
    let renderer = RouteImageRenderer::from_config(&render);
    let storage = GoogleDrive::new(agent.clone(), config.drive_access_token());
    let qr = QrCodeWriter::new(renderer.output_dir.clone(), renderer.display);
    let sms = TwilioSms::new(agent, config.twilio_credentials());
    let mut voice = TerminalVoice::new(config.tts_command());

    if !quiet {
        let names: Vec<&str> = graph.locations().collect();
        println!("{} {}", "Locations:".bold(), names.join(", ").dimmed());
        println!();
    }

    let outcome = Session::new(SessionContext {
        graph: &graph,
        voice: &mut voice,
        renderer: &renderer,
        storage: &storage,
        qr: &qr,
        sms: &sms,
        settings: SessionSettings {
            max_attempts: config.max_attempts(),
            country_code: config.country_code(),
        },
    })
    .run();

    match outcome {
        SessionOutcome::Aborted(e) => anyhow::bail!("Session aborted: {e}"),
        SessionOutcome::Delivered(_) | SessionOutcome::Declined => Ok(()),
        other => {
            if !quiet {
                println!("{}", other.to_string().yellow());
            }
            Ok(())
        }
    }
}
