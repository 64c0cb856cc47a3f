use anyhow::Result;
use colored::Colorize;

use crate::cli::ConfigCommands;
use crate::config::Config;

pub fn run(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => show(),
        ConfigCommands::Set { key, value } => set(&key, &value),
    }
}

fn show() -> Result<()> {
    let path = Config::path()?;
    let config = Config::load_from(&path)?;
    if path.exists() {
        println!("{} {}", "Config:".bold(), path.display());
    } else {
        println!(
            "{} {} {}",
            "Config:".bold(),
            path.display(),
            "(not found, showing defaults)".dimmed()
        );
    }
    println!();
    print!("{}", serde_yaml::to_string(&config.redacted())?);

    println!();
    println!("{}", "Effective settings:".bold());
    println!("  session.max_attempts: {}", config.max_attempts());
    println!("  sms.country_code:     {}", config.country_code());
    println!("  http.timeout_secs:    {}", config.http_timeout().as_secs());
    let format = config.render().format;
    let note = if format.draws_labels() { "" } else { " (no labels)" };
    println!("  render.format:        {format}{note}");
    println!("  drive:                {}", status(config.drive_access_token().is_some()));
    println!("  twilio:               {}", status(config.twilio_credentials().is_some()));
    Ok(())
}

fn status(configured: bool) -> colored::ColoredString {
    if configured {
        "configured".green()
    } else {
        "not configured".yellow()
    }
}

fn set(key: &str, value: &str) -> Result<()> {
    let path = Config::path()?;
    let mut config = Config::load_from(&path)?;
    config.set(key, value)?;
    config.save_to(&path)?;
    println!(
        "{} {key} = {value} ({})",
        "Set".green(),
        path.display()
    );
    Ok(())
}
