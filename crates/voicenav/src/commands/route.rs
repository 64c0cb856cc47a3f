use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use crate::config::Config;
use crate::delivery::{ImageRenderer, RouteImageRenderer};
use crate::navigation::{self, LocationGraph};

pub fn run(start: &str, end: &str, image: Option<&Path>, json: bool) -> Result<()> {
    let graph = LocationGraph::campus()?;
    let (path, description) = navigation::plan_route(&graph, start, end)?;

    if json {
        let report = serde_json::json!({
            "path": path,
            "directions": description,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{} {} to {}", "Route:".bold(), path.start(), path.end());
        println!("{} {}", "Via:".bold(), path.locations().join(" -> "));
        println!("{} {} m", "Distance:".bold(), path.distance());
        println!();
        for (i, step) in description.steps.iter().enumerate() {
            println!("  {}. {}", i + 1, step.text);
        }
        println!("  {}", description.arrival.green());
        println!();
        let points: Vec<String> = description
            .coordinates
            .iter()
            .map(ToString::to_string)
            .collect();
        println!("{} {}", "Layout:".bold(), points.join(" ").dimmed());
    }

    if let Some(target) = image {
        let config = Config::load_or_default();
        let renderer = RouteImageRenderer::from_config(&config.render()).with_file(target)?;
        let written = renderer.render(&description.coordinates, &description.labels)?;
        if !json {
            println!();
            println!("{} {}", "Image:".bold(), written.display());
        }
    }
    Ok(())
}
