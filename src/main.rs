mod settings; // brings `settings.rs` in as `crate::settings`
mod terrain; // brings `terrain.rs` in as `crate::terrain`

use anyhow::Context;
use clap::Parser;
use contour_navigation::{PathError, PathResult, Planner};
use nalgebra::Point3;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{self, EnvFilter};

/// Plans slope-limited paths across a configured terrain.
#[derive(Parser, Debug)]
#[command(name = "contour", version, about)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, default_value = settings::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Ad-hoc query source as `x,y,z`; replaces the configured queries
    #[arg(long, value_parser = parse_point, requires = "destination", allow_hyphen_values = true)]
    source: Option<Point3<f32>>,

    /// Ad-hoc query destination as `x,y,z`
    #[arg(long, value_parser = parse_point, requires = "source", allow_hyphen_values = true)]
    destination: Option<Point3<f32>>,
}

fn parse_point(value: &str) -> Result<Point3<f32>, String> {
    let components = value
        .split(',')
        .map(|c| c.trim().parse::<f32>().map_err(|e| format!("`{}`: {}", c.trim(), e)))
        .collect::<Result<Vec<f32>, String>>()?;
    match components.as_slice() {
        [x, y, z] => Ok(Point3::new(*x, *y, *z)),
        _ => Err(format!("expected three comma-separated values, got {}", components.len())),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cli = Cli::parse();
    info!("Contour started");

    let settings = settings::load(&cli.config)?;
    let surface = settings
        .terrain
        .build_surface()
        .context("building terrain surface")?;
    let planner = Arc::new(
        Planner::from_probe(surface.as_ref(), &settings.planner).context("building planner")?,
    );
    info!("{}", planner.grid());

    let queries: Vec<(Point3<f32>, Point3<f32>)> = match (cli.source, cli.destination) {
        (Some(source), Some(destination)) => vec![(source, destination)],
        _ => settings
            .queries
            .iter()
            .map(|q| (Point3::from(q.source), Point3::from(q.destination)))
            .collect(),
    };
    if queries.is_empty() {
        warn!("No queries configured; nothing to plan");
        return Ok(());
    }

    let handles: Vec<_> = queries
        .into_iter()
        .map(|(source, destination)| {
            let planner = Arc::clone(&planner);
            let handle =
                tokio::task::spawn_blocking(move || planner.compute_path(&source, &destination));
            (source, destination, handle)
        })
        .collect();

    let total = handles.len();
    let mut failures = 0;
    for (index, (source, destination, handle)) in handles.into_iter().enumerate() {
        let outcome = handle.await.context("path query task panicked")?;
        if !report(index, &source, &destination, outcome) {
            failures += 1;
        }
    }

    if failures > 0 {
        warn!("{} of {} queries produced no path", failures, total);
    } else {
        info!("All queries produced a path");
    }
    Ok(())
}

/// Logs one query outcome. Returns whether a path was found.
fn report(
    index: usize,
    source: &Point3<f32>,
    destination: &Point3<f32>,
    outcome: Result<PathResult, PathError>,
) -> bool {
    match outcome {
        Ok(path) => {
            info!(
                "Query {}: ({:.1}, {:.1}, {:.1}) -> ({:.1}, {:.1}, {:.1}): {}",
                index,
                source.x,
                source.y,
                source.z,
                destination.x,
                destination.y,
                destination.z,
                path
            );
            for (i, point) in path.waypoints.iter().enumerate() {
                info!("  {:3}: ({:.1}, {:.1}, {:.1})", i, point.x, point.y, point.z);
            }
            true
        }
        Err(e) => {
            error!(
                "Query {}: ({:.1}, {:.1}, {:.1}) -> ({:.1}, {:.1}, {:.1}) failed: {}",
                index,
                source.x,
                source.y,
                source.z,
                destination.x,
                destination.y,
                destination.z,
                e
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point("1,2.5,-3"), Ok(Point3::new(1.0, 2.5, -3.0)));
        assert_eq!(parse_point(" 10 , 20 , 0 "), Ok(Point3::new(10.0, 20.0, 0.0)));
        assert!(parse_point("1,2").is_err());
        assert!(parse_point("1,x,3").is_err());
    }

    #[test]
    fn test_cli_requires_both_endpoints() {
        assert!(Cli::try_parse_from(["contour", "--source", "0,0,0"]).is_err());
        let cli = Cli::try_parse_from([
            "contour",
            "--config",
            "custom.toml",
            "--source",
            "0,0,0",
            "--destination",
            "-1000,2000,0",
        ])
        .unwrap();
        assert_eq!(cli.config, PathBuf::from("custom.toml"));
        assert_eq!(cli.destination, Some(Point3::new(-1000.0, 2000.0, 0.0)));
    }
}
