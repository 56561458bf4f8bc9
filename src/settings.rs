use anyhow::Context;
use config::{Config, Environment, File, FileFormat};
use contour_navigation::PlannerConfig;
use serde::Deserialize;
use std::path::Path;
use tracing::{error, info};

use crate::terrain::TerrainSettings;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// One source/destination pair to plan between.
#[derive(Debug, Clone, Deserialize)]
pub struct QuerySettings {
    pub source: [f32; 3],
    pub destination: [f32; 3],
}

/// Everything the binary reads from its configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub planner: PlannerConfig,
    pub terrain: TerrainSettings,
    #[serde(default)]
    pub queries: Vec<QuerySettings>,
}

/// Loads settings from a TOML file, then applies `CONTOUR__*` environment overrides
/// (e.g. `CONTOUR__PLANNER__SEARCH__MAX_ANGLE_THRESHOLD=25`).
pub fn load(path: &Path) -> anyhow::Result<AppSettings> {
    info!("Attempting to load configuration from {}", path.display());

    let settings = Config::builder()
        .add_source(File::from(path).format(FileFormat::Toml).required(true))
        .add_source(
            Environment::with_prefix("CONTOUR")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .and_then(|config| config.try_deserialize::<AppSettings>());

    match settings {
        Ok(settings) => {
            info!(
                queries = settings.queries.len(),
                resolution = settings.planner.grid.resolution,
                "Successfully loaded configuration"
            );
            Ok(settings)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            Err(e).with_context(|| format!("loading {}", path.display()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let file_name = format!("contour-{}-{}.toml", name, std::process::id());
        let path = std::env::temp_dir().join(file_name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_minimal_file_uses_defaults() {
        let path = write_temp(
            "minimal",
            r#"
[terrain]
kind = "flat"
origin = [0.0, 0.0]
extent = [5000.0, 5000.0]
height = 0.0
"#,
        );
        let settings = load(&path).unwrap();
        assert_eq!(settings.planner, PlannerConfig::default());
        assert!(settings.queries.is_empty());
        assert!(matches!(settings.terrain, TerrainSettings::Flat { .. }));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_full_file() {
        let path = write_temp(
            "full",
            r#"
[planner.grid]
resolution = 500
parallel = false

[planner.search]
neighbor_mask = [[1, 0], [0, 1], [-1, 0], [0, -1]]
max_angle_threshold = 20.0
max_expansions = 1000

[terrain]
kind = "hills"
origin = [0.0, 0.0]
spacing = 250.0
columns = 9
rows = 9
amplitude = 100.0
wavelength = 1500.0

[[queries]]
source = [0.0, 0.0, 0.0]
destination = [2000.0, 2000.0, 0.0]
"#,
        );
        let settings = load(&path).unwrap();
        assert_eq!(settings.planner.grid.resolution, 500);
        assert!(!settings.planner.grid.parallel);
        assert_eq!(settings.planner.search.neighbor_mask.len(), 4);
        assert_eq!(settings.planner.search.max_angle_threshold, 20.0);
        assert_eq!(settings.planner.search.max_expansions, Some(1000));
        assert_eq!(settings.queries.len(), 1);
        assert_eq!(settings.queries[0].destination, [2000.0, 2000.0, 0.0]);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(load(Path::new("does/not/exist.toml")).is_err());
    }
}
