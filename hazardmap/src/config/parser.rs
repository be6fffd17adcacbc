//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use ini::Ini;
use std::path::PathBuf;

use super::defaults::{MAX_SAMPLE_ZOOM_LIMIT, MIN_CIRCLE_STEPS};
use super::file::ConfigFileError;
use super::settings::{ConfigFile, ShelterSource};
use crate::shelter::FieldSchema;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [search] section
    if let Some(section) = ini.section(Some("search")) {
        if let Some(v) = section.get("threshold") {
            config.search.threshold = parse_f64("search", "threshold", v)?;
            if !(0.0..=1.0).contains(&config.search.threshold) {
                return Err(invalid("search", "threshold", v, "must be between 0.0 and 1.0"));
            }
        }
        if let Some(v) = section.get("distance") {
            config.search.distance = parse_f64("search", "distance", v)?;
            if config.search.distance <= 0.0 {
                return Err(invalid("search", "distance", v, "must be greater than 0"));
            }
        }
    }

    // [hazard] section
    if let Some(section) = ini.section(Some("hazard")) {
        if let Some(v) = section.get("max_sample_zoom") {
            let zoom: u8 = v
                .trim()
                .parse()
                .map_err(|_| invalid("hazard", "max_sample_zoom", v, "must be a whole number"))?;
            if zoom > MAX_SAMPLE_ZOOM_LIMIT {
                return Err(invalid(
                    "hazard",
                    "max_sample_zoom",
                    v,
                    &format!("must be at most {}", MAX_SAMPLE_ZOOM_LIMIT),
                ));
            }
            config.hazard.max_sample_zoom = zoom;
        }
        if let Some(v) = section.get("tile_size") {
            let size: u32 = v
                .trim()
                .parse()
                .map_err(|_| invalid("hazard", "tile_size", v, "must be a whole number"))?;
            if size == 0 {
                return Err(invalid("hazard", "tile_size", v, "must be greater than 0"));
            }
            config.hazard.tile_size = size;
        }
        if let Some(v) = section.get("fetch_timeout") {
            config.hazard.fetch_timeout = v
                .trim()
                .parse()
                .map_err(|_| invalid("hazard", "fetch_timeout", v, "must be a number of seconds"))?;
        }
        if let Some(v) = section.get("legend_file") {
            let v = v.trim();
            if !v.is_empty() {
                config.hazard.legend_file = Some(expand_tilde(v));
            }
        }
    }

    // [reachable_area] section
    if let Some(section) = ini.section(Some("reachable_area")) {
        if let Some(v) = section.get("min_zoom") {
            config.reachable_area.min_zoom = parse_f64("reachable_area", "min_zoom", v)?;
        }
        if let Some(v) = section.get("circle_steps") {
            let steps: usize = v
                .trim()
                .parse()
                .map_err(|_| invalid("reachable_area", "circle_steps", v, "must be a whole number"))?;
            if steps < MIN_CIRCLE_STEPS {
                return Err(invalid(
                    "reachable_area",
                    "circle_steps",
                    v,
                    &format!("must be at least {}", MIN_CIRCLE_STEPS),
                ));
            }
            config.reachable_area.circle_steps = steps;
        }
    }

    // [data] section
    if let Some(section) = ini.section(Some("data")) {
        if let Some(v) = section.get("shelter_files") {
            config.data.shelter_files = parse_shelter_files(v)?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

/// Parse a comma-separated list of `path:schema` entries.
fn parse_shelter_files(value: &str) -> Result<Vec<ShelterSource>, ConfigFileError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (path, schema) = entry.rsplit_once(':').ok_or_else(|| {
                invalid("data", "shelter_files", entry, "expected 'path:schema'")
            })?;
            let schema: FieldSchema = schema
                .trim()
                .parse()
                .map_err(|e: crate::shelter::UnknownSchemaError| {
                    invalid("data", "shelter_files", entry, &e.to_string())
                })?;
            Ok(ShelterSource {
                path: expand_tilde(path.trim()),
                schema,
            })
        })
        .collect()
}

fn parse_f64(section: &str, key: &str, value: &str) -> Result<f64, ConfigFileError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| invalid(section, key, value, "must be a number"))
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
