//! INI serialization logic for converting `ConfigFile` → INI string.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let legend_file = config
        .hazard
        .legend_file
        .as_ref()
        .map(|p| path_to_string(p))
        .unwrap_or_default();
    let shelter_files = config
        .data
        .shelter_files
        .iter()
        .map(|source| format!("{}:{}", path_to_string(&source.path), source.schema))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"[search]
; Highest accepted fuzzy match score (0.0 = exact only, 1.0 = anything)
threshold = {}
; How far into a shelter name a match may start before it is penalised
distance = {}

[hazard]
; Highest zoom used when sampling hazard tiles (at most 18)
max_sample_zoom = {}
; Hazard tile edge length in pixels
tile_size = {}
; Tile request timeout in seconds
fetch_timeout = {}
; Hazard legend JSON document
legend_file = {}

[reachable_area]
; Reachable areas are hidden below this view zoom
min_zoom = {}
; Vertices per buffer circle (at least 4)
circle_steps = {}

[data]
; Shelter GeoJSON datasets as comma-separated path:schema entries
; Schemas: designated, tokyo
shelter_files = {}

[logging]
; Log file location
file = {}
"#,
        config.search.threshold,
        config.search.distance,
        config.hazard.max_sample_zoom,
        config.hazard.tile_size,
        config.hazard.fetch_timeout,
        legend_file,
        config.reachable_area.min_zoom,
        config.reachable_area.circle_steps,
        shelter_files,
        path_to_string(&config.logging.file),
    )
}

/// Convert path to string, replacing home directory with ~.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
