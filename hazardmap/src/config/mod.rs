//! Configuration module for hazardmap.
//!
//! Settings are read from `~/.hazardmap/config.ini`:
//!
//! ```ini
//! [search]
//! threshold = 0.3
//!
//! [hazard]
//! max_sample_zoom = 17
//! legend_file = ~/.hazardmap/legend.json
//!
//! [data]
//! shelter_files = ~/.hazardmap/designated.geojson:designated
//! ```

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::DEFAULT_LOG_FILE_NAME;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{
    ConfigFile, DataSettings, HazardSettings, LoggingSettings, ReachableAreaSettings,
    SearchSettings, ShelterSource,
};
