//! High-level service facade for hazardmap.
//!
//! [`HazardMapService`] loads the configured shelter datasets and hazard
//! legends, builds the search index and geocoder, and owns the map session.
//!
//! # Example
//!
//! ```ignore
//! use hazardmap::config::ConfigFile;
//! use hazardmap::service::HazardMapService;
//!
//! let config = ConfigFile::load()?;
//! let mut service = HazardMapService::start(config)?;
//!
//! let mut switcher = service.hazard_switcher();
//! let legend_html = service.attach_hazard_switcher(&mut host, &mut switcher)?;
//!
//! let result = service.click(&mut host, event).await;
//! ```

mod error;
mod facade;

pub use error::ServiceError;
pub use facade::{load_shelters, ClickResult, HazardMapService};
