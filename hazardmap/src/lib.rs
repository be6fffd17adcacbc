//! hazardmap - core of a hazard and evacuation-shelter map viewer
//!
//! This library provides the logic behind a web map that shows hazard
//! rasters (flood, storm surge, tsunami, landslide) together with
//! evacuation shelters. The map renderer, the browser and the search box
//! stay outside the crate and are reached through the [`map::MapHost`] and
//! [`geocoder::GeocoderApi`] traits.
//!
//! # High-Level API
//!
//! The [`service`] module wires everything from one config file:
//!
//! ```ignore
//! use hazardmap::config::ConfigFile;
//! use hazardmap::service::HazardMapService;
//!
//! let mut service = HazardMapService::start(ConfigFile::load()?)?;
//!
//! // Search box
//! let hits = service.geocoder().forward_search("芝公園");
//!
//! // Map click: shelter popup or hazard legend lookup
//! let result = service.click(&mut host, event).await;
//! ```

pub mod config;
pub mod control;
pub mod coord;
pub mod geocoder;
pub mod legend;
pub mod logging;
pub mod map;
pub mod measure;
pub mod search;
pub mod service;
pub mod session;
pub mod shelter;
pub mod tile;

/// Version of the hazardmap library.
///
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
