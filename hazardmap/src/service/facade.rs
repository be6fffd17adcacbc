//! High-level service facade.

use std::sync::Arc;

use tracing::{info, warn};

use super::error::ServiceError;
use crate::config::{ConfigFile, DataSettings};
use crate::control::{LayerSwitcher, LayerSwitcherOptions};
use crate::geocoder::ShelterGeocoder;
use crate::legend::HazardLegendCatalog;
use crate::map::{MapEvent, MapHost};
use crate::search::ShelterIndex;
use crate::session::{ClickOutcome, LookupOutcome, MapSession};
use crate::shelter::{self, ShelterCatalog, ShelterId};
use crate::tile::{PixelSampler, ReqwestTileFetcher, TileFetcher};

/// What a primary click ended up showing.
#[derive(Debug)]
pub enum ClickResult {
    /// The shelter popup was opened.
    Shelter(ShelterId),
    /// A hazard lookup ran to completion.
    Hazard(LookupOutcome),
    /// Nothing to look up at that point.
    Nothing,
}

/// Everything the viewer needs, wired from one [`ConfigFile`].
///
/// Owns the shelter catalog, the geocoder built over it, the map session
/// and the tile sampler.
pub struct HazardMapService<F: TileFetcher = ReqwestTileFetcher> {
    config: ConfigFile,
    shelters: Arc<ShelterCatalog>,
    geocoder: ShelterGeocoder,
    session: MapSession,
    sampler: Arc<PixelSampler<F>>,
}

impl HazardMapService<ReqwestTileFetcher> {
    /// Loads the configured datasets and legends and builds the service.
    pub fn start(config: ConfigFile) -> Result<Self, ServiceError> {
        let shelters = load_shelters(&config.data)?;
        let legends = match &config.hazard.legend_file {
            Some(path) => HazardLegendCatalog::load_from_path(path)?,
            None => {
                warn!("No legend file configured, hazard lookups will show nothing");
                HazardLegendCatalog::default()
            }
        };
        let fetcher = ReqwestTileFetcher::with_timeout(config.hazard.fetch_timeout)?;

        Ok(Self::with_data(config, shelters, legends, fetcher))
    }
}

impl<F: TileFetcher> HazardMapService<F> {
    /// Builds the service from already loaded data.
    pub fn with_data(
        config: ConfigFile,
        shelters: ShelterCatalog,
        legends: HazardLegendCatalog,
        fetcher: F,
    ) -> Self {
        let index = ShelterIndex::build(shelters.records().iter().cloned(), &config.search_config());
        let shelters = Arc::new(shelters);
        let session = MapSession::new(Arc::clone(&shelters), legends)
            .with_sampler_config(config.sampler_config())
            .with_reachable_config(config.reachable_config());

        info!(
            shelters = shelters.len(),
            legends = session.legends().len(),
            "Hazard map service ready"
        );

        Self {
            config,
            shelters,
            geocoder: ShelterGeocoder::new(index),
            session,
            sampler: Arc::new(PixelSampler::new(fetcher)),
        }
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    pub fn shelters(&self) -> &Arc<ShelterCatalog> {
        &self.shelters
    }

    pub fn geocoder(&self) -> &ShelterGeocoder {
        &self.geocoder
    }

    pub fn session(&self) -> &MapSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut MapSession {
        &mut self.session
    }

    /// Shared sampler, for hosts that run [`PendingLookup`](crate::session::PendingLookup)s
    /// on their own tasks.
    pub fn sampler(&self) -> &Arc<PixelSampler<F>> {
        &self.sampler
    }

    /// Layer switcher listing every hazard layer with a legend, in legend order.
    pub fn hazard_switcher(&self) -> LayerSwitcher {
        let options = self
            .session
            .legends()
            .legends()
            .fold(LayerSwitcherOptions::default(), |options, legend| {
                options.with_base_layer(legend.id.clone(), legend.name.clone())
            });
        LayerSwitcher::new(options)
    }

    /// Attaches a hazard switcher and activates its initially visible layer.
    ///
    /// Returns the legend panel HTML for that layer.
    pub fn attach_hazard_switcher<H: MapHost + ?Sized>(
        &mut self,
        host: &mut H,
        switcher: &mut LayerSwitcher,
    ) -> Result<Option<String>, ServiceError> {
        switcher.on_add(host)?;
        let Some(layer_id) = switcher.active_base().map(str::to_string) else {
            return Ok(None);
        };
        self.session.select_hazard(host, &layer_id);
        Ok(self.session.legend_panel_html())
    }

    /// Switches the visible hazard layer and the layer clicks are looked up against.
    ///
    /// Returns the legend panel HTML for the new layer.
    pub fn select_hazard<H: MapHost + ?Sized>(
        &mut self,
        host: &mut H,
        switcher: &mut LayerSwitcher,
        layer_id: &str,
    ) -> Result<Option<String>, ServiceError> {
        switcher.select_base(host, layer_id)?;
        self.session.select_hazard(host, layer_id);
        Ok(self.session.legend_panel_html())
    }

    /// Handles a primary click and, for hazard lookups, awaits the pixel sample.
    ///
    /// Holds the session for the whole lookup. Hosts that must keep handling
    /// events meanwhile should drive [`MapSession::handle_click`] and
    /// [`MapSession::finish_lookup`] themselves.
    pub async fn click<H: MapHost + ?Sized>(&mut self, host: &mut H, event: MapEvent) -> ClickResult {
        match self.session.handle_click(host, event) {
            ClickOutcome::Shelter(id) => ClickResult::Shelter(id),
            ClickOutcome::Nothing => ClickResult::Nothing,
            ClickOutcome::Lookup(lookup) => {
                let result = lookup.run(&self.sampler).await;
                ClickResult::Hazard(self.session.finish_lookup(host, lookup, result))
            }
        }
    }
}

/// Loads every configured shelter dataset, in order, into one catalog.
pub fn load_shelters(data: &DataSettings) -> Result<ShelterCatalog, ServiceError> {
    let mut catalog = ShelterCatalog::new();
    for source in &data.shelter_files {
        catalog.extend(shelter::load_from_path(&source.path, &source.schema)?);
    }
    if catalog.is_empty() {
        warn!("No shelter records loaded");
    }
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShelterSource;
    use crate::coord::LngLat;
    use crate::map::{RecordingHost, ScreenPoint, Visibility};
    use crate::shelter::FieldSchema;
    use crate::tile::{MockTileFetcher, TileUrlTemplate};
    use image::{ImageFormat, RgbaImage};
    use std::io::Cursor;
    use tempfile::TempDir;

    const DESIGNATED: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [139.7487, 35.6568] },
                "properties": { "共通ID": "13103-001", "施設・場所名": "芝公園", "住所": "東京都港区芝公園四丁目" }
            },
            {
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [139.7454, 35.6339] },
                "properties": { "共通ID": "13103-002", "施設・場所名": "港南中学校", "住所": "東京都港区港南四丁目" }
            }
        ]
    }"#;

    const LEGENDS: &str = r##"[
        { "id": "flood_layer", "name": "洪水浸水想定区域",
          "guide_color": [ { "color": "#f7f5a9", "label": "0.5m未満" }, { "color": "#ff9191", "label": "5.0~10.0m" } ] },
        { "id": "tsunami_layer", "name": "津波浸水想定",
          "guide_color": [ { "color": "#ffd8c0", "label": "0.3~1.0m" } ] }
    ]"##;

    fn tile_png(color: [u8; 4]) -> Vec<u8> {
        let image = RgbaImage::from_pixel(256, 256, image::Rgba(color));
        let mut buf = Vec::new();
        image.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png).unwrap();
        buf
    }

    fn service(tile: Vec<u8>) -> HazardMapService<MockTileFetcher> {
        let shelters = shelter::load_from_str(DESIGNATED, &FieldSchema::designated())
            .unwrap()
            .into_iter()
            .collect();
        HazardMapService::with_data(
            ConfigFile::default(),
            shelters,
            HazardLegendCatalog::from_json(LEGENDS).unwrap(),
            MockTileFetcher { response: Ok(tile) },
        )
    }

    fn host() -> RecordingHost {
        RecordingHost::new()
            .with_zoom(15.0)
            .with_raster_source("flood_layer", TileUrlTemplate::new("https://tiles.example/flood/{z}/{x}/{y}.png"))
            .with_raster_source("tsunami_layer", TileUrlTemplate::new("https://tiles.example/tsunami/{z}/{x}/{y}.png"))
    }

    #[test]
    fn test_load_shelters_concatenates_datasets() {
        let temp_dir = TempDir::new().unwrap();
        let first = temp_dir.path().join("a.geojson");
        let second = temp_dir.path().join("b.geojson");
        std::fs::write(&first, DESIGNATED).unwrap();
        std::fs::write(&second, r#"{ "type": "FeatureCollection", "features": [] }"#).unwrap();

        let data = DataSettings {
            shelter_files: vec![
                ShelterSource {
                    path: first,
                    schema: FieldSchema::designated(),
                },
                ShelterSource {
                    path: second,
                    schema: FieldSchema::tokyo(),
                },
            ],
        };

        let catalog = load_shelters(&data).unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.get(&ShelterId::new("13103-002")).is_some());
    }

    #[test]
    fn test_load_shelters_missing_file() {
        let data = DataSettings {
            shelter_files: vec![ShelterSource {
                path: "/nonexistent/shelters.geojson".into(),
                schema: FieldSchema::designated(),
            }],
        };
        assert!(matches!(load_shelters(&data), Err(ServiceError::ShelterData(_))));
    }

    #[test]
    fn test_geocoder_searches_loaded_shelters() {
        let service = service(Vec::new());
        let features = service.geocoder().forward_search("港南中学");
        assert_eq!(features[0].center, LngLat::new(139.7454, 35.6339));
    }

    #[test]
    fn test_hazard_switcher_follows_legend_order() {
        let mut service = service(Vec::new());
        let mut host = host();
        let mut switcher = service.hazard_switcher();

        let html = service.attach_hazard_switcher(&mut host, &mut switcher).unwrap().unwrap();
        assert!(html.contains("0.5m未満"));
        assert_eq!(service.session().active_hazard(), Some("flood_layer"));
        assert_eq!(host.visibility("flood_layer"), Some(Visibility::Visible));
        assert_eq!(host.visibility("tsunami_layer"), Some(Visibility::None));

        let html = service
            .select_hazard(&mut host, &mut switcher, "tsunami_layer")
            .unwrap()
            .unwrap();
        assert!(html.contains("0.3~1.0m"));
        assert_eq!(host.visibility("flood_layer"), Some(Visibility::None));
        assert_eq!(host.visibility("tsunami_layer"), Some(Visibility::Visible));
    }

    #[test]
    fn test_select_unknown_hazard_is_an_error() {
        let mut service = service(Vec::new());
        let mut host = host();
        let mut switcher = service.hazard_switcher();
        service.attach_hazard_switcher(&mut host, &mut switcher).unwrap();

        let result = service.select_hazard(&mut host, &mut switcher, "landslide_layer");
        assert!(matches!(result, Err(ServiceError::Control(_))));
        assert_eq!(service.session().active_hazard(), Some("flood_layer"));
    }

    #[tokio::test]
    async fn test_click_runs_hazard_lookup() {
        let mut service = service(tile_png([0xfa, 0x90, 0x90, 255]));
        let mut host = host();
        let mut switcher = service.hazard_switcher();
        service.attach_hazard_switcher(&mut host, &mut switcher).unwrap();

        let event = MapEvent::new(ScreenPoint::new(10.0, 10.0), LngLat::new(139.76, 35.68));
        match service.click(&mut host, event).await {
            ClickResult::Hazard(LookupOutcome::Shown { label }) => assert_eq!(label, "5.0~10.0m"),
            other => panic!("unexpected click result {:?}", other),
        }
        assert_eq!(host.open_popups().len(), 1);
    }

    #[tokio::test]
    async fn test_click_on_shelter() {
        let mut service = service(Vec::new());
        let mut host = host();
        host.place_shelter(ScreenPoint::new(20.0, 20.0), ShelterId::new("13103-001"));

        let event = MapEvent::new(ScreenPoint::new(20.0, 20.0), LngLat::new(139.7487, 35.6568));
        let result = service.click(&mut host, event).await;
        assert!(matches!(result, ClickResult::Shelter(ref id) if id.as_str() == "13103-001"));
    }
}
