//! Layer visibility and opacity control.

use thiserror::Error;
use tracing::debug;

use super::container::{ControlContainer, ControlElement, CONTROL_CLASS, CONTROL_ID};
use crate::map::{MapHost, Visibility};

/// Opacity slider bounds and default position.
pub const OPACITY_MIN: u8 = 0;
pub const OPACITY_MAX: u8 = 100;
pub const OPACITY_DEFAULT: u8 = 100;

/// Errors raised by layer-switcher interactions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControlError {
    #[error("Control is not attached to a map")]
    Detached,

    #[error("Control is already attached to a map")]
    AlreadyAttached,

    #[error("Unknown layer: {0}")]
    UnknownLayer(String),

    #[error("Layer {0} has no opacity slider")]
    NoOpacitySlider(String),
}

/// Layers offered by a [`LayerSwitcher`].
///
/// # Example
///
/// ```
/// use hazardmap::control::LayerSwitcherOptions;
///
/// let options = LayerSwitcherOptions::default()
///     .with_base_layer("pales_layer", "淡色地図")
///     .with_base_layer("seamlessphoto_layer", "空中写真")
///     .with_over_layer("hillshade", "地形")
///     .with_opacity_control(true);
/// assert_eq!(options.base_layers().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerSwitcherOptions {
    base_layers: Vec<(String, String)>,
    over_layers: Vec<(String, String)>,
    opacity_control: bool,
}

impl LayerSwitcherOptions {
    /// Adds an exclusive layer. The first one added starts visible.
    /// Re-adding a layer id replaces its label in place.
    pub fn with_base_layer(mut self, layer_id: impl Into<String>, label: impl Into<String>) -> Self {
        upsert(&mut self.base_layers, layer_id.into(), label.into());
        self
    }

    /// Adds an independent layer, hidden until checked.
    pub fn with_over_layer(mut self, layer_id: impl Into<String>, label: impl Into<String>) -> Self {
        upsert(&mut self.over_layers, layer_id.into(), label.into());
        self
    }

    /// Adds an opacity slider under every independent layer.
    pub fn with_opacity_control(mut self, enabled: bool) -> Self {
        self.opacity_control = enabled;
        self
    }

    pub fn base_layers(&self) -> &[(String, String)] {
        &self.base_layers
    }

    pub fn over_layers(&self) -> &[(String, String)] {
        &self.over_layers
    }

    pub fn opacity_control(&self) -> bool {
        self.opacity_control
    }
}

fn upsert(entries: &mut Vec<(String, String)>, id: String, label: String) {
    match entries.iter_mut().find(|(existing, _)| *existing == id) {
        Some(entry) => entry.1 = label,
        None => entries.push((id, label)),
    }
}

/// Radio/checkbox layer switcher with optional opacity sliders.
///
/// Exactly one base layer is visible while attached. Every interaction
/// writes the resulting visibility or opacity straight to the host's layers.
#[derive(Debug)]
pub struct LayerSwitcher {
    options: LayerSwitcherOptions,
    container: Option<ControlContainer>,
}

impl LayerSwitcher {
    pub fn new(options: LayerSwitcherOptions) -> Self {
        Self {
            options,
            container: None,
        }
    }

    pub fn options(&self) -> &LayerSwitcherOptions {
        &self.options
    }

    pub fn is_attached(&self) -> bool {
        self.container.is_some()
    }

    pub fn container(&self) -> Option<&ControlContainer> {
        self.container.as_ref()
    }

    /// Builds the control and applies the initial layer visibilities.
    pub fn on_add<H: MapHost + ?Sized>(&mut self, host: &mut H) -> Result<&ControlContainer, ControlError> {
        if self.container.is_some() {
            return Err(ControlError::AlreadyAttached);
        }

        let mut container = ControlContainer::new(CONTROL_ID, CONTROL_CLASS);

        for (i, (layer_id, label)) in self.options.base_layers.iter().enumerate() {
            let visible = i == 0;
            host.set_layer_visibility(layer_id, Visibility::from(visible));
            container.push(ControlElement::Radio {
                layer_id: layer_id.clone(),
                checked: visible,
            });
            container.push(ControlElement::Label {
                for_layer: layer_id.clone(),
                text: label.clone(),
            });
            container.push(ControlElement::Break);
        }

        if !self.options.base_layers.is_empty() && !self.options.over_layers.is_empty() {
            container.push(ControlElement::Rule);
        }

        for (layer_id, label) in &self.options.over_layers {
            host.set_layer_visibility(layer_id, Visibility::None);
            container.push(ControlElement::Checkbox {
                layer_id: layer_id.clone(),
                checked: false,
            });
            container.push(ControlElement::Label {
                for_layer: layer_id.clone(),
                text: label.clone(),
            });
            if self.options.opacity_control {
                container.push(ControlElement::Range {
                    layer_id: layer_id.clone(),
                    min: OPACITY_MIN,
                    max: OPACITY_MAX,
                    value: OPACITY_DEFAULT,
                });
            }
            container.push(ControlElement::Break);
        }

        debug!(
            base_layers = self.options.base_layers.len(),
            over_layers = self.options.over_layers.len(),
            "Layer switcher attached"
        );
        let container: &ControlContainer = self.container.insert(container);
        Ok(container)
    }

    /// Detaches the control and hands back its element tree for removal.
    pub fn on_remove(&mut self) -> Result<ControlContainer, ControlError> {
        let container = self.container.take().ok_or(ControlError::Detached)?;
        debug!("Layer switcher removed");
        Ok(container)
    }

    /// Makes `layer_id` the visible base layer and hides its siblings.
    pub fn select_base<H: MapHost + ?Sized>(&mut self, host: &mut H, layer_id: &str) -> Result<(), ControlError> {
        let container = self.container.as_mut().ok_or(ControlError::Detached)?;
        if !container.check_radio(layer_id) {
            return Err(ControlError::UnknownLayer(layer_id.to_string()));
        }

        host.set_layer_visibility(layer_id, Visibility::Visible);
        for (other, _) in &self.options.base_layers {
            if other != layer_id {
                host.set_layer_visibility(other, Visibility::None);
            }
        }
        Ok(())
    }

    /// Shows or hides an independent layer.
    pub fn set_overlay_visible<H: MapHost + ?Sized>(
        &mut self,
        host: &mut H,
        layer_id: &str,
        visible: bool,
    ) -> Result<(), ControlError> {
        let container = self.container.as_mut().ok_or(ControlError::Detached)?;
        if !container.set_checkbox(layer_id, visible) {
            return Err(ControlError::UnknownLayer(layer_id.to_string()));
        }
        host.set_layer_visibility(layer_id, Visibility::from(visible));
        Ok(())
    }

    /// Moves an opacity slider (0 to 100) and applies it as raster opacity.
    pub fn set_opacity<H: MapHost + ?Sized>(&mut self, host: &mut H, layer_id: &str, value: u8) -> Result<(), ControlError> {
        let container = self.container.as_mut().ok_or(ControlError::Detached)?;
        let value = match container.set_range(layer_id, value) {
            Some(v) => v,
            None if container.checkbox(layer_id).is_some() => {
                return Err(ControlError::NoOpacitySlider(layer_id.to_string()))
            }
            None => return Err(ControlError::UnknownLayer(layer_id.to_string())),
        };
        host.set_layer_opacity(layer_id, f64::from(value) / f64::from(OPACITY_MAX));
        Ok(())
    }

    /// Layer id of the visible base layer.
    pub fn active_base(&self) -> Option<&str> {
        self.container.as_ref().and_then(|c| c.checked_radio())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::RecordingHost;
    use proptest::prelude::*;

    const BASE: [&str; 3] = ["flood_layer", "tsunami_layer", "doseki_layer"];
    const OVER: [&str; 2] = ["hillshade", "building"];

    fn hazard_options(opacity: bool) -> LayerSwitcherOptions {
        LayerSwitcherOptions::default()
            .with_base_layer(BASE[0], "洪水浸水想定区域")
            .with_base_layer(BASE[1], "津波浸水想定")
            .with_base_layer(BASE[2], "土石流")
            .with_over_layer(OVER[0], "地形")
            .with_over_layer(OVER[1], "3D建物")
            .with_opacity_control(opacity)
    }

    fn attached(opacity: bool) -> (LayerSwitcher, RecordingHost) {
        let mut host = RecordingHost::new();
        let mut switcher = LayerSwitcher::new(hazard_options(opacity));
        switcher.on_add(&mut host).unwrap();
        (switcher, host)
    }

    fn visible_bases(host: &RecordingHost) -> Vec<&'static str> {
        BASE.iter()
            .copied()
            .filter(|id| host.visibility(id) == Some(Visibility::Visible))
            .collect()
    }

    #[test]
    fn test_first_base_layer_visible_on_add() {
        let (switcher, host) = attached(false);

        assert_eq!(visible_bases(&host), vec!["flood_layer"]);
        assert_eq!(host.visibility("tsunami_layer"), Some(Visibility::None));
        assert_eq!(host.visibility("doseki_layer"), Some(Visibility::None));
        assert_eq!(switcher.active_base(), Some("flood_layer"));
    }

    #[test]
    fn test_overlays_hidden_on_add() {
        let (switcher, host) = attached(false);
        for id in OVER {
            assert_eq!(host.visibility(id), Some(Visibility::None));
            assert_eq!(switcher.container().unwrap().checkbox(id), Some(false));
        }
    }

    #[test]
    fn test_select_base_is_exclusive() {
        let (mut switcher, mut host) = attached(false);

        switcher.select_base(&mut host, "tsunami_layer").unwrap();
        assert_eq!(visible_bases(&host), vec!["tsunami_layer"]);
        assert_eq!(switcher.active_base(), Some("tsunami_layer"));
    }

    #[test]
    fn test_overlay_toggle_leaves_bases_alone() {
        let (mut switcher, mut host) = attached(false);
        switcher.select_base(&mut host, "doseki_layer").unwrap();

        switcher.set_overlay_visible(&mut host, "hillshade", true).unwrap();
        assert_eq!(host.visibility("hillshade"), Some(Visibility::Visible));
        assert_eq!(host.visibility("building"), Some(Visibility::None));
        assert_eq!(visible_bases(&host), vec!["doseki_layer"]);

        switcher.set_overlay_visible(&mut host, "hillshade", false).unwrap();
        assert_eq!(host.visibility("hillshade"), Some(Visibility::None));
    }

    #[test]
    fn test_opacity_slider() {
        let (mut switcher, mut host) = attached(true);
        assert_eq!(switcher.container().unwrap().range("hillshade"), Some(100));

        switcher.set_opacity(&mut host, "hillshade", 40).unwrap();
        assert_eq!(host.opacity("hillshade"), Some(0.4));

        switcher.set_opacity(&mut host, "hillshade", 200).unwrap();
        assert_eq!(host.opacity("hillshade"), Some(1.0));
    }

    #[test]
    fn test_opacity_without_slider() {
        let (mut switcher, mut host) = attached(false);
        assert_eq!(
            switcher.set_opacity(&mut host, "hillshade", 40),
            Err(ControlError::NoOpacitySlider("hillshade".to_string()))
        );
        assert_eq!(
            switcher.set_opacity(&mut host, "flood_layer", 40),
            Err(ControlError::UnknownLayer("flood_layer".to_string()))
        );
    }

    #[test]
    fn test_unknown_layers_rejected() {
        let (mut switcher, mut host) = attached(false);
        assert_eq!(
            switcher.select_base(&mut host, "hillshade"),
            Err(ControlError::UnknownLayer("hillshade".to_string()))
        );
        assert_eq!(
            switcher.set_overlay_visible(&mut host, "flood_layer", true),
            Err(ControlError::UnknownLayer("flood_layer".to_string()))
        );
        assert_eq!(visible_bases(&host), vec!["flood_layer"]);
    }

    #[test]
    fn test_lifecycle() {
        let mut host = RecordingHost::new();
        let mut switcher = LayerSwitcher::new(hazard_options(false));

        assert_eq!(switcher.select_base(&mut host, "flood_layer"), Err(ControlError::Detached));
        assert!(matches!(switcher.on_remove(), Err(ControlError::Detached)));

        switcher.on_add(&mut host).unwrap();
        assert!(matches!(switcher.on_add(&mut host), Err(ControlError::AlreadyAttached)));

        let removed = switcher.on_remove().unwrap();
        assert!(!switcher.is_attached());
        assert_eq!(removed.checked_radio(), Some("flood_layer"));
        assert_eq!(switcher.active_base(), None);

        // Re-attaching starts from the initial state again
        switcher.on_add(&mut host).unwrap();
        assert_eq!(switcher.active_base(), Some("flood_layer"));
    }

    #[test]
    fn test_element_layout() {
        let (switcher, _) = attached(true);
        let elements = switcher.container().unwrap().elements();

        // 3 x (radio, label, br) + hr + 2 x (checkbox, label, range, br)
        assert_eq!(elements.len(), 3 * 3 + 1 + 2 * 4);
        assert_eq!(elements[9], ControlElement::Rule);
        assert!(matches!(elements[12], ControlElement::Range { value: 100, .. }));
    }

    #[test]
    fn test_base_only_has_no_rule() {
        let mut host = RecordingHost::new();
        let mut switcher = LayerSwitcher::new(
            LayerSwitcherOptions::default()
                .with_base_layer("pales_layer", "淡色地図")
                .with_base_layer("seamlessphoto_layer", "空中写真"),
        );
        let container = switcher.on_add(&mut host).unwrap();
        assert!(!container.elements().contains(&ControlElement::Rule));
    }

    #[test]
    fn test_duplicate_option_replaces_label() {
        let options = LayerSwitcherOptions::default()
            .with_base_layer("a", "first")
            .with_base_layer("b", "second")
            .with_base_layer("a", "renamed");
        assert_eq!(
            options.base_layers(),
            &[("a".to_string(), "renamed".to_string()), ("b".to_string(), "second".to_string())]
        );
    }

    #[derive(Debug, Clone)]
    enum Op {
        Select(usize),
        Toggle(usize, bool),
        Opacity(usize, u8),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0..BASE.len()).prop_map(Op::Select),
            (0..OVER.len(), any::<bool>()).prop_map(|(i, v)| Op::Toggle(i, v)),
            (0..OVER.len(), any::<u8>()).prop_map(|(i, v)| Op::Opacity(i, v)),
        ]
    }

    proptest! {
        #[test]
        fn exactly_one_base_visible(ops in prop::collection::vec(op_strategy(), 0..40)) {
            let (mut switcher, mut host) = attached(true);
            let mut expected = BASE[0];

            for op in ops {
                match op {
                    Op::Select(i) => {
                        switcher.select_base(&mut host, BASE[i]).unwrap();
                        expected = BASE[i];
                    }
                    Op::Toggle(i, v) => switcher.set_overlay_visible(&mut host, OVER[i], v).unwrap(),
                    Op::Opacity(i, v) => switcher.set_opacity(&mut host, OVER[i], v).unwrap(),
                }

                prop_assert_eq!(visible_bases(&host), vec![expected]);
                prop_assert_eq!(switcher.active_base(), Some(expected));
            }
        }
    }
}
