//! Control element tree.
//!
//! A control's user-facing state lives in its elements, the same way a DOM
//! checkbox holds its own checked flag. The host renders the tree with
//! [`ControlContainer::to_html`] or walks [`ControlContainer::elements`].

use crate::legend::render::escape_html;

/// CSS classes of a map control group.
pub const CONTROL_CLASS: &str = "maplibregl-ctrl maplibregl-ctrl-group";

/// Element id of a layer-switcher container.
pub const CONTROL_ID: &str = "opacity-control";

/// One element of a control.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlElement {
    Radio { layer_id: String, checked: bool },
    Checkbox { layer_id: String, checked: bool },
    Label { for_layer: String, text: String },
    Range { layer_id: String, min: u8, max: u8, value: u8 },
    Break,
    Rule,
}

/// Root of a control's element tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlContainer {
    id: String,
    class_name: String,
    elements: Vec<ControlElement>,
}

impl ControlContainer {
    pub fn new(id: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            class_name: class_name.into(),
            elements: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn elements(&self) -> &[ControlElement] {
        &self.elements
    }

    pub fn push(&mut self, element: ControlElement) {
        self.elements.push(element);
    }

    /// Layer id of the checked radio button, if any.
    pub fn checked_radio(&self) -> Option<&str> {
        self.elements.iter().find_map(|e| match e {
            ControlElement::Radio { layer_id, checked: true } => Some(layer_id.as_str()),
            _ => None,
        })
    }

    /// Checks the radio for `layer_id` and unchecks every other radio.
    ///
    /// Returns false if no radio has that layer id.
    pub fn check_radio(&mut self, layer_id: &str) -> bool {
        if !self.has_radio(layer_id) {
            return false;
        }
        for element in &mut self.elements {
            if let ControlElement::Radio { layer_id: id, checked } = element {
                *checked = *id == layer_id;
            }
        }
        true
    }

    pub fn has_radio(&self, layer_id: &str) -> bool {
        self.elements
            .iter()
            .any(|e| matches!(e, ControlElement::Radio { layer_id: id, .. } if id == layer_id))
    }

    /// Sets a checkbox. Returns false if no checkbox has that layer id.
    pub fn set_checkbox(&mut self, layer_id: &str, value: bool) -> bool {
        for element in &mut self.elements {
            if let ControlElement::Checkbox { layer_id: id, checked } = element {
                if *id == layer_id {
                    *checked = value;
                    return true;
                }
            }
        }
        false
    }

    pub fn checkbox(&self, layer_id: &str) -> Option<bool> {
        self.elements.iter().find_map(|e| match e {
            ControlElement::Checkbox { layer_id: id, checked } if id == layer_id => Some(*checked),
            _ => None,
        })
    }

    /// Sets a range slider, clamped to its bounds. Returns the stored value.
    pub fn set_range(&mut self, layer_id: &str, value: u8) -> Option<u8> {
        self.elements.iter_mut().find_map(|e| match e {
            ControlElement::Range {
                layer_id: id,
                min,
                max,
                value: current,
            } if *id == layer_id => {
                *current = value.clamp(*min, *max);
                Some(*current)
            }
            _ => None,
        })
    }

    pub fn range(&self, layer_id: &str) -> Option<u8> {
        self.elements.iter().find_map(|e| match e {
            ControlElement::Range { layer_id: id, value, .. } if id == layer_id => Some(*value),
            _ => None,
        })
    }

    pub fn to_html(&self) -> String {
        let mut html = format!(
            "<div class=\"{}\" id=\"{}\">",
            escape_html(&self.class_name),
            escape_html(&self.id)
        );
        for element in &self.elements {
            match element {
                ControlElement::Radio { layer_id, checked } => html.push_str(&format!(
                    "<input type=\"radio\" id=\"{}\"{}>",
                    escape_html(layer_id),
                    if *checked { " checked" } else { "" }
                )),
                ControlElement::Checkbox { layer_id, checked } => html.push_str(&format!(
                    "<input type=\"checkbox\" id=\"{}\"{}>",
                    escape_html(layer_id),
                    if *checked { " checked" } else { "" }
                )),
                ControlElement::Label { for_layer, text } => html.push_str(&format!(
                    "<label for=\"{}\">{}</label>",
                    escape_html(for_layer),
                    escape_html(text)
                )),
                ControlElement::Range {
                    layer_id,
                    min,
                    max,
                    value,
                } => html.push_str(&format!(
                    "<input type=\"range\" data-layer=\"{}\" min=\"{}\" max=\"{}\" value=\"{}\">",
                    escape_html(layer_id),
                    min,
                    max,
                    value
                )),
                ControlElement::Break => html.push_str("<br>"),
                ControlElement::Rule => html.push_str("<hr>"),
            }
        }
        html.push_str("</div>");
        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn radios(ids: &[&str]) -> ControlContainer {
        let mut container = ControlContainer::new(CONTROL_ID, CONTROL_CLASS);
        for (i, id) in ids.iter().enumerate() {
            container.push(ControlElement::Radio {
                layer_id: id.to_string(),
                checked: i == 0,
            });
        }
        container
    }

    #[test]
    fn test_check_radio_is_exclusive() {
        let mut container = radios(&["a", "b", "c"]);
        assert_eq!(container.checked_radio(), Some("a"));

        assert!(container.check_radio("c"));
        assert_eq!(container.checked_radio(), Some("c"));

        assert!(!container.check_radio("missing"));
        assert_eq!(container.checked_radio(), Some("c"));
    }

    #[test]
    fn test_range_is_clamped() {
        let mut container = ControlContainer::new(CONTROL_ID, CONTROL_CLASS);
        container.push(ControlElement::Range {
            layer_id: "hillshade".to_string(),
            min: 0,
            max: 100,
            value: 100,
        });

        assert_eq!(container.set_range("hillshade", 250), Some(100));
        assert_eq!(container.set_range("hillshade", 35), Some(35));
        assert_eq!(container.range("hillshade"), Some(35));
        assert_eq!(container.set_range("building", 10), None);
    }

    #[test]
    fn test_html_escapes_labels() {
        let mut container = radios(&["a"]);
        container.push(ControlElement::Label {
            for_layer: "a".to_string(),
            text: "<b>淡色地図</b>".to_string(),
        });
        container.push(ControlElement::Break);

        assert_eq!(
            container.to_html(),
            "<div class=\"maplibregl-ctrl maplibregl-ctrl-group\" id=\"opacity-control\">\
             <input type=\"radio\" id=\"a\" checked>\
             <label for=\"a\">&lt;b&gt;淡色地図&lt;/b&gt;</label><br></div>"
        );
    }
}
