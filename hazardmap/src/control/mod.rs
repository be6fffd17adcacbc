//! Map controls.
//!
//! [`LayerSwitcher`] offers exclusive base layers as radio buttons and
//! independent overlay layers as checkboxes, optionally with opacity
//! sliders. It is attached to a [`MapHost`](crate::map::MapHost) with
//! [`LayerSwitcher::on_add`] and torn down with [`LayerSwitcher::on_remove`].

mod container;
mod layer_switcher;

pub use container::{ControlContainer, ControlElement, CONTROL_CLASS, CONTROL_ID};
pub use layer_switcher::{
    ControlError, LayerSwitcher, LayerSwitcherOptions, OPACITY_DEFAULT, OPACITY_MAX, OPACITY_MIN,
};
