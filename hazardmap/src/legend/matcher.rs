//! Nearest-color legend lookup.

use super::catalog::GuideColor;
use super::color::Rgba;

/// Returns the palette entry perceptually closest to `sample`.
///
/// Distance is CIE76 in Lab space. Among equally close entries the first in
/// palette order wins. Returns `None` only for an empty palette.
///
/// The sample's alpha does not take part; callers treat a fully transparent
/// sample as "no hazard data" and do not match it at all.
pub fn closest<'a>(sample: &Rgba, palette: &'a [GuideColor]) -> Option<&'a GuideColor> {
    let target = sample.to_lab();
    let mut best: Option<(&GuideColor, f64)> = None;

    for entry in palette {
        let distance = target.distance(&entry.color.to_lab());
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((entry, distance)),
        }
    }

    best.map(|(entry, _)| entry)
}
