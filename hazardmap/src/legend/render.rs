//! HTML rendering adapter for legend panels and popups.
//!
//! Matching stays in [`super::matcher`]; this module only turns results into
//! markup for the host page.

use super::catalog::{GuideColor, HazardLegend};
use crate::shelter::ShelterRecord;

/// Text shown when a shelter has no barrier-free information.
pub const NO_ACCESSIBILITY_INFO: &str = "なし";

/// Escapes text for use inside HTML element content or a quoted attribute.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Legend panel: one colored label per palette entry.
pub fn legend_panel_html(guide_colors: &[GuideColor]) -> String {
    guide_colors
        .iter()
        .map(|item| {
            format!(
                "<div class='label' style='background:{};'>{}</div>",
                escape_html(&item.css),
                escape_html(&item.label)
            )
        })
        .collect()
}

/// Popup body for a hazard lookup result.
pub fn hazard_popup_html(legend: &HazardLegend, guide: &GuideColor) -> String {
    format!(
        "<div>{}</div><h2 style='margin-bottom:0;'>{}</h2><div style='background:{}; padding:6px;'></div>",
        escape_html(&legend.name),
        escape_html(&guide.label),
        escape_html(&guide.css)
    )
}

/// Popup body for a shelter: name, address and barrier-free facilities.
pub fn shelter_popup_html(record: &ShelterRecord) -> String {
    let items = record.accessibility.items();
    let accessibility = if items.is_empty() {
        NO_ACCESSIBILITY_INFO.to_string()
    } else {
        let list: String = items
            .iter()
            .map(|item| format!("<li>{}</li>", escape_html(item)))
            .collect();
        format!("<ul style=\"margin: 0; padding-left: 20px;\">{}</ul>", list)
    };

    format!(
        "<h2 style=\"margin: 4px 0 8px 0;\">{}</h2><div>{}<hr /><b>バリアフリー情報</b>{}</div>",
        escape_html(&record.name),
        escape_html(&record.address),
        accessibility
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::LngLat;
    use crate::legend::Rgba;
    use crate::shelter::{Accessibility, ShelterId};

    fn guide(css: &str, label: &str) -> GuideColor {
        GuideColor {
            css: css.to_string(),
            color: css.parse::<Rgba>().unwrap(),
            label: label.to_string(),
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape_html("<a href='x'>&\"</a>"), "&lt;a href=&#39;x&#39;&gt;&amp;&quot;&lt;/a&gt;");
        assert_eq!(escape_html("浸水"), "浸水");
    }

    #[test]
    fn test_legend_panel() {
        let html = legend_panel_html(&[guide("#f7f5a9", "0.5m未満"), guide("#ffd8c0", "0.5~3.0m")]);
        assert_eq!(
            html,
            "<div class='label' style='background:#f7f5a9;'>0.5m未満</div>\
             <div class='label' style='background:#ffd8c0;'>0.5~3.0m</div>"
        );
    }

    #[test]
    fn test_hazard_popup() {
        let entry = guide("#ff9191", "5.0~10.0m");
        let legend = HazardLegend {
            id: "flood_layer".to_string(),
            name: "洪水浸水想定区域".to_string(),
            guide_colors: vec![entry.clone()],
        };
        let html = hazard_popup_html(&legend, &entry);
        assert!(html.starts_with("<div>洪水浸水想定区域</div>"));
        assert!(html.contains("<h2 style='margin-bottom:0;'>5.0~10.0m</h2>"));
        assert!(html.contains("background:#ff9191;"));
    }

    #[test]
    fn test_shelter_popup_without_accessibility() {
        let record = ShelterRecord::new(ShelterId::new("1"), "芝公園", "東京都港区", LngLat::new(0.0, 0.0));
        let html = shelter_popup_html(&record);
        assert!(html.contains("芝公園"));
        assert!(html.contains("<b>バリアフリー情報</b>なし"));
    }

    #[test]
    fn test_shelter_popup_lists_accessibility() {
        let record = ShelterRecord::new(ShelterId::new("1"), "港南中学校", "港区", LngLat::new(0.0, 0.0))
            .with_accessibility(Accessibility {
                slope: true,
                other: Some("<補助犬可>".to_string()),
                ..Accessibility::default()
            });
        let html = shelter_popup_html(&record);
        assert!(html.contains("<li>スロープ有</li>"));
        assert!(html.contains("<li>&lt;補助犬可&gt;</li>"));
        assert!(!html.contains(NO_ACCESSIBILITY_INFO));
    }
}
