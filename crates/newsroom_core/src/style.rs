//! crates/newsroom_core/src/style.rs
//!
//! Per-section presentation overrides, keyed by section id. Owned by an editor
//! session so two sessions never share overrides.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset_x: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset_y: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SectionStyles {
    styles: HashMap<String, SectionStyle>,
}

impl SectionStyles {
    pub fn update(&mut self, section_id: &str, style: SectionStyle) {
        self.styles.insert(section_id.to_string(), style);
    }

    pub fn get(&self, section_id: &str) -> SectionStyle {
        self.styles.get(section_id).cloned().unwrap_or_default()
    }

    pub fn reset(&mut self, section_id: &str) {
        self.styles.remove(section_id);
    }

    pub fn reset_all(&mut self) {
        self.styles.clear();
    }

    pub fn replace_all(&mut self, styles: HashMap<String, SectionStyle>) {
        self.styles = styles;
    }

    /// CSS custom properties for the section, only for overrides that are set and non-empty.
    pub fn css_variables(&self, section_id: &str) -> Vec<(&'static str, String)> {
        let style = self.get(section_id);
        [
            ("--section-font-size", style.font_size),
            ("--section-line-height", style.line_height),
            ("--section-offset-x", style.offset_x),
            ("--section-offset-y", style.offset_y),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.filter(|v| !v.is_empty()).map(|v| (name, v)))
        .collect()
    }
}
