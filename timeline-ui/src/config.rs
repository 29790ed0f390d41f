//! Cấu hình trang: thông số timeline và bộ chọn DOM.

use serde::{Deserialize, Serialize};
use timeline_core::TimelineConfig;

/// Bộ chọn CSS để tìm các phần tử của trang. Mọi trường đều có giá trị mặc định.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DomSelectors {
    pub progress_bar: String,
    pub section: String,
    pub marker: String,
    pub event: String,
    pub title: String,
    pub description: String,
    pub year: String,
    pub category_tag: String,
    pub subcategory_tag: String,
    pub search_input: String,
    pub search_button: String,
    pub clear_button: String,
    pub filter_button: String,
    pub subcategory_button: String,
    pub filter_controls: String,
    pub search_controls: String,
}

impl Default for DomSelectors {
    fn default() -> Self {
        Self {
            progress_bar: "#progress-bar".to_string(),
            section: ".timeline-section".to_string(),
            marker: ".timeline-marker".to_string(),
            event: ".timeline-event".to_string(),
            title: ".event-title".to_string(),
            description: ".event-description".to_string(),
            year: ".event-year".to_string(),
            category_tag: ".category-tag".to_string(),
            subcategory_tag: ".subcategory-tag".to_string(),
            search_input: "#search-input".to_string(),
            search_button: "#search-button".to_string(),
            clear_button: "#clear-button".to_string(),
            filter_button: ".filter-btn".to_string(),
            subcategory_button: ".subcategory-btn".to_string(),
            filter_controls: ".filter-controls".to_string(),
            search_controls: ".search-container".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PageConfig {
    pub timeline: TimelineConfig,
    pub selectors: DomSelectors,
    /// Mức log gửi ra console (`error`, `warn`, `info`, `debug`, `trace`).
    pub log_level: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            timeline: TimelineConfig::default(),
            selectors: DomSelectors::default(),
            log_level: "info".to_string(),
        }
    }
}
