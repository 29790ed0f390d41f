#![allow(dead_code)]

use std::fs;

use timeline_core::{EventId, SectionFields, TimelineConfig, TimelineFilter, TimelineIndex};

fn fixture_path(name: &str) -> String {
    format!("{}/tests/data/{name}", env!("CARGO_MANIFEST_DIR"))
}

pub fn load_index() -> TimelineIndex {
    let raw = fs::read_to_string(fixture_path("timeline_sections.json"))
        .expect("Không đọc được timeline mẫu");
    let sections: Vec<SectionFields> = serde_json::from_str(&raw).expect("Timeline mẫu không hợp lệ");
    TimelineIndex::from_sections(sections)
}

pub fn load_filter() -> TimelineFilter {
    TimelineFilter::new(load_index(), TimelineConfig::default()).expect("Cấu hình mặc định hợp lệ")
}

pub fn ids(raw: &[usize]) -> Vec<EventId> {
    raw.iter().copied().map(EventId).collect()
}
