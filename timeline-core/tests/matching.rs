mod common;

use timeline_core::{
    is_visible, matches_filter, matches_search, CategoryFilter, EventFields, EventRecord,
    FilterState, TimelineConfig,
};

fn visible_ids(state: &FilterState) -> Vec<usize> {
    common::load_index()
        .events()
        .iter()
        .enumerate()
        .filter(|(_, record)| is_visible(record, state))
        .map(|(idx, _)| idx)
        .collect()
}

#[test]
fn search_text_is_cached_lowercase_of_all_fields() {
    let record = EventRecord::from(EventFields {
        title: "Seed Round".to_string(),
        description: "Angel Money".to_string(),
        year: "2021".to_string(),
        categories: vec!["Founder".to_string()],
        subcategories: vec!["Seed".to_string()],
        category: "founder".to_string(),
        subcategory: Some("seed".to_string()),
    });

    assert_eq!(record.search_text(), "seed round angel money 2021 founder seed");
}

#[test]
fn empty_search_matches_every_event() {
    let index = common::load_index();
    assert!(index.events().iter().all(|record| matches_search(record, "")));
}

#[test]
fn search_matches_substring_anywhere_case_insensitively() {
    let mut state = FilterState::default();
    state.set_search_term("2021");
    // Năm của sự kiện 3, mô tả của sự kiện 4.
    assert_eq!(visible_ids(&state), vec![3, 4]);

    state.set_search_term("SEED");
    // Nhãn nhóm con của sự kiện 0, tiêu đề của sự kiện 3.
    assert_eq!(visible_ids(&state), vec![0, 3]);
}

#[test]
fn search_is_plain_substring_not_tokenized() {
    let index = common::load_index();
    let record = &index.events()[3];
    assert!(matches_search(record, "c++ tool"));
    assert!(matches_search(record, "(early"));
    assert!(!matches_search(record, "tooling c++"));
}

#[test]
fn category_filter_only_removes_matches() {
    let index = common::load_index();
    for code in ["founder", "regulation", "market", "unknown"] {
        let filter = CategoryFilter::parse(code);
        for record in index.events() {
            if matches_filter(record, &filter, None) {
                assert!(matches_filter(record, &CategoryFilter::All, None));
            }
            if matches_filter(record, &filter, Some("seed")) {
                assert!(matches_filter(record, &filter, None));
            }
        }
    }
}

#[test]
fn founder_seed_shows_only_founder_seed_events() {
    let config = TimelineConfig::default();
    let mut state = FilterState::default();
    state.select_filter("founder", &config);
    assert_eq!(visible_ids(&state), vec![0, 2, 3]);

    state
        .select_subcategory("seed", &config)
        .expect("founder có nhóm con");
    assert_eq!(visible_ids(&state), vec![0, 3]);
}

#[test]
fn visibility_requires_search_and_filter() {
    let config = TimelineConfig::default();
    let mut state = FilterState::default();
    state.set_search_term("2021");
    state.select_filter("founder", &config);
    assert_eq!(visible_ids(&state), vec![3]);

    state.select_filter("regulation", &config);
    assert!(visible_ids(&state).is_empty());
}
