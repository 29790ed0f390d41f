use timeline_core::{CategoryFilter, FilterChange, FilterState, TimelineConfig, TimelineError};

fn founder_seed(config: &TimelineConfig) -> FilterState {
    let mut state = FilterState::default();
    state.select_filter("founder", config);
    state
        .select_subcategory("seed", config)
        .expect("founder có nhóm con");
    state
}

#[test]
fn selecting_all_clears_subcategory_and_pickers() {
    let config = TimelineConfig::default();
    let mut state = founder_seed(&config);
    assert_eq!(state.open_picker.as_deref(), Some("founder"));

    assert_eq!(state.select_filter("all", &config), FilterChange::Recompute);
    assert_eq!(state.filter, CategoryFilter::All);
    assert_eq!(state.subcategory, None);
    assert_eq!(state.open_picker, None);
}

#[test]
fn switching_primary_category_clears_subcategory() {
    let config = TimelineConfig::default();
    let mut state = founder_seed(&config);

    assert_eq!(
        state.select_filter("regulation", &config),
        FilterChange::Recompute
    );
    assert_eq!(state.filter, CategoryFilter::Category("regulation".to_string()));
    assert_eq!(state.subcategory, None);
    assert_eq!(state.open_picker.as_deref(), Some("regulation"));
}

#[test]
fn category_without_subcategories_closes_pickers() {
    let config = TimelineConfig::default();
    let mut state = founder_seed(&config);

    state.select_filter("market", &config);
    assert_eq!(state.subcategory, None);
    assert_eq!(state.open_picker, None);
}

#[test]
fn clicking_active_category_toggles_picker_only() {
    let config = TimelineConfig::default();
    let mut state = founder_seed(&config);

    assert_eq!(
        state.select_filter("founder", &config),
        FilterChange::PickerToggled
    );
    assert_eq!(state.open_picker, None);
    assert_eq!(state.subcategory.as_deref(), Some("seed"));

    assert_eq!(
        state.select_filter("founder", &config),
        FilterChange::PickerToggled
    );
    assert_eq!(state.open_picker.as_deref(), Some("founder"));
    assert_eq!(state.subcategory.as_deref(), Some("seed"));
}

#[test]
fn subcategory_requires_owning_category() {
    let config = TimelineConfig::default();
    let mut state = FilterState::default();

    let err = state
        .select_subcategory("seed", &config)
        .expect_err("chưa chọn danh mục");
    assert!(matches!(
        err,
        TimelineError::SubcategoryWithoutCategory { ref subcategory } if subcategory == "seed"
    ));
    assert_eq!(state, FilterState::default());

    state.select_filter("market", &config);
    assert!(state.select_subcategory("seed", &config).is_err());
    assert_eq!(state.subcategory, None);
}

#[test]
fn subcategory_all_deselects() {
    let config = TimelineConfig::default();
    let mut state = founder_seed(&config);
    state
        .select_subcategory("all", &config)
        .expect("founder có nhóm con");
    assert_eq!(state.subcategory, None);
}

#[test]
fn clear_restores_defaults() {
    let config = TimelineConfig::default();
    let mut state = founder_seed(&config);
    state.set_search_term("seed");

    state.clear();
    assert_eq!(state, FilterState::default());
    assert_eq!(state.filter.code(), "all");
    assert!(!state.search_active());
}

#[test]
fn collapse_keeps_filter_values() {
    let config = TimelineConfig::default();
    let mut state = founder_seed(&config);

    assert!(state.collapse_pickers());
    assert!(!state.collapse_pickers());
    assert_eq!(state.filter.code(), "founder");
    assert_eq!(state.subcategory.as_deref(), Some("seed"));
}

#[test]
fn search_term_is_trimmed() {
    let mut state = FilterState::default();
    assert!(state.set_search_term("  seed "));
    assert_eq!(state.search_term, "seed");
    assert!(!state.set_search_term("seed"));
    assert!(state.set_search_term("   "));
    assert!(!state.search_active());
}

#[test]
fn config_rejects_out_of_range_threshold() {
    let config = TimelineConfig {
        visibility_threshold: 1.5,
        ..TimelineConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(TimelineError::InvalidConfig(_))
    ));
    assert_eq!(TimelineConfig::default().root_margin(), "0px 0px -100px 0px");
}

#[test]
fn partial_config_keeps_defaults() {
    let config: TimelineConfig =
        serde_json::from_str(r#"{ "fade_ms": 500 }"#).expect("JSON hợp lệ");
    assert_eq!(config.fade_ms, 500);
    assert_eq!(config.search_debounce_ms, 120);
    assert!(config.supports_subcategories("regulation"));
}
