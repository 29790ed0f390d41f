//! Bridge WASM <-> JavaScript trung lập framework: lọc và tô sáng không cần DOM.

use serde::{Deserialize, Serialize};
use serde_wasm_bindgen::{from_value, to_value};
use timeline_core::{
    Highlighter, SectionFields, Segment, TimelineConfig, TimelineError, TimelineEvaluation,
    TimelineFilter, TimelineIndex,
};
use wasm_bindgen::prelude::*;

#[derive(Deserialize)]
struct JsTimelineConfig {
    #[serde(default)]
    subcategory_categories: Option<Vec<String>>,
    #[serde(default)]
    highlight_class: Option<String>,
}

impl From<JsTimelineConfig> for TimelineConfig {
    fn from(cfg: JsTimelineConfig) -> Self {
        let mut base = TimelineConfig::default();
        if let Some(categories) = cfg.subcategory_categories {
            base.subcategory_categories = categories;
        }
        if let Some(class) = cfg.highlight_class {
            base.highlight_class = class;
        }
        base
    }
}

/// Truy vấn giống thao tác người dùng: chọn danh mục, nhóm con rồi gõ từ khóa.
#[derive(Deserialize, Default)]
struct JsFilterQuery {
    #[serde(default)]
    filter: Option<String>,
    #[serde(default)]
    subcategory: Option<String>,
    #[serde(default)]
    search: Option<String>,
}

#[derive(Serialize)]
struct JsEvaluation {
    #[serde(flatten)]
    evaluation: TimelineEvaluation,
    filter: String,
    subcategory: Option<String>,
    search_term: String,
}

#[wasm_bindgen]
pub fn evaluate_timeline(
    sections: JsValue,
    query: Option<JsValue>,
    config: Option<JsValue>,
) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let sections: Vec<SectionFields> = from_value(sections)
        .map_err(|err| JsValue::from_str(&format!("Không đọc được danh sách section: {err}")))?;

    let query = match query {
        Some(js_query) => from_value::<JsFilterQuery>(js_query)
            .map_err(|err| JsValue::from_str(&format!("Không đọc được truy vấn: {err}")))?,
        None => JsFilterQuery::default(),
    };

    let cfg = match config {
        Some(js_cfg) => {
            let cfg: JsTimelineConfig = from_value(js_cfg)
                .map_err(|err| JsValue::from_str(&format!("Không đọc được config: {err}")))?;
            TimelineConfig::from(cfg)
        }
        None => TimelineConfig::default(),
    };

    let evaluation = evaluate(sections, &query, cfg)
        .map_err(|err| JsValue::from_str(&format_timeline_error(err)))?;

    to_value(&evaluation)
        .map_err(|err| JsValue::from_str(&format!("Không serialize kết quả: {err}")))
}

/// Tách `text` thành các đoạn `{ text, highlighted }` theo từ khóa.
#[wasm_bindgen]
pub fn highlight_text(text: &str, term: &str) -> Result<JsValue, JsValue> {
    let highlighter =
        Highlighter::new(term).map_err(|err| JsValue::from_str(&format_timeline_error(err)))?;
    let segments: Vec<Segment> = highlighter.segments(text);
    to_value(&segments)
        .map_err(|err| JsValue::from_str(&format!("Không serialize kết quả: {err}")))
}

fn evaluate(
    sections: Vec<SectionFields>,
    query: &JsFilterQuery,
    config: TimelineConfig,
) -> Result<JsEvaluation, TimelineError> {
    let mut filter = TimelineFilter::new(TimelineIndex::from_sections(sections), config)?;
    if let Some(code) = &query.filter {
        filter.select_filter(code);
    }
    if let Some(code) = &query.subcategory {
        filter.select_subcategory(code)?;
    }
    if let Some(term) = &query.search {
        filter.set_search_term(term);
    }

    let state = filter.state();
    Ok(JsEvaluation {
        evaluation: filter.evaluation(),
        filter: state.filter.code().to_string(),
        subcategory: state.subcategory.clone(),
        search_term: state.search_term.clone(),
    })
}

fn format_timeline_error(err: TimelineError) -> String {
    format!("Timeline error: {err}")
}
