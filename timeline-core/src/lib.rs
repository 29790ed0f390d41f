//! Logic lõi cho trang timeline: chỉ mục văn bản, bộ lọc, tô sáng và tiến độ cuộn.
//!
//! Crate này không phụ thuộc vào DOM; lớp `timeline-ui` đọc kết quả
//! (`RenderPlan`, `ViewportTransition`...) và áp chúng lên trang.

use serde::{Deserialize, Serialize};

mod event;
mod filter;
mod highlight;
mod matching;
mod presence;
mod scroll;

pub use event::{
    EventFields, EventId, EventRecord, Section, SectionFields, SectionId, TimelineIndex,
};
pub use filter::{
    CategoryFilter, EventPatch, FadeOutcome, FilterChange, FilterState, HighlightPatch,
    PresenceChange, RenderPlan, SectionPatch, TimelineEvaluation, TimelineFilter,
};
pub use highlight::{Highlighter, Segment};
pub use matching::{is_visible, matches_filter, matches_search};
pub use presence::{section_visible, FadeMachine, FadeStep, Presence};
pub use scroll::{progress_width, scroll_fraction, FrameGate, MarkerPulse, ViewportTransition};

/// Mã bộ lọc tắt việc lọc theo danh mục.
pub const ALL_FILTER: &str = "all";

/// Cấu hình thời gian hiệu ứng, ngưỡng hiển thị và các danh mục có nhóm con.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimelineConfig {
    /// Khoảng lặng (ms) sau lần gõ phím cuối trước khi tìm kiếm.
    pub search_debounce_ms: u32,
    /// Thời lượng (ms) hiệu ứng mờ dần của thẻ sự kiện.
    pub fade_ms: u32,
    /// Thời gian (ms) giữ marker ở trạng thái phóng to.
    pub pulse_ms: u32,
    /// Tỉ lệ diện tích section phải nằm trong viewport để coi là "đã vào".
    pub visibility_threshold: f64,
    /// Lề dưới (px) trừ vào viewport để kích hoạt sớm hơn một chút.
    pub bottom_margin_px: u32,
    /// Các danh mục chính hỗ trợ nhóm con.
    pub subcategory_categories: Vec<String>,
    /// Class CSS của thẻ tô sáng kết quả tìm kiếm.
    pub highlight_class: String,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            search_debounce_ms: 120,
            fade_ms: 300,
            pulse_ms: 300,
            visibility_threshold: 0.1,
            bottom_margin_px: 100,
            subcategory_categories: vec!["founder".to_string(), "regulation".to_string()],
            highlight_class: "highlight".to_string(),
        }
    }
}

impl TimelineConfig {
    /// Kiểm tra các giá trị cấu hình trước khi dựng component.
    pub fn validate(&self) -> Result<(), TimelineError> {
        if !(0.0..=1.0).contains(&self.visibility_threshold) {
            return Err(TimelineError::InvalidConfig(format!(
                "visibility_threshold phải nằm trong [0, 1], nhận {}",
                self.visibility_threshold
            )));
        }
        if let Some(code) = self
            .subcategory_categories
            .iter()
            .find(|code| code.trim().is_empty() || code.as_str() == ALL_FILTER)
        {
            return Err(TimelineError::InvalidConfig(format!(
                "Mã danh mục có nhóm con không hợp lệ: {code:?}"
            )));
        }
        if self.highlight_class.trim().is_empty() {
            return Err(TimelineError::InvalidConfig(
                "highlight_class không được để trống".to_string(),
            ));
        }
        Ok(())
    }

    /// Danh mục `code` có bộ chọn nhóm con hay không.
    pub fn supports_subcategories(&self, code: &str) -> bool {
        self.subcategory_categories.iter().any(|owner| owner == code)
    }

    /// Giá trị `rootMargin` cho IntersectionObserver.
    pub fn root_margin(&self) -> String {
        format!("0px 0px -{}px 0px", self.bottom_margin_px)
    }
}

/// Lỗi chung của logic timeline.
#[derive(Debug, thiserror::Error)]
pub enum TimelineError {
    #[error("Cấu hình không hợp lệ: {0}")]
    InvalidConfig(String),
    #[error("Không thể chọn nhóm con {subcategory:?} khi danh mục hiện tại không hỗ trợ nhóm con")]
    SubcategoryWithoutCategory { subcategory: String },
    #[error("Không đọc được dữ liệu: {0}")]
    Parse(String),
    #[error("Không dựng được mẫu tô sáng: {0}")]
    Pattern(String),
}
