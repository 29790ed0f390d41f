//! Trạng thái bộ lọc/tìm kiếm và lượt tính lại khả năng hiển thị.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::event::{EventId, SectionId, TimelineIndex};
use crate::highlight::{Highlighter, Segment};
use crate::matching::{contains_lowered, matches_filter};
use crate::presence::{section_visible, FadeMachine, FadeStep};
use crate::{TimelineConfig, TimelineError, ALL_FILTER};

/// Danh mục chính đang lọc.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(from = "String", into = "String")]
pub enum CategoryFilter {
    #[default]
    All,
    Category(String),
}

impl CategoryFilter {
    /// `"all"` hoặc chuỗi rỗng tắt lọc theo danh mục.
    pub fn parse(code: &str) -> Self {
        let code = code.trim();
        if code.is_empty() || code == ALL_FILTER {
            Self::All
        } else {
            Self::Category(code.to_string())
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::All => ALL_FILTER,
            Self::Category(code) => code,
        }
    }
}

impl From<String> for CategoryFilter {
    fn from(code: String) -> Self {
        Self::parse(&code)
    }
}

impl From<CategoryFilter> for String {
    fn from(filter: CategoryFilter) -> Self {
        filter.code().to_string()
    }
}

/// Hệ quả của việc bấm một nút lọc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterChange {
    /// Vị từ khớp đã đổi, cần tính lại.
    Recompute,
    /// Chỉ bật/tắt bộ chọn nhóm con của danh mục đang chọn.
    PickerToggled,
}

/// Trạng thái bộ lọc duy nhất của trang.
///
/// `subcategory` chỉ khác `None` khi `filter` là danh mục có nhóm con.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct FilterState {
    pub filter: CategoryFilter,
    pub subcategory: Option<String>,
    pub search_term: String,
    /// Danh mục có bộ chọn nhóm con đang mở.
    pub open_picker: Option<String>,
}

impl FilterState {
    /// Trả về `true` nếu từ khóa (đã cắt khoảng trắng) thay đổi.
    pub fn set_search_term(&mut self, term: &str) -> bool {
        let term = term.trim();
        if self.search_term == term {
            return false;
        }
        self.search_term = term.to_string();
        true
    }

    pub fn select_filter(&mut self, code: &str, config: &TimelineConfig) -> FilterChange {
        match CategoryFilter::parse(code) {
            CategoryFilter::All => {
                self.filter = CategoryFilter::All;
                self.subcategory = None;
                self.open_picker = None;
                FilterChange::Recompute
            }
            CategoryFilter::Category(code) if config.supports_subcategories(&code) => {
                if self.filter.code() == code {
                    self.open_picker = match self.open_picker.take() {
                        Some(open) if open == code => None,
                        _ => Some(code),
                    };
                    return FilterChange::PickerToggled;
                }
                self.filter = CategoryFilter::Category(code.clone());
                self.subcategory = None;
                self.open_picker = Some(code);
                FilterChange::Recompute
            }
            other => {
                self.filter = other;
                self.subcategory = None;
                self.open_picker = None;
                FilterChange::Recompute
            }
        }
    }

    /// Chọn nhóm con của danh mục đang lọc; `"all"` bỏ chọn nhóm con.
    pub fn select_subcategory(
        &mut self,
        code: &str,
        config: &TimelineConfig,
    ) -> Result<(), TimelineError> {
        match &self.filter {
            CategoryFilter::Category(owner) if config.supports_subcategories(owner) => {
                let code = code.trim();
                self.subcategory = if code.is_empty() || code == ALL_FILTER {
                    None
                } else {
                    Some(code.to_string())
                };
                Ok(())
            }
            _ => Err(TimelineError::SubcategoryWithoutCategory {
                subcategory: code.to_string(),
            }),
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Đóng bộ chọn nhóm con đang mở; giá trị lọc giữ nguyên.
    pub fn collapse_pickers(&mut self) -> bool {
        self.open_picker.take().is_some()
    }

    pub fn search_active(&self) -> bool {
        !self.search_term.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceChange {
    Reveal,
    BeginFade { epoch: u32 },
}

/// Nội dung mới cho tiêu đề và mô tả của thẻ.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HighlightPatch {
    pub title: Vec<Segment>,
    pub description: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventPatch {
    pub event: EventId,
    pub presence: Option<PresenceChange>,
    pub highlight: Option<HighlightPatch>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct SectionPatch {
    pub section: SectionId,
    pub visible: bool,
}

/// Các thay đổi DOM cần áp sau một lượt tính lại. Chỉ chứa những gì khác đi.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderPlan {
    pub events: Vec<EventPatch>,
    pub sections: Vec<SectionPatch>,
}

impl RenderPlan {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.sections.is_empty()
    }
}

/// Kết quả khi một thẻ mờ dần xong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FadeOutcome {
    pub event: EventId,
    pub section: Option<SectionPatch>,
}

/// Tập sự kiện/section khớp trạng thái hiện tại, tính thuần theo vị từ.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TimelineEvaluation {
    pub visible_events: Vec<EventId>,
    pub visible_sections: Vec<SectionId>,
}

/// Mô hình bộ lọc của trang: trạng thái, chỉ mục và trạng thái hiển thị đã áp lên DOM.
#[derive(Debug, Clone)]
pub struct TimelineFilter {
    index: TimelineIndex,
    config: TimelineConfig,
    state: FilterState,
    presence: Vec<FadeMachine>,
    rendered_terms: Vec<String>,
    section_shown: Vec<bool>,
}

impl TimelineFilter {
    /// Mọi thẻ và section ban đầu được coi là đang hiện, không tô sáng.
    pub fn new(index: TimelineIndex, config: TimelineConfig) -> Result<Self, TimelineError> {
        config.validate()?;
        let presence = vec![FadeMachine::default(); index.len()];
        let rendered_terms = vec![String::new(); index.len()];
        let section_shown = vec![true; index.sections().len()];
        Ok(Self {
            index,
            config,
            state: FilterState::default(),
            presence,
            rendered_terms,
            section_shown,
        })
    }

    pub fn index(&self) -> &TimelineIndex {
        &self.index
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn presence(&self, event: EventId) -> Option<&FadeMachine> {
        self.presence.get(event.0)
    }

    pub fn is_section_shown(&self, section: SectionId) -> bool {
        self.section_shown.get(section.0).copied().unwrap_or(false)
    }

    pub fn set_search_term(&mut self, term: &str) -> RenderPlan {
        self.state.set_search_term(term);
        self.recompute()
    }

    /// Bấm lại danh mục đang chọn chỉ bật/tắt bộ chọn nhóm con và trả về kế hoạch rỗng.
    pub fn select_filter(&mut self, code: &str) -> RenderPlan {
        match self.state.select_filter(code, &self.config) {
            FilterChange::Recompute => self.recompute(),
            FilterChange::PickerToggled => RenderPlan::default(),
        }
    }

    pub fn select_subcategory(&mut self, code: &str) -> Result<RenderPlan, TimelineError> {
        self.state.select_subcategory(code, &self.config)?;
        Ok(self.recompute())
    }

    pub fn clear(&mut self) -> RenderPlan {
        self.state.clear();
        self.recompute()
    }

    pub fn collapse_pickers(&mut self) -> bool {
        self.state.collapse_pickers()
    }

    /// Đánh giá lại mọi sự kiện theo trạng thái hiện tại.
    pub fn recompute(&mut self) -> RenderPlan {
        let term = self.state.search_term.clone();
        let needle = term.to_lowercase();
        let highlighter = Highlighter::new(&term).unwrap_or_else(|err| {
            warn!("Bỏ qua tô sáng cho từ khóa {term:?}: {err}");
            Highlighter::default()
        });

        let mut plan = RenderPlan::default();
        let mut visible_count = 0usize;
        for (idx, record) in self.index.events().iter().enumerate() {
            let visible = contains_lowered(record, &needle)
                && matches_filter(
                    record,
                    &self.state.filter,
                    self.state.subcategory.as_deref(),
                );
            let mut patch = EventPatch {
                event: EventId(idx),
                presence: None,
                highlight: None,
            };

            if visible {
                visible_count += 1;
                if self.presence[idx].show() == FadeStep::Reveal {
                    patch.presence = Some(PresenceChange::Reveal);
                }
                if self.rendered_terms[idx] != term {
                    patch.highlight = Some(HighlightPatch {
                        title: highlighter.segments(record.title()),
                        description: highlighter.segments(record.description()),
                    });
                    self.rendered_terms[idx].clone_from(&term);
                }
            } else if let FadeStep::BeginFade { epoch } = self.presence[idx].fade() {
                patch.presence = Some(PresenceChange::BeginFade { epoch });
            }

            if patch.presence.is_some() || patch.highlight.is_some() {
                plan.events.push(patch);
            }
        }

        for idx in 0..self.section_shown.len() {
            if let Some(patch) = self.refresh_section(SectionId(idx)) {
                plan.sections.push(patch);
            }
        }

        debug!(
            "Tính lại timeline: {visible_count}/{} sự kiện hiển thị, {} thay đổi thẻ, {} thay đổi section",
            self.index.len(),
            plan.events.len(),
            plan.sections.len()
        );
        plan
    }

    /// Thẻ `event` đã mờ dần xong. `None` khi thông báo đã cũ hoặc thẻ không còn mờ dần.
    pub fn fade_finished(&mut self, event: EventId, epoch: Option<u32>) -> Option<FadeOutcome> {
        if !self.presence.get_mut(event.0)?.complete(epoch) {
            return None;
        }
        let section = self
            .index
            .section_of(event)
            .and_then(|section| self.refresh_section(section));
        Some(FadeOutcome { event, section })
    }

    /// Kết thúc ngay mọi hiệu ứng mờ dần đang chạy (môi trường không có hiệu ứng).
    pub fn settle(&mut self) -> Vec<FadeOutcome> {
        (0..self.presence.len())
            .filter_map(|idx| self.fade_finished(EventId(idx), None))
            .collect()
    }

    pub fn evaluation(&self) -> TimelineEvaluation {
        let needle = self.state.search_term.to_lowercase();
        let visible_events: Vec<EventId> = self
            .index
            .events()
            .iter()
            .enumerate()
            .filter(|(_, record)| {
                contains_lowered(record, &needle)
                    && matches_filter(
                        record,
                        &self.state.filter,
                        self.state.subcategory.as_deref(),
                    )
            })
            .map(|(idx, _)| EventId(idx))
            .collect();

        let visible_sections = self
            .index
            .sections()
            .iter()
            .enumerate()
            .filter(|(_, section)| {
                section
                    .events
                    .iter()
                    .any(|event| visible_events.binary_search(event).is_ok())
            })
            .map(|(idx, _)| SectionId(idx))
            .collect();

        TimelineEvaluation {
            visible_events,
            visible_sections,
        }
    }

    fn refresh_section(&mut self, section: SectionId) -> Option<SectionPatch> {
        let children = &self.index.section(section)?.events;
        let visible = section_visible(children.iter().map(|event| &self.presence[event.0]));
        let shown = self.section_shown.get_mut(section.0)?;
        if *shown == visible {
            return None;
        }
        *shown = visible;
        Some(SectionPatch { section, visible })
    }
}
