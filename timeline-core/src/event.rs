//! Bản ghi sự kiện và chỉ mục văn bản dựng một lần khi tải trang.

use serde::{Deserialize, Serialize};

/// Chỉ số của sự kiện trong `TimelineIndex`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventId(pub usize);

/// Chỉ số của section trong `TimelineIndex`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionId(pub usize);

/// Thuộc tính gốc của một thẻ sự kiện, đọc từ DOM hoặc JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct EventFields {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub subcategories: Vec<String>,
    pub category: String,
    #[serde(default)]
    pub subcategory: Option<String>,
}

/// Sự kiện kèm chuỗi tìm kiếm chữ thường đã tính sẵn.
///
/// Nội dung trang là tĩnh nên `search_text` không bao giờ cần tính lại.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "EventFields", into = "EventFields")]
pub struct EventRecord {
    fields: EventFields,
    search_text: String,
}

impl From<EventFields> for EventRecord {
    fn from(fields: EventFields) -> Self {
        let mut parts = vec![
            fields.title.as_str(),
            fields.description.as_str(),
            fields.year.as_str(),
        ];
        parts.extend(fields.categories.iter().map(String::as_str));
        parts.extend(fields.subcategories.iter().map(String::as_str));
        let search_text = parts.join(" ").to_lowercase();
        Self {
            fields,
            search_text,
        }
    }
}

impl From<EventRecord> for EventFields {
    fn from(record: EventRecord) -> Self {
        record.fields
    }
}

impl EventRecord {
    pub fn fields(&self) -> &EventFields {
        &self.fields
    }

    pub fn title(&self) -> &str {
        &self.fields.title
    }

    pub fn description(&self) -> &str {
        &self.fields.description
    }

    pub fn year(&self) -> &str {
        &self.fields.year
    }

    /// Mã danh mục chính.
    pub fn category(&self) -> &str {
        &self.fields.category
    }

    /// Mã nhóm con, nếu có.
    pub fn subcategory(&self) -> Option<&str> {
        self.fields.subcategory.as_deref()
    }

    /// Tiêu đề, mô tả, năm và các nhãn, nối bằng dấu cách và viết thường.
    pub fn search_text(&self) -> &str {
        &self.search_text
    }
}

/// Dữ liệu đầu vào của một section (JSON/CLI).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SectionFields {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub events: Vec<EventFields>,
}

/// Nhóm hiển thị chứa các sự kiện.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Section {
    pub label: Option<String>,
    pub events: Vec<EventId>,
}

/// Toàn bộ sự kiện và section của trang, theo thứ tự tài liệu.
#[derive(Debug, Clone, Default)]
pub struct TimelineIndex {
    events: Vec<EventRecord>,
    sections: Vec<Section>,
    owners: Vec<SectionId>,
}

impl TimelineIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dựng chỉ mục từ danh sách section (ví dụ đọc từ file JSON).
    pub fn from_sections(sections: Vec<SectionFields>) -> Self {
        let mut index = Self::new();
        for section in sections {
            let id = index.push_section(section.label);
            for fields in section.events {
                index.push_event(id, EventRecord::from(fields));
            }
        }
        index
    }

    pub fn push_section(&mut self, label: Option<String>) -> SectionId {
        let id = SectionId(self.sections.len());
        self.sections.push(Section {
            label,
            events: Vec::new(),
        });
        id
    }

    /// Thêm sự kiện vào section `section`.
    ///
    /// # Panics
    /// Khi `section` không được tạo bởi chính chỉ mục này.
    pub fn push_event(&mut self, section: SectionId, record: EventRecord) -> EventId {
        let id = EventId(self.events.len());
        self.sections[section.0].events.push(id);
        self.events.push(record);
        self.owners.push(section);
        id
    }

    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn event(&self, id: EventId) -> Option<&EventRecord> {
        self.events.get(id.0)
    }

    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.get(id.0)
    }

    /// Section chứa sự kiện `id`.
    pub fn section_of(&self, id: EventId) -> Option<SectionId> {
        self.owners.get(id.0).copied()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
