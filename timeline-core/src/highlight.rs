//! Tách văn bản thành các đoạn khớp/không khớp với từ khóa tìm kiếm.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::TimelineError;

/// Một đoạn văn bản liên tục, có hoặc không được tô sáng.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub highlighted: bool,
}

impl Segment {
    fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            highlighted: false,
        }
    }
}

/// Mẫu tô sáng dựng từ từ khóa tìm kiếm.
///
/// Từ khóa được escape trước khi dựng mẫu nên `c++` hay `(beta` được so khớp
/// theo đúng nghĩa đen.
#[derive(Debug, Clone, Default)]
pub struct Highlighter {
    pattern: Option<Regex>,
}

impl Highlighter {
    /// Từ khóa rỗng (sau khi cắt khoảng trắng) cho ra highlighter không hoạt động.
    pub fn new(term: &str) -> Result<Self, TimelineError> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(Self { pattern: None });
        }
        let pattern = RegexBuilder::new(&regex::escape(term))
            .case_insensitive(true)
            .build()
            .map_err(|err| TimelineError::Pattern(err.to_string()))?;
        Ok(Self {
            pattern: Some(pattern),
        })
    }

    pub fn is_active(&self) -> bool {
        self.pattern.is_some()
    }

    /// Nối `text` của các đoạn trả về luôn cho lại đúng `text` ban đầu.
    pub fn segments(&self, text: &str) -> Vec<Segment> {
        if text.is_empty() {
            return Vec::new();
        }
        let Some(pattern) = &self.pattern else {
            return vec![Segment::plain(text)];
        };

        let mut segments = Vec::new();
        let mut cursor = 0;
        for found in pattern.find_iter(text) {
            if found.start() > cursor {
                segments.push(Segment::plain(&text[cursor..found.start()]));
            }
            segments.push(Segment {
                text: found.as_str().to_string(),
                highlighted: true,
            });
            cursor = found.end();
        }
        if cursor < text.len() {
            segments.push(Segment::plain(&text[cursor..]));
        }
        segments
    }
}
