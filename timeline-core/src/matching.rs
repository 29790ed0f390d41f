//! Vị từ khớp tìm kiếm và danh mục. Các hàm ở đây thuần túy, không có side effect.

use crate::event::EventRecord;
use crate::filter::{CategoryFilter, FilterState};

/// Từ khóa rỗng khớp mọi sự kiện; ngược lại so khớp chuỗi con không phân biệt hoa thường.
pub fn matches_search(record: &EventRecord, term: &str) -> bool {
    term.is_empty() || contains_lowered(record, &term.to_lowercase())
}

pub(crate) fn contains_lowered(record: &EventRecord, needle: &str) -> bool {
    needle.is_empty() || record.search_text().contains(needle)
}

/// Khớp danh mục chính, sau đó khớp nhóm con nếu đang chọn.
pub fn matches_filter(
    record: &EventRecord,
    filter: &CategoryFilter,
    subcategory: Option<&str>,
) -> bool {
    let CategoryFilter::Category(code) = filter else {
        return true;
    };
    if record.category() != code {
        return false;
    }
    match subcategory {
        Some(sub) => record.subcategory() == Some(sub),
        None => true,
    }
}

/// Sự kiện hiển thị khi và chỉ khi khớp cả tìm kiếm lẫn bộ lọc.
pub fn is_visible(record: &EventRecord, state: &FilterState) -> bool {
    matches_search(record, &state.search_term)
        && matches_filter(record, &state.filter, state.subcategory.as_deref())
}
