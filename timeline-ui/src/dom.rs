#![cfg(target_arch = "wasm32")]

//! Quét DOM một lần lúc khởi động để dựng chỉ mục văn bản và nhận diện control.

use timeline_core::{EventFields, EventRecord, TimelineIndex};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, HtmlInputElement};

use crate::config::DomSelectors;

pub const DATA_CATEGORY: &str = "data-category";
pub const DATA_SUBCATEGORY: &str = "data-subcategory";
pub const DATA_FILTER: &str = "data-filter";

pub const VISIBLE_CLASS: &str = "visible";
pub const ACTIVE_CLASS: &str = "active";
pub const SHOW_CLASS: &str = "show";

const PICKER_SUFFIX: &str = "-subcategories";
/// Mọi bộ chọn nhóm con theo mẫu id `<mã danh mục>-subcategories`.
pub const PICKER_SELECTOR: &str = "[id$='-subcategories']";

pub fn picker_id(category: &str) -> String {
    format!("{category}{PICKER_SUFFIX}")
}

pub struct SectionNodes {
    pub element: HtmlElement,
    pub marker: Option<HtmlElement>,
}

pub struct EventNodes {
    pub root: HtmlElement,
    pub title: Option<Element>,
    pub description: Option<Element>,
}

/// Nút mang mã lọc; `owner` là danh mục sở hữu bộ chọn chứa nút (với nút nhóm con).
pub struct CodedControl {
    pub element: Element,
    pub code: String,
    pub owner: Option<String>,
}

#[derive(Default)]
pub struct Controls {
    pub search_input: Option<HtmlInputElement>,
    pub search_button: Option<Element>,
    pub clear_button: Option<Element>,
    pub filter_buttons: Vec<CodedControl>,
    pub subcategory_buttons: Vec<CodedControl>,
}

pub struct ScannedTimeline {
    pub index: TimelineIndex,
    pub sections: Vec<SectionNodes>,
    pub events: Vec<EventNodes>,
}

pub fn scan_timeline(
    document: &Document,
    selectors: &DomSelectors,
) -> Result<ScannedTimeline, JsValue> {
    let mut index = TimelineIndex::new();
    let mut sections = Vec::new();
    let mut events = Vec::new();

    for element in select_all(document, &selectors.section)? {
        let Ok(element) = element.dyn_into::<HtmlElement>() else {
            continue;
        };
        let section_id = index.push_section(element.get_attribute("aria-label"));
        let marker = select_one(&*element, &selectors.marker)
            .and_then(|marker| marker.dyn_into::<HtmlElement>().ok());

        for root in select_all(&*element, &selectors.event)? {
            let Ok(root) = root.dyn_into::<HtmlElement>() else {
                continue;
            };
            let title = select_one(&*root, &selectors.title);
            let description = select_one(&*root, &selectors.description);
            let fields = EventFields {
                title: raw_text(title.as_ref()),
                description: raw_text(description.as_ref()),
                year: raw_text(select_one(&*root, &selectors.year).as_ref())
                    .trim()
                    .to_string(),
                categories: tag_texts(&root, &selectors.category_tag)?,
                subcategories: tag_texts(&root, &selectors.subcategory_tag)?,
                category: root.get_attribute(DATA_CATEGORY).unwrap_or_default(),
                subcategory: root
                    .get_attribute(DATA_SUBCATEGORY)
                    .filter(|code| !code.is_empty()),
            };
            index.push_event(section_id, EventRecord::from(fields));
            events.push(EventNodes {
                root,
                title,
                description,
            });
        }

        sections.push(SectionNodes { element, marker });
    }

    Ok(ScannedTimeline {
        index,
        sections,
        events,
    })
}

pub fn scan_controls(document: &Document, selectors: &DomSelectors) -> Result<Controls, JsValue> {
    let filter_buttons = select_all(document, &selectors.filter_button)?
        .into_iter()
        .filter_map(|element| {
            let code = element.get_attribute(DATA_FILTER)?;
            Some(CodedControl {
                element,
                code,
                owner: None,
            })
        })
        .collect();

    let subcategory_buttons = select_all(document, &selectors.subcategory_button)?
        .into_iter()
        .filter_map(|element| {
            let code = element.get_attribute(DATA_SUBCATEGORY)?;
            let owner = element
                .closest(PICKER_SELECTOR)
                .ok()
                .flatten()
                .and_then(|picker| picker.id().strip_suffix(PICKER_SUFFIX).map(str::to_string));
            Some(CodedControl {
                element,
                code,
                owner,
            })
        })
        .collect();

    Ok(Controls {
        search_input: select_one(document, &selectors.search_input)
            .and_then(|input| input.dyn_into::<HtmlInputElement>().ok()),
        search_button: select_one(document, &selectors.search_button),
        clear_button: select_one(document, &selectors.clear_button),
        filter_buttons,
        subcategory_buttons,
    })
}

/// Trả `true` nếu `target` nằm trong (hoặc chính là) phần tử khớp `selector`.
pub fn is_within(target: &Element, selector: &str) -> bool {
    matches!(target.closest(selector), Ok(Some(_)))
}

pub fn toggle_class(element: &Element, class: &str, on: bool) {
    let _ = element.class_list().toggle_with_force(class, on);
}

/// Phần tử đầu tiên khớp; bộ chọn sai hay không tìm thấy đều cho `None`.
fn select_one<S: Selectable>(scope: &S, selector: &str) -> Option<Element> {
    scope.query_one(selector).ok().flatten()
}

fn select_all<S: Selectable>(scope: &S, selector: &str) -> Result<Vec<Element>, JsValue> {
    let list = scope.query_all(selector)?;
    Ok((0..list.length())
        .filter_map(|idx| list.item(idx))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

fn raw_text(element: Option<&Element>) -> String {
    element
        .and_then(|element| element.text_content())
        .unwrap_or_default()
}

fn tag_texts(root: &Element, selector: &str) -> Result<Vec<String>, JsValue> {
    Ok(select_all(root, selector)?
        .iter()
        .filter_map(|tag| tag.text_content())
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .collect())
}

/// `Document` và `Element` có `querySelector` riêng, không chung trait trong web-sys.
trait Selectable {
    fn query_one(&self, selector: &str) -> Result<Option<Element>, JsValue>;
    fn query_all(&self, selector: &str) -> Result<web_sys::NodeList, JsValue>;
}

impl Selectable for Document {
    fn query_one(&self, selector: &str) -> Result<Option<Element>, JsValue> {
        self.query_selector(selector)
    }

    fn query_all(&self, selector: &str) -> Result<web_sys::NodeList, JsValue> {
        self.query_selector_all(selector)
    }
}

impl Selectable for Element {
    fn query_one(&self, selector: &str) -> Result<Option<Element>, JsValue> {
        self.query_selector(selector)
    }

    fn query_all(&self, selector: &str) -> Result<web_sys::NodeList, JsValue> {
        self.query_selector_all(selector)
    }
}
