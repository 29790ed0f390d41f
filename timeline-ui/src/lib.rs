//! Gắn tương tác cho trang timeline có sẵn trong môi trường WebAssembly:
//! thanh tiến độ cuộn, hiệu ứng marker và bộ lọc/tìm kiếm sự kiện.

mod config;

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod filter;
#[cfg(target_arch = "wasm32")]
mod progress;
#[cfg(target_arch = "wasm32")]
mod styles;
#[cfg(target_arch = "wasm32")]
mod timer;

pub use config::{DomSelectors, PageConfig};

#[cfg(target_arch = "wasm32")]
mod wasm_ui {
    use std::rc::{Rc, Weak};
    use std::str::FromStr;

    use gloo::events::EventListener;
    use log::{error, info, Level};
    use serde_wasm_bindgen::from_value;
    use timeline_core::TimelineError;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use web_sys::{Document, HtmlElement, Window};

    use crate::config::PageConfig;
    use crate::dom;
    use crate::filter::EventFilterEngine;
    use crate::progress::ScrollProgressTracker;
    use crate::styles;

    /// Các component của một trang đã gắn. Giữ đối tượng này để listener còn sống.
    #[wasm_bindgen]
    pub struct TimelinePage {
        tracker: Rc<ScrollProgressTracker>,
        filters: Rc<EventFilterEngine>,
        _unload: EventListener,
    }

    #[wasm_bindgen]
    impl TimelinePage {
        /// Hủy khung hình, timer đang chờ và gỡ mọi listener của component.
        pub fn destroy(&self) {
            self.tracker.teardown();
            self.filters.teardown();
        }
    }

    #[wasm_bindgen]
    pub fn mount_timeline_page(config: JsValue) -> Result<TimelinePage, JsValue> {
        console_error_panic_hook::set_once();

        let config: PageConfig = if config.is_undefined() || config.is_null() {
            PageConfig::default()
        } else {
            from_value(config)
                .map_err(|err| JsValue::from_str(&format!("Không đọc được config: {err}")))?
        };
        init_logging(&config.log_level);
        config
            .timeline
            .validate()
            .map_err(|err| JsValue::from_str(&format_timeline_error(err)))?;

        let window: Window =
            web_sys::window().ok_or_else(|| JsValue::from_str("Không có window"))?;
        let document: Document = window
            .document()
            .ok_or_else(|| JsValue::from_str("Không truy cập được document"))?;

        if let Err(err) = styles::ensure_styles(&document, &config) {
            error!("Không chèn được style mặc định: {err:?}");
        }

        let scanned = dom::scan_timeline(&document, &config.selectors)?;
        let controls = dom::scan_controls(&document, &config.selectors)?;
        let indicator = document
            .query_selector(&config.selectors.progress_bar)
            .ok()
            .flatten()
            .and_then(|element| element.dyn_into::<HtmlElement>().ok());

        info!(
            "Gắn timeline: {} section, {} sự kiện",
            scanned.sections.len(),
            scanned.index.len()
        );

        let tracker = ScrollProgressTracker::start(
            &window,
            &document,
            indicator,
            &scanned.sections,
            &config.timeline,
        )?;
        let section_elements = scanned
            .sections
            .iter()
            .map(|section| section.element.clone())
            .collect();
        let filters = EventFilterEngine::start(
            &document,
            scanned.index,
            scanned.events,
            section_elements,
            controls,
            &config.selectors,
            &config.timeline,
        )?;

        let unload = teardown_on_pagehide(&window, Rc::downgrade(&tracker), Rc::downgrade(&filters));
        Ok(TimelinePage {
            tracker,
            filters,
            _unload: unload,
        })
    }

    fn teardown_on_pagehide(
        window: &Window,
        tracker: Weak<ScrollProgressTracker>,
        filters: Weak<EventFilterEngine>,
    ) -> EventListener {
        EventListener::new(window, "pagehide", move |_| {
            if let Some(tracker) = tracker.upgrade() {
                tracker.teardown();
            }
            if let Some(filters) = filters.upgrade() {
                filters.teardown();
            }
        })
    }

    fn init_logging(level: &str) {
        let level = Level::from_str(level).unwrap_or(Level::Info);
        // Lần gắn thứ hai trên cùng trang giữ logger cũ.
        let _ = console_log::init_with_level(level);
    }

    fn format_timeline_error(err: TimelineError) -> String {
        format!("Timeline error: {err}")
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm_ui::{mount_timeline_page, TimelinePage};

#[cfg(not(target_arch = "wasm32"))]
pub fn mount_timeline_page(_: wasm_bindgen::JsValue) -> Result<(), wasm_bindgen::JsValue> {
    Err(wasm_bindgen::JsValue::from_str(
        "timeline-ui chỉ hỗ trợ biên dịch target wasm32",
    ))
}
