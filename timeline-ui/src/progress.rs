#![cfg(target_arch = "wasm32")]

//! Thanh tiến độ cuộn và hiệu ứng marker khi section đi vào viewport.

use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use gloo::render::{request_animation_frame, AnimationFrame};
use js_sys::Array;
use log::debug;
use timeline_core::{
    progress_width, scroll_fraction, FrameGate, MarkerPulse, TimelineConfig, ViewportTransition,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, Node, Window,
};

use crate::dom::{SectionNodes, VISIBLE_CLASS};
use crate::timer::CancellableTimer;

const PULSE_TRANSFORM: &str = "scale(1.5)";
const PULSE_SHADOW: &str = "0 0 20px rgba(59, 130, 246, 0.8)";
const REST_TRANSFORM: &str = "scale(1)";
const REST_SHADOW: &str = "none";

type ObserverCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;

struct TrackedSection {
    element: HtmlElement,
    marker: Option<HtmlElement>,
    pulse: MarkerPulse,
    revert: CancellableTimer,
}

pub struct ScrollProgressTracker {
    window: Window,
    document: Document,
    indicator: Option<HtmlElement>,
    pulse_ms: u32,
    gate: RefCell<FrameGate>,
    frame: RefCell<Option<AnimationFrame>>,
    sections: RefCell<Vec<TrackedSection>>,
    observer: RefCell<Option<(IntersectionObserver, ObserverCallback)>>,
    listeners: RefCell<Vec<EventListener>>,
}

impl ScrollProgressTracker {
    pub fn start(
        window: &Window,
        document: &Document,
        indicator: Option<HtmlElement>,
        sections: &[SectionNodes],
        config: &TimelineConfig,
    ) -> Result<Rc<Self>, JsValue> {
        let tracked = sections
            .iter()
            .map(|section| TrackedSection {
                element: section.element.clone(),
                marker: section.marker.clone(),
                pulse: MarkerPulse::default(),
                revert: CancellableTimer::default(),
            })
            .collect();

        let tracker = Rc::new(Self {
            window: window.clone(),
            document: document.clone(),
            indicator,
            pulse_ms: config.pulse_ms,
            gate: RefCell::new(FrameGate::default()),
            frame: RefCell::new(None),
            sections: RefCell::new(tracked),
            observer: RefCell::new(None),
            listeners: RefCell::new(Vec::new()),
        });

        tracker.install_scroll_listener();
        tracker.observe_sections(config)?;
        tracker.update_progress();
        Ok(tracker)
    }

    /// Hủy khung hình và timer đang chờ, trả marker đang nhấp nháy về trạng thái nghỉ,
    /// ngắt observer và gỡ listener. Gọi nhiều lần vẫn an toàn.
    pub fn teardown(&self) {
        self.frame.borrow_mut().take();
        self.gate.borrow_mut().cancel();
        for section in self.sections.borrow_mut().iter_mut() {
            section.revert.cancel();
            if section.pulse.is_animating() {
                if let Some(marker) = &section.marker {
                    set_marker_style(marker, REST_TRANSFORM, REST_SHADOW);
                }
                section.pulse.pulse_finished();
            }
        }
        if let Some((observer, _callback)) = self.observer.borrow_mut().take() {
            observer.disconnect();
        }
        self.listeners.borrow_mut().clear();
    }

    fn install_scroll_listener(self: &Rc<Self>) {
        let tracker = Rc::downgrade(self);
        let listener = EventListener::new(&self.window, "scroll", move |_| {
            if let Some(tracker) = tracker.upgrade() {
                tracker.schedule_update();
            }
        });
        self.listeners.borrow_mut().push(listener);
    }

    fn schedule_update(self: &Rc<Self>) {
        if !self.gate.borrow_mut().request() {
            return;
        }
        let tracker = Rc::downgrade(self);
        let handle = request_animation_frame(move |_| {
            if let Some(tracker) = tracker.upgrade() {
                tracker.gate.borrow_mut().frame();
                tracker.update_progress();
            }
        });
        *self.frame.borrow_mut() = Some(handle);
    }

    fn update_progress(&self) {
        let Some(indicator) = &self.indicator else {
            return;
        };
        let Some(root) = self.document.document_element() else {
            return;
        };
        let scroll_top = self.window.scroll_y().unwrap_or(0.0);
        let fraction = scroll_fraction(
            scroll_top,
            f64::from(root.scroll_height()),
            f64::from(root.client_height()),
        );
        let _ = indicator
            .style()
            .set_property("width", &progress_width(fraction));
    }

    fn observe_sections(self: &Rc<Self>, config: &TimelineConfig) -> Result<(), JsValue> {
        if self.sections.borrow().is_empty() {
            return Ok(());
        }

        let tracker = Rc::downgrade(self);
        let callback: ObserverCallback =
            Closure::new(move |entries: Array, _observer: IntersectionObserver| {
                if let Some(tracker) = tracker.upgrade() {
                    tracker.handle_entries(&entries);
                }
            });

        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(config.visibility_threshold));
        options.set_root_margin(&config.root_margin());
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
        for section in self.sections.borrow().iter() {
            observer.observe(&section.element);
        }

        *self.observer.borrow_mut() = Some((observer, callback));
        Ok(())
    }

    fn handle_entries(self: &Rc<Self>, entries: &Array) {
        for entry in entries.iter() {
            let entry: IntersectionObserverEntry = entry.unchecked_into();
            let target: Node = entry.target().into();
            let transition = {
                let mut sections = self.sections.borrow_mut();
                let Some((idx, section)) = sections
                    .iter_mut()
                    .enumerate()
                    .find(|(_, section)| section.element.is_same_node(Some(&target)))
                else {
                    continue;
                };
                (idx, section.pulse.observe(entry.is_intersecting()))
            };

            if let (idx, ViewportTransition::Entered { pulse }) = transition {
                self.enter_section(idx, pulse);
            }
        }
    }

    fn enter_section(self: &Rc<Self>, idx: usize, pulse: bool) {
        let mut sections = self.sections.borrow_mut();
        let Some(section) = sections.get_mut(idx) else {
            return;
        };
        let _ = section.element.class_list().add_1(VISIBLE_CLASS);
        if !pulse {
            return;
        }
        let Some(marker) = section.marker.clone() else {
            section.pulse.pulse_finished();
            return;
        };

        debug!("Section {idx} vào viewport, kích hoạt marker");
        set_marker_style(&marker, PULSE_TRANSFORM, PULSE_SHADOW);
        let tracker = Rc::downgrade(self);
        section.revert.schedule(self.pulse_ms, move || {
            set_marker_style(&marker, REST_TRANSFORM, REST_SHADOW);
            if let Some(tracker) = tracker.upgrade() {
                if let Some(section) = tracker.sections.borrow_mut().get_mut(idx) {
                    section.pulse.pulse_finished();
                }
            }
        });
    }
}

// Observer không tự ngắt khi closure bị drop.
impl Drop for ScrollProgressTracker {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn set_marker_style(marker: &HtmlElement, transform: &str, shadow: &str) {
    let style = marker.style();
    let _ = style.set_property("transform", transform);
    let _ = style.set_property("box-shadow", shadow);
}

#[cfg(test)]
mod tests {
    use timeline_core::TimelineConfig;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;
    use web_sys::{Document, HtmlElement, Window};

    use super::{ScrollProgressTracker, PULSE_TRANSFORM, REST_TRANSFORM};
    use crate::dom::SectionNodes;

    wasm_bindgen_test_configure!(run_in_browser);

    fn page() -> (Window, Document) {
        let window = web_sys::window().expect("có window");
        let document = window.document().expect("có document");
        (window, document)
    }

    fn html(document: &Document, tag: &str) -> HtmlElement {
        document
            .create_element(tag)
            .expect("tạo được phần tử")
            .dyn_into::<HtmlElement>()
            .expect("phần tử HTML")
    }

    fn transform(marker: &HtmlElement) -> String {
        marker
            .style()
            .get_property_value("transform")
            .unwrap_or_default()
    }

    /// Dựng tracker với một section và kích hoạt nhấp nháy marker của nó.
    fn pulsing_tracker() -> (std::rc::Rc<ScrollProgressTracker>, HtmlElement) {
        let (window, document) = page();
        let marker = html(&document, "div");
        let section = SectionNodes {
            element: html(&document, "section"),
            marker: Some(marker.clone()),
        };
        let tracker = ScrollProgressTracker::start(
            &window,
            &document,
            None,
            &[section],
            &TimelineConfig::default(),
        )
        .expect("khởi động được");

        let entered = tracker.sections.borrow_mut()[0].pulse.observe(true);
        assert!(matches!(
            entered,
            timeline_core::ViewportTransition::Entered { pulse: true }
        ));
        tracker.enter_section(0, true);
        assert_eq!(transform(&marker), PULSE_TRANSFORM);
        (tracker, marker)
    }

    #[wasm_bindgen_test]
    fn teardown_mid_pulse_restores_marker() {
        let (tracker, marker) = pulsing_tracker();
        tracker.teardown();
        assert_eq!(transform(&marker), REST_TRANSFORM);
        assert!(!tracker.sections.borrow()[0].pulse.is_animating());
        assert!(tracker.observer.borrow().is_none());
    }

    #[wasm_bindgen_test]
    fn dropping_tracker_without_teardown_releases_page_state() {
        let (tracker, marker) = pulsing_tracker();
        drop(tracker);
        assert_eq!(transform(&marker), REST_TRANSFORM);
    }
}
