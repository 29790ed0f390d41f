#![cfg(target_arch = "wasm32")]

//! Gắn mô hình `TimelineFilter` vào control và thẻ sự kiện trên trang.

use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions};
use log::{debug, warn};
use timeline_core::{
    EventId, PresenceChange, RenderPlan, SectionPatch, Segment, TimelineConfig, TimelineFilter,
    TimelineIndex, ALL_FILTER,
};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, Event, EventTarget, HtmlElement, KeyboardEvent, Node, TransitionEvent,
};

use crate::config::DomSelectors;
use crate::dom::{
    is_within, picker_id, toggle_class, CodedControl, Controls, EventNodes, ACTIVE_CLASS,
    PICKER_SELECTOR, SHOW_CLASS,
};
use crate::timer::CancellableTimer;

/// Thời gian chờ thêm sau `fade_ms` nếu trình duyệt không phát `transitionend`.
const FADE_GRACE_MS: u32 = 50;

pub struct EventFilterEngine {
    document: Document,
    model: RefCell<TimelineFilter>,
    events: Vec<EventNodes>,
    sections: Vec<HtmlElement>,
    controls: Controls,
    filter_controls: String,
    search_controls: String,
    highlight_class: String,
    fade_fallback_ms: u32,
    search_debounce_ms: u32,
    search_timer: RefCell<CancellableTimer>,
    fade_timers: RefCell<Vec<CancellableTimer>>,
    listeners: RefCell<Vec<EventListener>>,
}

impl EventFilterEngine {
    pub fn start(
        document: &Document,
        index: TimelineIndex,
        events: Vec<EventNodes>,
        sections: Vec<HtmlElement>,
        controls: Controls,
        selectors: &DomSelectors,
        config: &TimelineConfig,
    ) -> Result<Rc<Self>, JsValue> {
        let model = TimelineFilter::new(index, config.clone())
            .map_err(|err| JsValue::from_str(&format!("Timeline error: {err}")))?;
        let fade_timers = events.iter().map(|_| CancellableTimer::default()).collect();

        let engine = Rc::new(Self {
            document: document.clone(),
            model: RefCell::new(model),
            events,
            sections,
            controls,
            filter_controls: selectors.filter_controls.clone(),
            search_controls: selectors.search_controls.clone(),
            highlight_class: config.highlight_class.clone(),
            fade_fallback_ms: config.fade_ms + FADE_GRACE_MS,
            search_debounce_ms: config.search_debounce_ms,
            search_timer: RefCell::new(CancellableTimer::default()),
            fade_timers: RefCell::new(fade_timers),
            listeners: RefCell::new(Vec::new()),
        });

        engine.install_listeners();
        engine.sync_controls();
        // Trang tải lên với mọi section đang hiện; lượt đầu ẩn các section rỗng.
        let plan = engine.model.borrow_mut().recompute();
        engine.apply(plan);
        Ok(engine)
    }

    pub fn teardown(&self) {
        self.search_timer.borrow_mut().cancel();
        for timer in self.fade_timers.borrow_mut().iter_mut() {
            timer.cancel();
        }
        self.listeners.borrow_mut().clear();
    }

    fn install_listeners(self: &Rc<Self>) {
        let mut listeners = Vec::new();

        if let Some(input) = &self.controls.search_input {
            listeners.push(self.listen(input, "input", |engine, _| engine.schedule_search()));
            let active = EventListenerOptions::enable_prevent_default();
            listeners.push(self.listen_with(input, "keydown", active, |engine, event| {
                let is_enter = event
                    .dyn_ref::<KeyboardEvent>()
                    .is_some_and(|key| key.key() == "Enter");
                if is_enter {
                    event.prevent_default();
                    engine.flush_search();
                }
            }));
        }
        if let Some(button) = &self.controls.search_button {
            listeners.push(self.listen(button, "click", |engine, _| engine.flush_search()));
        }
        if let Some(button) = &self.controls.clear_button {
            listeners.push(self.listen(button, "click", |engine, _| engine.clear()));
        }

        for (idx, control) in self.controls.filter_buttons.iter().enumerate() {
            listeners.push(self.listen(&control.element, "click", move |engine, _| {
                engine.select_filter(idx);
            }));
        }
        for (idx, control) in self.controls.subcategory_buttons.iter().enumerate() {
            listeners.push(self.listen(&control.element, "click", move |engine, _| {
                engine.select_subcategory(idx);
            }));
        }

        listeners.push(self.listen(&self.document, "click", |engine, event| {
            engine.handle_outside_click(event);
        }));

        for (idx, nodes) in self.events.iter().enumerate() {
            listeners.push(self.listen(&nodes.root, "transitionend", move |engine, event| {
                engine.handle_transition_end(EventId(idx), event);
            }));
        }

        *self.listeners.borrow_mut() = listeners;
    }

    fn listen<F>(
        self: &Rc<Self>,
        target: &EventTarget,
        event_type: &'static str,
        handler: F,
    ) -> EventListener
    where
        F: Fn(&Rc<Self>, &Event) + 'static,
    {
        self.listen_with(target, event_type, EventListenerOptions::default(), handler)
    }

    /// Listener giữ tham chiếu yếu tới engine để không tạo chu trình `Rc`.
    fn listen_with<F>(
        self: &Rc<Self>,
        target: &EventTarget,
        event_type: &'static str,
        options: EventListenerOptions,
        handler: F,
    ) -> EventListener
    where
        F: Fn(&Rc<Self>, &Event) + 'static,
    {
        let engine = Rc::downgrade(self);
        EventListener::new_with_options(target, event_type, options, move |event| {
            if let Some(engine) = engine.upgrade() {
                handler(&engine, event);
            }
        })
    }

    fn schedule_search(self: &Rc<Self>) {
        let engine = Rc::downgrade(self);
        self.search_timer
            .borrow_mut()
            .schedule(self.search_debounce_ms, move || {
                if let Some(engine) = engine.upgrade() {
                    engine.run_search();
                }
            });
    }

    fn flush_search(self: &Rc<Self>) {
        self.search_timer.borrow_mut().cancel();
        self.run_search();
    }

    fn run_search(self: &Rc<Self>) {
        let Some(input) = &self.controls.search_input else {
            return;
        };
        let plan = self.model.borrow_mut().set_search_term(&input.value());
        self.apply(plan);
    }

    fn clear(self: &Rc<Self>) {
        self.search_timer.borrow_mut().cancel();
        if let Some(input) = &self.controls.search_input {
            input.set_value("");
        }
        let plan = self.model.borrow_mut().clear();
        self.sync_controls();
        self.apply(plan);
    }

    fn select_filter(self: &Rc<Self>, control: usize) {
        let Some(control) = self.controls.filter_buttons.get(control) else {
            return;
        };
        let plan = self.model.borrow_mut().select_filter(&control.code);
        self.sync_controls();
        self.apply(plan);
    }

    fn select_subcategory(self: &Rc<Self>, control: usize) {
        let Some(CodedControl { code, owner, .. }) = self.controls.subcategory_buttons.get(control)
        else {
            return;
        };
        let result = {
            let mut model = self.model.borrow_mut();
            if owner
                .as_deref()
                .is_some_and(|owner| owner != model.state().filter.code())
            {
                debug!("Bỏ qua nhóm con {code:?}: không thuộc danh mục đang chọn");
                return;
            }
            model.select_subcategory(code)
        };
        match result {
            Ok(plan) => {
                self.sync_controls();
                self.apply(plan);
            }
            Err(err) => warn!("{err}"),
        }
    }

    fn handle_outside_click(&self, event: &Event) {
        let Some(target) = event
            .target()
            .and_then(|target| target.dyn_into::<Element>().ok())
        else {
            return;
        };
        if is_within(&target, &self.filter_controls)
            || is_within(&target, &self.search_controls)
            || is_within(&target, PICKER_SELECTOR)
        {
            return;
        }
        if self.model.borrow_mut().collapse_pickers() {
            self.sync_controls();
        }
    }

    fn handle_transition_end(&self, event_id: EventId, event: &Event) {
        let Some(nodes) = self.events.get(event_id.0) else {
            return;
        };
        let on_root = event
            .target()
            .and_then(|target| target.dyn_into::<Node>().ok())
            .is_some_and(|target| nodes.root.is_same_node(Some(&target)));
        let is_opacity = event
            .dyn_ref::<TransitionEvent>()
            .map_or(true, |transition| transition.property_name() == "opacity");
        if on_root && is_opacity {
            self.finish_fade(event_id, None);
        }
    }

    /// Đồng bộ class `active` của nút lọc/nhóm con và class `show` của bộ chọn theo trạng thái.
    fn sync_controls(&self) {
        let model = self.model.borrow();
        let state = model.state();
        let active_filter = state.filter.code();
        let active_subcategory = state.subcategory.as_deref().unwrap_or(ALL_FILTER);

        for control in &self.controls.filter_buttons {
            toggle_class(&control.element, ACTIVE_CLASS, control.code == active_filter);
        }
        for control in &self.controls.subcategory_buttons {
            let active = control.owner.as_deref() == Some(active_filter)
                && control.code == active_subcategory;
            toggle_class(&control.element, ACTIVE_CLASS, active);
        }
        for owner in &model.config().subcategory_categories {
            if let Some(picker) = self.document.get_element_by_id(&picker_id(owner)) {
                let open = state.open_picker.as_deref() == Some(owner.as_str());
                toggle_class(&picker, SHOW_CLASS, open);
            }
        }
    }

    fn apply(self: &Rc<Self>, plan: RenderPlan) {
        for patch in plan.events {
            let Some(nodes) = self.events.get(patch.event.0) else {
                continue;
            };
            match patch.presence {
                Some(PresenceChange::Reveal) => {
                    if let Some(timer) = self.fade_timers.borrow_mut().get_mut(patch.event.0) {
                        timer.cancel();
                    }
                    let style = nodes.root.style();
                    let _ = style.remove_property("display");
                    let _ = style.set_property("opacity", "1");
                }
                Some(PresenceChange::BeginFade { epoch }) => {
                    let _ = nodes.root.style().set_property("opacity", "0");
                    self.schedule_fade_fallback(patch.event, epoch);
                }
                None => {}
            }
            if let Some(highlight) = patch.highlight {
                if let Some(title) = &nodes.title {
                    self.render_segments(title, &highlight.title);
                }
                if let Some(description) = &nodes.description {
                    self.render_segments(description, &highlight.description);
                }
            }
        }
        for patch in plan.sections {
            self.apply_section(patch);
        }
    }

    fn schedule_fade_fallback(self: &Rc<Self>, event_id: EventId, epoch: u32) {
        let engine = Rc::downgrade(self);
        if let Some(timer) = self.fade_timers.borrow_mut().get_mut(event_id.0) {
            timer.schedule(self.fade_fallback_ms, move || {
                if let Some(engine) = engine.upgrade() {
                    engine.finish_fade(event_id, Some(epoch));
                }
            });
        }
    }

    fn finish_fade(&self, event_id: EventId, epoch: Option<u32>) {
        let outcome = self.model.borrow_mut().fade_finished(event_id, epoch);
        let Some(outcome) = outcome else {
            return;
        };
        if let Some(nodes) = self.events.get(event_id.0) {
            let _ = nodes.root.style().set_property("display", "none");
        }
        if let Some(section) = outcome.section {
            self.apply_section(section);
        }
    }

    fn apply_section(&self, patch: SectionPatch) {
        let Some(section) = self.sections.get(patch.section.0) else {
            return;
        };
        let style = section.style();
        let _ = if patch.visible {
            style.remove_property("display").map(|_| ())
        } else {
            style.set_property("display", "none")
        };
    }

    /// Dựng lại nội dung từ các đoạn; văn bản cũ và thẻ tô sáng cũ bị thay hoàn toàn.
    fn render_segments(&self, target: &Element, segments: &[Segment]) {
        target.set_text_content(None);
        for segment in segments {
            let node: Node = if segment.highlighted {
                let Ok(span) = self.document.create_element("span") else {
                    continue;
                };
                span.set_class_name(&self.highlight_class);
                span.set_text_content(Some(&segment.text));
                span.into()
            } else {
                self.document.create_text_node(&segment.text).into()
            };
            let _ = target.append_child(&node);
        }
    }
}
