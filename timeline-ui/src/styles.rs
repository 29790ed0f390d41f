#![cfg(target_arch = "wasm32")]

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Node};

use crate::config::PageConfig;
use crate::dom::{PICKER_SELECTOR, SHOW_CLASS};

const STYLE_TAG_SELECTOR: &str = "style[data-timeline-ui]";

/// CSS tối thiểu để hiệu ứng mờ dần phát `transitionend` và bộ chọn nhóm con ẩn/hiện.
///
/// Trang có thể ghi đè bằng các biến `--timeline-*`.
pub fn default_styles(config: &PageConfig) -> String {
    let selectors = &config.selectors;
    let timeline = &config.timeline;
    format!(
        r#"
:root {{
  --timeline-highlight-bg: #fde68a;
  --timeline-highlight-text: inherit;
  --timeline-progress-easing: linear;
}}

{event} {{
  transition: opacity {fade}ms ease;
}}

.{highlight} {{
  background: var(--timeline-highlight-bg);
  color: var(--timeline-highlight-text);
  border-radius: 3px;
  padding: 0 2px;
}}

{picker} {{
  display: none;
}}

{picker}.{show} {{
  display: flex;
}}

{marker} {{
  transition: transform {pulse}ms ease, box-shadow {pulse}ms ease;
}}

{progress} {{
  transition: width 80ms var(--timeline-progress-easing);
}}
"#,
        event = selectors.event,
        fade = timeline.fade_ms,
        highlight = timeline.highlight_class,
        picker = PICKER_SELECTOR,
        show = SHOW_CLASS,
        marker = selectors.marker,
        pulse = timeline.pulse_ms,
        progress = selectors.progress_bar,
    )
}

pub fn ensure_styles(document: &Document, config: &PageConfig) -> Result<(), JsValue> {
    if document.query_selector(STYLE_TAG_SELECTOR)?.is_some() {
        return Ok(());
    }

    let head = document
        .head()
        .ok_or_else(|| JsValue::from_str("Document không có thẻ <head>"))?;

    let style_el = document.create_element("style")?;
    style_el.set_attribute("data-timeline-ui", "v1")?;
    style_el.set_text_content(Some(&default_styles(config)));
    head.append_child(&style_el.clone().dyn_into::<Node>()?)?;

    Ok(())
}
