//! Tính tiến độ cuộn, gộp thông báo cuộn theo khung hình và chặn hiệu ứng marker chồng nhau.

/// Phần trăm trang đã cuộn, luôn nằm trong `[0, 100]`.
///
/// Nội dung ngắn hơn viewport (mẫu số `<= 0`) hoặc đầu vào không hữu hạn cho `0.0`.
pub fn scroll_fraction(scroll_top: f64, document_height: f64, viewport_height: f64) -> f64 {
    let scrollable = document_height - viewport_height;
    if !scrollable.is_finite() || !scroll_top.is_finite() || scrollable <= 0.0 {
        return 0.0;
    }
    (100.0 * scroll_top / scrollable).clamp(0.0, 100.0)
}

/// Giá trị CSS `width` cho thanh tiến độ.
pub fn progress_width(fraction: f64) -> String {
    format!("{fraction:.2}%")
}

/// Cờ "đã hẹn khung hình": gộp nhiều lần cuộn thành tối đa một lần tính mỗi khung.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameGate {
    pending: bool,
}

impl FrameGate {
    /// `true` nếu người gọi phải xin một khung hình mới.
    pub fn request(&mut self) -> bool {
        !std::mem::replace(&mut self.pending, true)
    }

    /// Gọi ở đầu callback khung hình.
    pub fn frame(&mut self) {
        self.pending = false;
    }

    pub fn cancel(&mut self) {
        self.pending = false;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportTransition {
    Unchanged,
    /// Section vừa vào viewport; `pulse = false` khi marker còn đang chạy hiệu ứng.
    Entered { pulse: bool },
    Left,
}

/// Trạng thái marker của một section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkerPulse {
    in_view: bool,
    animating: bool,
}

impl MarkerPulse {
    pub fn observe(&mut self, intersecting: bool) -> ViewportTransition {
        match (self.in_view, intersecting) {
            (false, true) => {
                self.in_view = true;
                let pulse = !self.animating;
                self.animating = true;
                ViewportTransition::Entered { pulse }
            }
            (true, false) => {
                self.in_view = false;
                ViewportTransition::Left
            }
            _ => ViewportTransition::Unchanged,
        }
    }

    pub fn pulse_finished(&mut self) {
        self.animating = false;
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn in_view(&self) -> bool {
        self.in_view
    }
}
