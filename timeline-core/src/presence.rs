//! Máy trạng thái hiển thị của từng thẻ sự kiện: `Shown → Fading → Hidden`.
//!
//! Việc chuyển sang `Hidden` do thông báo kết thúc hiệu ứng điều khiển, không
//! dựa vào một timeout đoán trước. Mỗi lần bắt đầu mờ dần sẽ tăng `epoch`; thông
//! báo mang epoch cũ bị bỏ qua.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    #[default]
    Shown,
    Fading {
        epoch: u32,
    },
    Hidden,
}

/// Việc lớp DOM cần làm sau một lần chuyển trạng thái.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeStep {
    Unchanged,
    /// Hiện lại và đặt độ mờ về 1.
    Reveal,
    /// Đặt độ mờ về 0 và chờ hiệu ứng kết thúc.
    BeginFade { epoch: u32 },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FadeMachine {
    presence: Presence,
    epoch: u32,
}

impl FadeMachine {
    pub fn presence(&self) -> Presence {
        self.presence
    }

    /// Thẻ còn chiếm chỗ trong bố cục (đang hiện hoặc đang mờ dần).
    pub fn occupies_layout(&self) -> bool {
        self.presence != Presence::Hidden
    }

    pub fn show(&mut self) -> FadeStep {
        match self.presence {
            Presence::Shown => FadeStep::Unchanged,
            Presence::Fading { .. } | Presence::Hidden => {
                self.presence = Presence::Shown;
                FadeStep::Reveal
            }
        }
    }

    pub fn fade(&mut self) -> FadeStep {
        match self.presence {
            Presence::Shown => {
                self.epoch = self.epoch.wrapping_add(1);
                self.presence = Presence::Fading { epoch: self.epoch };
                FadeStep::BeginFade { epoch: self.epoch }
            }
            Presence::Fading { .. } | Presence::Hidden => FadeStep::Unchanged,
        }
    }

    /// Kết thúc mờ dần. `epoch = None` nghĩa là sự kiện `transitionend` của
    /// trình duyệt, luôn áp dụng cho lần mờ dần hiện tại.
    ///
    /// Trả về `true` nếu thẻ vừa chuyển sang `Hidden`.
    pub fn complete(&mut self, epoch: Option<u32>) -> bool {
        match (self.presence, epoch) {
            (Presence::Fading { epoch: current }, Some(seen)) if current != seen => false,
            (Presence::Fading { .. }, _) => {
                self.presence = Presence::Hidden;
                true
            }
            _ => false,
        }
    }
}

/// Section hiển thị khi còn ít nhất một sự kiện con chưa ẩn hẳn.
pub fn section_visible<'a>(children: impl IntoIterator<Item = &'a FadeMachine>) -> bool {
    children.into_iter().any(FadeMachine::occupies_layout)
}
