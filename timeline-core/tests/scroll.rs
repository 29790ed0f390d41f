use timeline_core::{progress_width, scroll_fraction, FrameGate, MarkerPulse, ViewportTransition};

#[test]
fn top_and_bottom_are_exact() {
    assert_eq!(scroll_fraction(0.0, 3000.0, 800.0), 0.0);
    assert_eq!(scroll_fraction(2200.0, 3000.0, 800.0), 100.0);
    assert_eq!(progress_width(scroll_fraction(2200.0, 3000.0, 800.0)), "100.00%");
    assert_eq!(progress_width(0.0), "0.00%");
}

#[test]
fn midpoint_and_overscroll_are_clamped() {
    assert_eq!(scroll_fraction(1100.0, 3000.0, 800.0), 50.0);
    assert_eq!(scroll_fraction(2500.0, 3000.0, 800.0), 100.0);
    assert_eq!(scroll_fraction(-40.0, 3000.0, 800.0), 0.0);
}

#[test]
fn short_content_never_produces_nan() {
    for (top, doc, viewport) in [
        (0.0, 600.0, 800.0),
        (0.0, 800.0, 800.0),
        (10.0, 800.0, 800.0),
        (f64::NAN, 3000.0, 800.0),
    ] {
        let fraction = scroll_fraction(top, doc, viewport);
        assert!(fraction.is_finite());
        assert_eq!(fraction, 0.0);
    }
}

#[test]
fn frame_gate_coalesces_until_frame() {
    let mut gate = FrameGate::default();
    assert!(gate.request());
    assert!(!gate.request());
    assert!(!gate.request());
    assert!(gate.is_pending());

    gate.frame();
    assert!(gate.request());

    gate.cancel();
    assert!(!gate.is_pending());
}

#[test]
fn marker_pulses_once_per_entry() {
    let mut marker = MarkerPulse::default();
    assert_eq!(marker.observe(true), ViewportTransition::Entered { pulse: true });
    assert_eq!(marker.observe(true), ViewportTransition::Unchanged);
    assert!(marker.is_animating());

    marker.pulse_finished();
    assert_eq!(marker.observe(false), ViewportTransition::Left);
    assert_eq!(marker.observe(false), ViewportTransition::Unchanged);
    assert_eq!(marker.observe(true), ViewportTransition::Entered { pulse: true });
}

#[test]
fn reentry_during_pulse_does_not_overlap() {
    let mut marker = MarkerPulse::default();
    assert_eq!(marker.observe(true), ViewportTransition::Entered { pulse: true });
    assert_eq!(marker.observe(false), ViewportTransition::Left);
    assert_eq!(marker.observe(true), ViewportTransition::Entered { pulse: false });
    assert!(marker.in_view());

    marker.pulse_finished();
    assert!(!marker.is_animating());
}
