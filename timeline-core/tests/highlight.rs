use timeline_core::{Highlighter, Segment};

fn marked(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|segment| {
            if segment.highlighted {
                format!("[{}]", segment.text)
            } else {
                segment.text.clone()
            }
        })
        .collect()
}

#[test]
fn highlights_every_match_case_insensitively() {
    let highlighter = Highlighter::new("seed").expect("mẫu hợp lệ");
    let segments = highlighter.segments("Seed money for a seed round: SEED");
    assert_eq!(marked(&segments), "[Seed] money for a [seed] round: [SEED]");
}

#[test]
fn special_characters_are_matched_literally() {
    let highlighter = Highlighter::new("c++ (beta").expect("mẫu được escape");
    let segments = highlighter.segments("Tooling for C++ (Beta) users");
    assert_eq!(marked(&segments), "Tooling for [C++ (Beta]) users");

    let dot = Highlighter::new(".").expect("mẫu được escape");
    assert_eq!(marked(&dot.segments("v1.0")), "v1[.]0");
}

#[test]
fn unmatched_text_is_a_single_plain_segment() {
    let highlighter = Highlighter::new("2021").expect("mẫu hợp lệ");
    let segments = highlighter.segments("Bitcoin whitepaper");
    assert_eq!(
        segments,
        vec![Segment {
            text: "Bitcoin whitepaper".to_string(),
            highlighted: false
        }]
    );
}

#[test]
fn empty_term_is_inactive() {
    let highlighter = Highlighter::new("   ").expect("từ khóa rỗng");
    assert!(!highlighter.is_active());
    assert_eq!(marked(&highlighter.segments("Seed round")), "Seed round");
    assert!(highlighter.segments("").is_empty());
}

#[test]
fn segments_concatenate_to_input() {
    let highlighter = Highlighter::new("é").expect("mẫu hợp lệ");
    let text = "Café résumé — Élan";
    let joined: String = highlighter
        .segments(text)
        .iter()
        .map(|segment| segment.text.as_str())
        .collect();
    assert_eq!(joined, text);
}
