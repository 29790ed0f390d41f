use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::debug;
use timeline_core::{
    Highlighter, SectionFields, Segment, TimelineConfig, TimelineFilter, TimelineIndex,
};

#[derive(Parser, Debug)]
#[command(
    name = "timeline-cli",
    about = "Lọc và tìm kiếm sự kiện của một timeline JSON."
)]
struct Args {
    /// Đường dẫn tới file JSON (mảng các section).
    #[arg(short, long)]
    input: PathBuf,
    /// Mã danh mục chính (`all` để bỏ lọc).
    #[arg(short, long, default_value = "all")]
    filter: String,
    /// Mã nhóm con, chỉ dùng với danh mục có nhóm con.
    #[arg(long)]
    subcategory: Option<String>,
    /// Từ khóa tìm kiếm.
    #[arg(short, long, default_value = "")]
    search: String,
    /// In kết quả dạng JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let _logger = flexi_logger::Logger::try_with_env_or_str("warn")?.start()?;

    let args = Args::parse();
    let data = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Không đọc được file {:?}", args.input))?;
    let sections: Vec<SectionFields> = serde_json::from_str(&data)
        .with_context(|| format!("File {:?} không phải timeline hợp lệ", args.input))?;

    let mut timeline = TimelineFilter::new(
        TimelineIndex::from_sections(sections),
        TimelineConfig::default(),
    )?;
    timeline.select_filter(&args.filter);
    if let Some(code) = &args.subcategory {
        timeline.select_subcategory(code)?;
    }
    timeline.set_search_term(&args.search);
    debug!("Trạng thái lọc: {:?}", timeline.state());

    let evaluation = timeline.evaluation();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&evaluation)?);
        return Ok(());
    }

    let highlighter = Highlighter::new(&timeline.state().search_term)?;
    let index = timeline.index();
    for section_id in &evaluation.visible_sections {
        let Some(section) = index.section(*section_id) else {
            continue;
        };
        println!("== {}", section.label.as_deref().unwrap_or("(không tên)"));
        for event_id in section
            .events
            .iter()
            .filter(|event| evaluation.visible_events.contains(event))
        {
            let Some(record) = index.event(*event_id) else {
                continue;
            };
            println!(
                "  [{}] {} ({})",
                record.year(),
                marked(&highlighter.segments(record.title())),
                record.category()
            );
            if !record.description().is_empty() {
                println!("      {}", marked(&highlighter.segments(record.description())));
            }
        }
    }

    println!(
        "Hiển thị {}/{} sự kiện trong {} section",
        evaluation.visible_events.len(),
        index.len(),
        evaluation.visible_sections.len()
    );

    Ok(())
}

fn marked(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|segment| {
            if segment.highlighted {
                format!("«{}»", segment.text)
            } else {
                segment.text.clone()
            }
        })
        .collect()
}
