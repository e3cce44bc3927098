use boatcrumbs_core::summary::TrackSummary;
use comfy_table::{presets::UTF8_FULL, Table};

pub fn segments_table(summary: &TrackSummary) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Segment",
        "First fix",
        "Last fix",
        "Fixes",
        "Distance (mi)",
        "Elapsed",
        "Max knots",
    ]);

    for (index, segment) in summary.segments.iter().enumerate() {
        table.add_row(vec![
            index.to_string(),
            segment.start.to_string(),
            segment.end.to_string(),
            segment.fix_count().to_string(),
            format!("{:.2}", segment.distance_miles),
            boatcrumbs_core::stops::format_duration(segment.elapsed_secs),
            format!("{:.1}", segment.max_knots),
        ]);
    }
    table
}

pub fn stops_table(summary: &TrackSummary) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Local time", "Latitude", "Longitude", "Duration"]);

    for stop in &summary.stops {
        table.add_row(vec![
            stop.local_time.clone(),
            format!("{:.5}", stop.latitude),
            format!("{:.5}", stop.longitude),
            stop.duration_display.clone(),
        ]);
    }
    table
}
