use std::fmt::Write;

use activity_lib::weather::WeatherObservation;
use chrono::{DateTime, Utc};

use crate::{
    columns::Column,
    enrich::EnrichedSession,
    metrics::{format_pace, PLACEHOLDER},
    view_state::{SessionDetail, ViewState},
};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

fn or_placeholder<T>(value: Option<T>, render: impl FnOnce(T) -> String) -> String {
    value.map(render).unwrap_or_else(|| PLACEHOLDER.to_string())
}

fn format_time(time: DateTime<Utc>) -> String {
    time.format(TIME_FORMAT).to_string()
}

fn format_percent(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

fn format_temperature(observation: Option<&WeatherObservation>) -> String {
    or_placeholder(observation.and_then(|o| o.temperature_c), |t| format!("{t:.1}°C"))
}

/// The text shown in `column` for `row`.
pub fn cell(state: &ViewState, row: &EnrichedSession, column: Column) -> String {
    let session = &row.session;
    match column {
        Column::Id => session.id.to_string(),
        Column::Start => format_time(session.start_time),
        Column::End => format_time(session.end_time),
        Column::Duration => format!("{:.0}", row.duration_min),
        Column::Pace => format_pace(row.pace),
        Column::Sport => or_placeholder(session.sport.clone(), |s| s),
        Column::Distance => or_placeholder(session.distance_km, |d| format!("{d:.2}")),
        Column::Calories => or_placeholder(session.calories, |c| format!("{c:.0}")),
        Column::AvgHr => or_placeholder(session.avg_hr, |hr| format!("{hr:.0}")),
        Column::Steps => or_placeholder(session.steps, |s| s.to_string()),
        Column::Spo2 => format_percent(row.blood_oxygen),
        Column::Vo2max => row.vo2max.to_string(),
        Column::Coach => row.coach.clone(),
        Column::Training => row.training_type.clone(),
        Column::Weather => format_temperature(state.nearest_weather(row)),
    }
}

/// Renders the visible rows with the visible columns as aligned text.
pub fn render_table(state: &ViewState) -> String {
    if state.is_loading() {
        return "Loading sessions...\n".to_string();
    }
    if let Some(error) = state.error() {
        return format!("Error: {error}\n");
    }

    let columns = state.visibility().columns();
    let rows = state.visible_rows();
    if rows.is_empty() {
        return "No sessions in the selected range.\n".to_string();
    }
    if columns.is_empty() {
        return format!("{} sessions, no columns selected.\n", rows.len());
    }

    let selected = state.selected().map(|row| row.id());

    let header: Vec<String> = columns.iter().map(|c| c.label().to_string()).collect();
    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|row| columns.iter().map(|c| cell(state, row, *c)).collect())
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for line in &body {
        for (width, text) in widths.iter_mut().zip(line) {
            *width = (*width).max(text.chars().count());
        }
    }

    let mut out = String::new();
    let mut push_line = |marker: &str, cells: &[String]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(text, &width)| format!("{text:<width$}"))
            .collect();
        let _ = writeln!(out, "{marker} {}", padded.join(" | ").trim_end());
    };

    push_line(" ", &header);
    for (row, line) in rows.iter().zip(&body) {
        let marker = if Some(row.id()) == selected { ">" } else { " " };
        push_line(marker, line);
    }

    out
}

/// Multi-line summary of the selected session and its nearest observation.
pub fn render_detail(detail: &SessionDetail) -> String {
    let row = detail.row;
    let session = &row.session;

    let mut out = String::new();
    let _ = writeln!(out, "Session {} ({})", session.id, session.sport.as_deref().unwrap_or(PLACEHOLDER));
    let _ = writeln!(out, "  Start:    {}", format_time(session.start_time));
    let _ = writeln!(out, "  Duration: {:.0} min", row.duration_min);
    let _ = writeln!(out, "  Pace:     {}", format_pace(row.pace));
    let _ = writeln!(out, "  Coach:    {} / {}", row.coach, row.training_type);

    match detail.weather {
        Some(weather) => {
            let _ = writeln!(out, "  Weather at {}:", format_time(weather.timestamp));
            let _ = writeln!(out, "    Temperature:   {}", format_temperature(Some(weather)));
            let _ = writeln!(out, "    Humidity:      {}", or_placeholder(weather.humidity_pct, |h| format!("{h:.0}%")));
            let _ = writeln!(out, "    Wind:          {}", or_placeholder(weather.wind_speed_ms, |w| format!("{w:.1} m/s")));
            let _ = writeln!(out, "    Precipitation: {}", or_placeholder(weather.precipitation_mm, |p| format!("{p:.1} mm")));
        }
        None => {
            let _ = writeln!(out, "  Weather: {PLACEHOLDER}");
        }
    }

    out
}
