use ddi_core::{HistoryEntry, PredictionReport, RankedClass};
use ratatui::text::{Line, Span, Text};

use super::text::{fit_width, pad_right};
use super::theme::{Theme, ValueStyle};

const BAR_FILL: char = '█';
const BAR_EMPTY: char = '░';
const NAME_COLUMN: usize = 16;
const BAR_WIDTH: usize = 20;

/// Gauge of `width` cells for a probability in `[0, 1]`.
pub(super) fn probability_bar(score: f64, width: usize) -> String {
    let ratio = if score.is_finite() {
        score.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = ((ratio * width as f64).round() as usize).min(width);
    let mut bar = String::with_capacity(width * 3);
    bar.extend(std::iter::repeat(BAR_FILL).take(filled));
    bar.extend(std::iter::repeat(BAR_EMPTY).take(width - filled));
    bar
}

pub(super) fn history_summary(entry: &HistoryEntry) -> String {
    format!(
        "{} + {}  {} / {}",
        entry.drug1(),
        entry.drug2(),
        entry.interaction_label(),
        entry.severity_label()
    )
}

/// `HH:MM:SS` out of an RFC 3339 timestamp; anything else is shown as is.
pub(super) fn clock_time(timestamp: &str) -> &str {
    timestamp
        .split_once('T')
        .map(|(_, rest)| rest.trim_end_matches('Z'))
        .and_then(|rest| rest.get(..8))
        .unwrap_or(timestamp)
}

pub(super) fn format_report(theme: &Theme, report: &PredictionReport) -> Text<'static> {
    let mut lines = vec![
        Line::from(vec![
            Span::styled(report.pair(), theme.value_style(ValueStyle::Important)),
            Span::styled(
                format!("  {}", clock_time(&report.queried_at)),
                theme.value_style(ValueStyle::Dim),
            ),
        ]),
        Line::default(),
        Line::from(vec![
            Span::styled("Interaction: ", theme.key_style()),
            Span::styled(
                report.response.interaction.label.clone(),
                theme.value_style(ValueStyle::Normal),
            ),
        ]),
    ];
    lines.extend(ranked_lines(theme, &report.interaction_top));
    lines.push(Line::default());
    lines.push(Line::from(vec![
        Span::styled("Severity: ", theme.key_style()),
        Span::styled(
            report.response.severity.label.clone(),
            theme.value_style(ValueStyle::Normal),
        ),
        Span::raw("  "),
        Span::styled(
            format!(" {} ", report.tier.as_str().to_uppercase()),
            theme.tier_style(report.tier),
        ),
    ]));
    lines.extend(ranked_lines(theme, &report.severity_top));
    Text::from(lines)
}

fn ranked_lines(theme: &Theme, rows: &[RankedClass]) -> Vec<Line<'static>> {
    if rows.is_empty() {
        return vec![Line::styled(
            "  (no classes)",
            theme.value_style(ValueStyle::Dim),
        )];
    }
    rows.iter()
        .map(|row| {
            Line::from(vec![
                Span::styled(
                    format!("  {}", fit_width(&row.name, NAME_COLUMN)),
                    theme.value_style(ValueStyle::Normal),
                ),
                Span::styled(
                    pad_right(&format!(" {:>6} ", row.percent()), 9),
                    theme.value_style(ValueStyle::Important),
                ),
                Span::styled(probability_bar(row.score, BAR_WIDTH), theme.accent_style()),
            ])
        })
        .collect()
}
