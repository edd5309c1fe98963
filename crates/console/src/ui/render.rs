use ddi_core::SessionState;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Clear, List, ListItem, Paragraph, Wrap};

use super::app::{AppState, Focus};
use super::format::{clock_time, format_report, history_summary};
use super::text::{display_width, pad_right, truncate_with_ellipsis};
use super::theme::{Theme, ValueStyle};

const IDLE_HINT: &str = "Enter two drug names and press Enter to analyze.";

pub(crate) fn draw_ui(frame: &mut ratatui::Frame, app: &mut AppState) {
    let theme = Theme::dark();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let inputs = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[0]);
    draw_input(frame, &theme, app, Focus::Drug1, "Drug 1", inputs[0]);
    draw_input(frame, &theme, app, Focus::Drug2, "Drug 2", inputs[1]);
    draw_input(frame, &theme, app, Focus::Endpoint, "Endpoint", chunks[1]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[2]);
    draw_history(frame, &theme, app, body[0]);
    draw_result(frame, &theme, app, body[1]);
    draw_footer(frame, &theme, app, chunks[3]);
}

fn draw_input(
    frame: &mut ratatui::Frame,
    theme: &Theme,
    app: &AppState,
    field: Focus,
    title: &str,
    area: Rect,
) {
    let value = match field {
        Focus::Drug1 => app.drug1.as_str(),
        Focus::Drug2 => app.drug2.as_str(),
        Focus::Endpoint => app.endpoint.as_str(),
        Focus::History => return,
    };
    let focused = app.focus == field;
    let block = theme.block(title, focused);
    let inner = block.inner(area);
    let widget = Paragraph::new(value)
        .block(block)
        .style(theme.value_style(ValueStyle::Normal));
    frame.render_widget(widget, area);
    if focused {
        let offset = (display_width(value) as u16).min(inner.width.saturating_sub(1));
        frame.set_cursor_position((inner.x + offset, inner.y));
    }
}

fn draw_history(frame: &mut ratatui::Frame, theme: &Theme, app: &mut AppState, area: Rect) {
    let focused = app.focus == Focus::History;
    let title = format!(
        "History ({}/{})",
        app.session.history().len(),
        app.session.history().capacity()
    );
    let block = theme.block(&title, focused);
    let available_width = block.inner(area).width.saturating_sub(3) as usize;

    let items = if app.session.history().is_empty() {
        vec![ListItem::new(Line::styled(
            "No queries yet",
            theme.value_style(ValueStyle::Dim),
        ))]
    } else {
        app.session
            .history()
            .iter()
            .map(|entry| {
                let time = clock_time(entry.timestamp()).to_string();
                let time_width = display_width(&time);
                if available_width <= time_width {
                    return ListItem::new(Line::styled(time, theme.value_style(ValueStyle::Dim)));
                }
                let max_summary = available_width.saturating_sub(time_width + 2);
                let summary = truncate_with_ellipsis(&history_summary(entry), max_summary);
                let padded = pad_right(&summary, available_width.saturating_sub(time_width));
                ListItem::new(Line::from(vec![
                    Span::styled(padded, theme.value_style(ValueStyle::Normal)),
                    Span::styled(time, theme.value_style(ValueStyle::Dim)),
                ]))
            })
            .collect::<Vec<_>>()
    };
    let list = List::new(items)
        .block(block)
        .style(theme.value_style(ValueStyle::Normal))
        .highlight_style(if focused {
            theme.highlight_style()
        } else {
            theme.value_style(ValueStyle::Dim)
        })
        .highlight_symbol(if focused { ">> " } else { "   " });
    frame.render_stateful_widget(list, area, &mut app.history_list_state);
}

fn draw_result(frame: &mut ratatui::Frame, theme: &Theme, app: &AppState, area: Rect) {
    let content = match app.session.state() {
        SessionState::Idle => Text::styled(IDLE_HINT, theme.help_style()),
        SessionState::Submitting(pending) => Text::styled(
            format!("Analyzing {} + {}...", pending.drug1, pending.drug2),
            theme.warn_style(),
        ),
        SessionState::Success(report) => format_report(theme, report),
        SessionState::Error(message) => {
            Text::styled(format!("Error: {message}"), theme.error_style())
        }
    };
    let widget = Paragraph::new(content)
        .block(theme.block("Result", false))
        .wrap(Wrap { trim: false });
    frame.render_widget(Clear, area);
    frame.render_widget(widget, area);
}

fn draw_footer(frame: &mut ratatui::Frame, theme: &Theme, app: &AppState, area: Rect) {
    let mut spans = vec![Span::styled(
        "Enter=analyze  Tab=focus  ↑/↓=select  Ctrl+L=clear  Ctrl+S=export  Esc=quit  ",
        theme.help_style(),
    )];
    if app.session.is_busy() {
        spans.push(Span::styled("Analyzing...  ", theme.warn_style()));
    } else if let Some(notice) = &app.notice {
        spans.push(Span::styled(format!("{notice}  "), theme.accent_style()));
    }
    if app.confirm_quit {
        spans.push(Span::styled(
            "Press Esc again to quit, any other key to stay",
            theme.warn_style(),
        ));
    }
    let footer = Paragraph::new(Line::from(spans)).block(theme.block("Controls", false));
    frame.render_widget(footer, area);
}
