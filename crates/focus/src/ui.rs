//! UI rendering

use odak_core::format;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Gauge, Paragraph, Wrap},
    Frame,
};

use focus::{Category, Timer, TimerPhase};

use crate::app::{App, Notice, View};
use crate::theme::{category_color, Palette};

/// Main draw function
pub fn draw(f: &mut Frame, app: &App, timer: &Timer) {
    let palette = Palette::for_mode(app.theme);

    f.render_widget(
        Block::default().style(Style::default().bg(palette.background).fg(palette.text)),
        f.area(),
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Footer
        ])
        .split(f.area());

    draw_header(f, app, &palette, chunks[0]);
    match app.view {
        View::Timer => draw_timer(f, app, timer, &palette, chunks[1]),
        View::Reports => draw_reports(f, app, &palette, chunks[1]),
    }
    draw_footer(f, app, &palette, chunks[2]);

    if let Some(summary) = timer.summary() {
        draw_summary_overlay(f, summary, &palette);
    } else if app.confirm_clear {
        draw_confirm_overlay(f, &palette);
    } else if app.show_help {
        draw_help_overlay(f, &palette);
    }
}

fn draw_header(f: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let tab = |label: &'static str, view: View| {
        if app.view == view {
            Span::styled(
                format!(" {} ", label),
                Style::default().fg(palette.card).bg(palette.primary).bold(),
            )
        } else {
            Span::styled(format!(" {} ", label), Style::default().fg(palette.muted))
        }
    };

    let header = Paragraph::new(Line::from(vec![
        Span::styled(" Focus ", Style::default().fg(palette.primary).bold()),
        Span::raw(" "),
        tab("Timer", View::Timer),
        Span::raw(" "),
        tab("Reports", View::Reports),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.primary)),
    );

    f.render_widget(header, area);
}

fn draw_timer(f: &mut Frame, app: &App, timer: &Timer, palette: &Palette, area: Rect) {
    let snapshot = timer.snapshot();
    let accent = category_color(snapshot.selected_category);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Category
            Constraint::Length(3), // Durations
            Constraint::Length(5), // Clock
            Constraint::Length(3), // Progress
            Constraint::Length(3), // Distractions
            Constraint::Length(2), // Notice
            Constraint::Min(0),
        ])
        .split(area);

    let category = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" {} ", snapshot.selected_category),
            Style::default().fg(palette.text).bg(accent).bold(),
        ),
        Span::styled(
            if snapshot.is_running { "" } else { "   c/← → change" },
            Style::default().fg(palette.muted),
        ),
    ]))
    .alignment(Alignment::Center)
    .block(card(" Category ", palette));
    f.render_widget(category, rows[0]);

    let current_minutes = snapshot.total_seconds / 60;
    let mut durations: Vec<Span> = Vec::new();
    for (i, minutes) in app.presets.iter().enumerate() {
        let style = if *minutes == current_minutes && snapshot.total_seconds % 60 == 0 {
            Style::default().fg(palette.card).bg(palette.primary).bold()
        } else {
            Style::default().fg(palette.muted)
        };
        durations.push(Span::styled(format!(" {}:{}min ", i + 1, minutes), style));
        durations.push(Span::raw(" "));
    }
    let durations = Paragraph::new(Line::from(durations))
        .alignment(Alignment::Center)
        .block(card(" Duration ", palette));
    f.render_widget(durations, rows[1]);

    let phase_color = match snapshot.phase {
        TimerPhase::Running => palette.success,
        TimerPhase::Paused => palette.warning,
        TimerPhase::Completed => palette.primary,
        TimerPhase::Idle => palette.muted,
    };
    let clock = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format::clock(snapshot.remaining_seconds),
            Style::default().fg(palette.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            snapshot.phase.as_str().to_uppercase(),
            Style::default().fg(phase_color),
        )),
    ])
    .alignment(Alignment::Center)
    .block(card("", palette));
    f.render_widget(clock, rows[2]);

    let progress = Gauge::default()
        .block(card(" Progress ", palette))
        .gauge_style(Style::default().fg(accent).bg(palette.card))
        .ratio(snapshot.progress_fraction.clamp(0.0, 1.0))
        .label(format!("{:.0}%", snapshot.progress_fraction * 100.0));
    f.render_widget(progress, rows[3]);

    let distractions = Paragraph::new(Line::from(vec![
        Span::styled("Distractions: ", Style::default().fg(palette.muted)),
        Span::styled(
            snapshot.distraction_count.to_string(),
            Style::default().fg(palette.danger).bold(),
        ),
    ]))
    .alignment(Alignment::Center)
    .block(card("", palette));
    f.render_widget(distractions, rows[4]);

    if let Some(notice) = &app.notice {
        f.render_widget(notice_line(notice, palette), rows[5]);
    }
}

fn draw_reports(f: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let report = &app.report;

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),  // Stat cards
            Constraint::Min(10),    // Weekly chart
            Constraint::Length((report.category_breakdown.len() as u16).max(1) + 2),
            Constraint::Length(1),  // Notice
        ])
        .split(area);

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(rows[0]);

    let stat = |title: &'static str, value: String| {
        Paragraph::new(Line::from(Span::styled(
            value,
            Style::default().fg(palette.primary).bold(),
        )))
        .alignment(Alignment::Center)
        .block(card(title, palette))
    };
    f.render_widget(
        stat(" Today ", format::human(report.today_total_seconds)),
        cards[0],
    );
    f.render_widget(
        stat(" All time ", format::human(report.all_time_total_seconds)),
        cards[1],
    );
    f.render_widget(
        stat(" Distractions ", report.total_distractions.to_string()),
        cards[2],
    );

    let bars: Vec<Bar> = report
        .weekly_series
        .iter()
        .map(|day| {
            Bar::default()
                .value(day.minutes as u64)
                .label(Line::from(day.label.clone()))
                .text_value(format!("{}m", day.minutes))
                .style(Style::default().fg(palette.primary))
                .value_style(Style::default().fg(palette.card).bg(palette.primary))
        })
        .collect();
    let chart = BarChart::default()
        .block(card(" Last 7 days (minutes) ", palette))
        .data(BarGroup::default().bars(&bars))
        .bar_width(7)
        .bar_gap(2)
        .max(report.weekly_peak_minutes().max(1) as u64);
    f.render_widget(chart, rows[1]);

    let peak = report
        .category_breakdown
        .iter()
        .map(|c| c.minutes)
        .max()
        .unwrap_or(0);
    let lines: Vec<Line> = if report.category_breakdown.is_empty() {
        vec![Line::from(Span::styled(
            " No sessions yet",
            Style::default().fg(palette.muted),
        ))]
    } else {
        report
            .category_breakdown
            .iter()
            .map(|share| {
                let color = Category::from_id(share.category_id)
                    .map(category_color)
                    .unwrap_or(palette.muted);
                Line::from(vec![
                    Span::styled(format!(" {:<8} ", share.label), Style::default().fg(palette.text)),
                    Span::styled(bar(share.minutes, peak, 30), Style::default().fg(color)),
                    Span::styled(
                        format!(" {} min", share.minutes),
                        Style::default().fg(palette.muted),
                    ),
                ])
            })
            .collect()
    };
    f.render_widget(
        Paragraph::new(lines).block(card(" By category ", palette)),
        rows[2],
    );

    let status = match &app.notice {
        Some(notice) => notice_line(notice, palette),
        None => Paragraph::new(Span::styled(
            format!(
                " {} sessions, refreshed {}",
                report.session_count,
                app.refreshed_at.format("%H:%M:%S")
            ),
            Style::default().fg(palette.muted),
        )),
    };
    f.render_widget(status, rows[3]);
}

fn draw_footer(f: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(palette.primary).bold());
    let mut spans = vec![Span::raw(" "), key("q"), Span::raw(" quit  ")];

    match app.view {
        View::Timer => spans.extend([
            key("Space"),
            Span::raw(" start/pause  "),
            key("r"),
            Span::raw(" reset  "),
            key("f"),
            Span::raw(" finish  "),
        ]),
        View::Reports => spans.extend([
            key("r"),
            Span::raw(" refresh  "),
            key("x"),
            Span::raw(" clear  "),
        ]),
    }
    spans.extend([
        key("t"),
        Span::raw(format!(" {} theme  ", app.theme.as_str())),
        key("Tab"),
        Span::raw(" switch view  "),
        key("?"),
        Span::raw(" help"),
    ]);

    f.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().fg(palette.muted)),
        area,
    );
}

fn draw_summary_overlay(f: &mut Frame, summary: &focus::SessionSummary, palette: &Palette) {
    let area = centered(f.area(), 44, 11);
    f.render_widget(Clear, area);

    let title = if summary.completed {
        " Session complete "
    } else {
        " Session ended early "
    };
    let row = |label: &'static str, value: String| {
        Line::from(vec![
            Span::styled(format!("  {:<14}", label), Style::default().fg(palette.muted)),
            Span::styled(value, Style::default().fg(palette.text).bold()),
        ])
    };

    let text = vec![
        Line::from(""),
        row("Category", summary.category.to_string()),
        row("Focused", format::human(summary.duration_seconds as u64)),
        row("Clock", format::clock(summary.duration_seconds)),
        row("Distractions", summary.distraction_count.to_string()),
        Line::from(""),
        Line::from(Span::styled(
            "Press Enter to continue",
            Style::default().fg(palette.muted),
        ))
        .centered(),
    ];

    let popup = Paragraph::new(text).style(Style::default().bg(palette.card)).block(
        Block::default()
            .title(title)
            .title_style(Style::default().fg(palette.success).bold())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.success)),
    );
    f.render_widget(popup, area);
}

fn draw_confirm_overlay(f: &mut Frame, palette: &Palette) {
    let area = centered(f.area(), 44, 6);
    f.render_widget(Clear, area);

    let popup = Paragraph::new(vec![
        Line::from(""),
        Line::from("Delete every recorded session?").centered(),
        Line::from(Span::styled("y to confirm, any key to cancel", Style::default().fg(palette.muted)))
            .centered(),
    ])
    .style(Style::default().bg(palette.card))
    .block(
        Block::default()
            .title(" Clear history ")
            .title_style(Style::default().fg(palette.danger).bold())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.danger)),
    );
    f.render_widget(popup, area);
}

fn draw_help_overlay(f: &mut Frame, palette: &Palette) {
    let area = centered(f.area(), 50, 17);
    f.render_widget(Clear, area);

    let entry = |keys: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<11}", keys), Style::default().fg(palette.primary)),
            Span::raw(what),
        ])
    };

    let help_text = vec![
        Line::from(""),
        entry("Space", "Start / pause the timer"),
        entry("r", "Reset timer (Reports: refresh)"),
        entry("f", "Finish the session early"),
        entry("c / → ←", "Change category"),
        entry("1-9", "Pick a preset duration"),
        entry("Enter", "Acknowledge a finished session"),
        entry("x", "Clear history (Reports)"),
        entry("Tab", "Switch Timer / Reports"),
        entry("t", "Toggle light / dark theme"),
        entry("q / Esc", "Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "Leaving the terminal while running counts as a distraction",
            Style::default().fg(palette.muted),
        ))
        .centered(),
        Line::from(Span::styled("Press ? to close", Style::default().fg(palette.muted))).centered(),
    ];

    let help_popup = Paragraph::new(help_text)
        .wrap(Wrap { trim: false })
        .style(Style::default().bg(palette.card))
        .block(
            Block::default()
                .title(" Keyboard Shortcuts ")
                .title_style(Style::default().fg(palette.warning).bold())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.warning)),
        );

    f.render_widget(help_popup, area);
}

fn card<'a>(title: &'a str, palette: &Palette) -> Block<'a> {
    Block::default()
        .title(title)
        .title_style(Style::default().fg(palette.muted))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.muted))
        .style(Style::default().bg(palette.card))
}

fn notice_line<'a>(notice: &'a Notice, palette: &Palette) -> Paragraph<'a> {
    let (text, color) = match notice {
        Notice::Info(text) => (text, palette.primary),
        Notice::Warning(text) => (text, palette.warning),
    };
    Paragraph::new(Span::styled(format!(" {}", text), Style::default().fg(color).bold()))
        .alignment(Alignment::Center)
}

/// Horizontal bar scaled against `max`
pub fn bar(value: u32, max: u32, width: usize) -> String {
    let max = if max == 0 { 1 } else { max };
    let filled = ((value as usize) * width / (max as usize)).min(width);
    format!("{}{}", "\u{2588}".repeat(filled), "\u{2591}".repeat(width - filled))
}

/// A `width` x `height` rect centered in `area`
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}
