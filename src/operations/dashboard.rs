use crate::db::settings_store::{self, Theme};
use crate::error::{TrackerError, TrackerResult};
use crate::models::amount::format_money;
use crate::models::category::style_for;
use crate::operations::stats::{ChartData, PeriodStats, Severity, chart_data};
use crate::session::Session;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::widgets::canvas::{Canvas, Points};
use ratatui::{
    prelude::{Alignment, Color, Constraint, Direction, Layout, Modifier, Rect, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Gauge, Paragraph},
};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Doughnut,
    Bar,
}

struct Palette {
    text: Color,
    background: Color,
    muted: Color,
}

struct DashboardState {
    title: String,
    stats: PeriodStats,
    chart: ChartData,
    chart_kind: ChartKind,
    theme: Theme,
}

impl DashboardState {
    fn load(session: &Session) -> TrackerResult<Self> {
        let stats = session.stats()?;
        let chart = chart_data(&stats.category_totals);
        Ok(Self {
            title: session.period().to_string(),
            stats,
            chart,
            chart_kind: ChartKind::Doughnut,
            theme: settings_store::get_theme(session.store())?,
        })
    }
}

pub fn run_dashboard(session: &Session) -> TrackerResult<()> {
    let mut view = Session::new(session.store(), session.period());
    let mut state = DashboardState::load(&view)?;

    enable_raw_mode().map_err(|e| TrackerError::Terminal(format!("Failed to enable raw mode: {}", e)))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| TrackerError::Terminal(format!("Failed to enter alternate screen: {}", e)))?;

    let result = (|| -> TrackerResult<()> {
        let backend = ratatui::backend::CrosstermBackend::new(stdout);
        let mut terminal = ratatui::Terminal::new(backend)
            .map_err(|e| TrackerError::Terminal(format!("Failed to initialize terminal: {}", e)))?;

        loop {
            terminal
                .draw(|frame| draw_dashboard(frame, &state))
                .map_err(|e| TrackerError::Terminal(format!("Failed to draw terminal UI: {}", e)))?;

            let ready = event::poll(std::time::Duration::from_millis(250))
                .map_err(|e| TrackerError::Terminal(format!("Failed to poll input: {}", e)))?;
            if !ready {
                continue;
            }
            let event =
                event::read().map_err(|e| TrackerError::Terminal(format!("Failed to read input: {}", e)))?;
            let key = match event {
                Event::Key(key) if key.kind != KeyEventKind::Release => key,
                _ => continue,
            };
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Char('d') => state.chart_kind = ChartKind::Doughnut,
                KeyCode::Char('b') => state.chart_kind = ChartKind::Bar,
                KeyCode::Char('t') => state.theme = settings_store::toggle_theme(view.store())?,
                KeyCode::Left | KeyCode::Right | KeyCode::Char('r') => {
                    match key.code {
                        KeyCode::Left => view.select_period(view.period().previous()),
                        KeyCode::Right => view.select_period(view.period().next()),
                        _ => {}
                    }
                    let kind = state.chart_kind;
                    state = DashboardState::load(&view)?;
                    state.chart_kind = kind;
                }
                _ => {}
            }
        }

        Ok(())
    })();

    disable_raw_mode().map_err(|e| TrackerError::Terminal(format!("Failed to disable raw mode: {}", e)))?;
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen)
        .map_err(|e| TrackerError::Terminal(format!("Failed to leave alternate screen: {}", e)))?;

    result
}

fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Dark => Palette {
            text: Color::Rgb(0xe0, 0xe0, 0xe0),
            background: Color::Rgb(0x1e, 0x1e, 0x1e),
            muted: Color::Rgb(0x33, 0x33, 0x33),
        },
        Theme::Light => Palette {
            text: Color::Rgb(0x33, 0x33, 0x33),
            background: Color::Rgb(0xff, 0xff, 0xff),
            muted: Color::Rgb(0xe0, 0xe0, 0xe0),
        },
    }
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Normal => Color::Green,
        Severity::Warning => Color::Yellow,
        Severity::Danger => Color::Red,
    }
}

/// `#RRGGBB` to a terminal color; anything else renders gray.
fn hex_to_color(hex: &str) -> Color {
    let digits = hex.trim_start_matches('#');
    if digits.len() != 6 || !digits.is_ascii() {
        return Color::Gray;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
    match (channel(0..2), channel(2..4), channel(4..6)) {
        (Some(r), Some(g), Some(b)) => Color::Rgb(r, g, b),
        _ => Color::Gray,
    }
}

fn draw_dashboard(frame: &mut ratatui::Frame, state: &DashboardState) {
    let colors = palette(state.theme);
    let size = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().fg(colors.text).bg(colors.background)),
        size,
    );

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .split(size);

    render_summary(frame, layout[0], state, &colors);
    render_progress(frame, layout[1], &state.stats);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(layout[2]);
    match state.chart_kind {
        ChartKind::Doughnut => render_doughnut_chart(frame, bottom[0], &state.chart, &colors),
        ChartKind::Bar => render_bar_chart(frame, bottom[0], &state.chart),
    }
    render_category_table(frame, bottom[1], &state.stats);

    let hint = Paragraph::new("←/→ month  d doughnut  b bar  t theme  r reload  q/Esc exit")
        .style(Style::default().fg(colors.text))
        .alignment(Alignment::Left);
    frame.render_widget(hint, layout[3]);
}

fn render_summary(frame: &mut ratatui::Frame, area: Rect, state: &DashboardState, colors: &Palette) {
    let stats = &state.stats;
    let balance_color = if stats.balance < Decimal::ZERO {
        Color::Red
    } else {
        Color::Green
    };
    let top = match stats.top_category.as_deref() {
        Some(category) => format!("{} {}", style_for(category).icon, category),
        None => stats.top_category_label().to_string(),
    };

    let lines = vec![
        Line::from(vec![
            Span::raw(format!("Income {}", format_money(stats.income))),
            Span::raw("   "),
            Span::raw(format!("Expenses {}", format_money(stats.total_expenses))),
            Span::raw("   "),
            Span::styled(
                format!("Balance {}", format_money(stats.balance)),
                Style::default().fg(balance_color),
            ),
        ]),
        Line::from(format!(
            "Transactions {}   Top category {}",
            stats.transaction_count, top
        )),
    ];

    let block = Block::default()
        .title(Span::styled(
            state.title.clone(),
            Style::default().fg(colors.text).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_progress(frame: &mut ratatui::Frame, area: Rect, stats: &PeriodStats) {
    let ratio = (stats.progress_ratio.to_f64().unwrap_or(0.0) / 100.0).clamp(0.0, 1.0);
    let gauge = Gauge::default()
        .block(Block::default().title("Budget").borders(Borders::ALL))
        .gauge_style(Style::default().fg(severity_color(stats.severity)))
        .ratio(ratio)
        .label(format!("{:.1}% spent", stats.percent_spent.round_dp(1)));
    frame.render_widget(gauge, area);
}

/// Angular extent of each slice, starting at angle zero.
fn pie_slices(chart: &ChartData) -> Vec<(f64, f64, Color)> {
    let total: f64 = chart.data.iter().sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let mut slices = Vec::with_capacity(chart.data.len());
    let mut start_angle = 0.0_f64;
    for (value, color) in chart.data.iter().zip(&chart.colors) {
        let sweep = value / total * std::f64::consts::TAU;
        slices.push((start_angle, start_angle + sweep, hex_to_color(color)));
        start_angle += sweep;
    }
    slices
}

fn render_doughnut_chart(frame: &mut ratatui::Frame, area: Rect, chart: &ChartData, colors: &Palette) {
    let block = Block::default().title("Expenses by category").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let slices = pie_slices(chart);
    if slices.is_empty() {
        let empty = Paragraph::new("No expenses this month").alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    let canvas = Canvas::default()
        .background_color(colors.background)
        .x_bounds([-1.0, 1.0])
        .y_bounds([-1.0, 1.0])
        .paint(|ctx| {
            for (start, end, color) in &slices {
                let mut points = Vec::new();
                // hole in the middle
                let mut r = 0.45;
                while r <= 1.0 {
                    let mut angle = *start;
                    while angle <= *end {
                        points.push((r * angle.cos(), r * angle.sin()));
                        angle += 0.05;
                    }
                    r += 0.04;
                }
                if !points.is_empty() {
                    ctx.draw(&Points {
                        coords: &points,
                        color: *color,
                    });
                }
            }
        });
    frame.render_widget(canvas, inner);
}

fn render_bar_chart(frame: &mut ratatui::Frame, area: Rect, chart: &ChartData) {
    let block = Block::default().title("Expenses by category").borders(Borders::ALL);
    if chart.labels.is_empty() {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        let empty = Paragraph::new("No expenses this month").alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    let bars: Vec<Bar> = chart
        .labels
        .iter()
        .zip(chart.data.iter().zip(&chart.colors))
        .map(|(label, (value, color))| {
            let short: String = label.chars().take(6).collect();
            Bar::default()
                .value(value.round().max(0.0) as u64)
                .label(Line::from(short))
                .style(Style::default().fg(hex_to_color(color)))
        })
        .collect();

    let bar_chart = BarChart::default()
        .block(block)
        .bar_width(6)
        .bar_gap(1)
        .data(BarGroup::default().bars(&bars));
    frame.render_widget(bar_chart, area);
}

fn render_category_table(frame: &mut ratatui::Frame, area: Rect, stats: &PeriodStats) {
    let block = Block::default().title("Category spend").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![Line::from(vec![
        Span::styled("Category", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("         "),
        Span::styled("Amount", Style::default().add_modifier(Modifier::BOLD)),
    ])];

    for (category, amount) in &stats.category_totals {
        let style = style_for(category);
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:15}", category),
                Style::default().fg(hex_to_color(style.color)),
            ),
            Span::raw("  "),
            Span::raw(format!("{:>10}", format_money(*amount))),
        ]));
    }

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Left), inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::transaction_store::sample_transaction;
    use crate::operations::stats::compute_stats;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn state_for(kind: ChartKind, theme: Theme) -> DashboardState {
        let transactions = vec![
            sample_transaction(1, "Food", 200, 5),
            sample_transaction(2, "Housing", 900, 1),
        ];
        let stats = compute_stats(&transactions, Decimal::from(1000));
        let chart = chart_data(&stats.category_totals);
        DashboardState {
            title: "January 2025".to_string(),
            stats,
            chart,
            chart_kind: kind,
            theme,
        }
    }

    fn rendered_text(state: &DashboardState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| draw_dashboard(frame, state)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_hex_to_color() {
        assert_eq!(hex_to_color("#36A2EB"), Color::Rgb(0x36, 0xa2, 0xeb));
        assert_eq!(hex_to_color("36a2eb"), Color::Rgb(0x36, 0xa2, 0xeb));
        assert_eq!(hex_to_color("#36A2"), Color::Gray);
        assert_eq!(hex_to_color("#GG0000"), Color::Gray);
        assert_eq!(hex_to_color("#ééé"), Color::Gray);
    }

    #[test]
    fn test_severity_colors() {
        assert_eq!(severity_color(Severity::Normal), Color::Green);
        assert_eq!(severity_color(Severity::Warning), Color::Yellow);
        assert_eq!(severity_color(Severity::Danger), Color::Red);
    }

    #[test]
    fn test_pie_slices_cover_full_circle() {
        let state = state_for(ChartKind::Doughnut, Theme::Light);
        let slices = pie_slices(&state.chart);

        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].0, 0.0);
        assert!((slices[1].1 - std::f64::consts::TAU).abs() < 1e-9);
        assert_eq!(slices[0].2, Color::Rgb(0xff, 0x63, 0x84));
    }

    #[test]
    fn test_pie_slices_empty_chart() {
        let chart = ChartData {
            labels: vec![],
            data: vec![],
            colors: vec![],
        };
        assert!(pie_slices(&chart).is_empty());
    }

    #[test]
    fn test_dashboard_renders_summary_and_table() {
        let text = rendered_text(&state_for(ChartKind::Doughnut, Theme::Dark));

        assert!(text.contains("January 2025"));
        assert!(text.contains("Balance $-100.00"));
        assert!(text.contains("110.0% spent"));
        assert!(text.contains("Housing"));
        assert!(text.contains("Miscellaneous"));
    }

    #[test]
    fn test_dashboard_renders_bar_chart() {
        let text = rendered_text(&state_for(ChartKind::Bar, Theme::Light));
        assert!(text.contains("Expenses by category"));
        assert!(text.contains("Housin"));
    }
}
