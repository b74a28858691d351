use std::collections::VecDeque;
use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, Paragraph};
use ratatui::Terminal;
use tryfi_core::{
    Coordinator, CoordinatorStatus, Entity, EntityDescription, EntityRegistry, TryFiClient,
    TryFiEntity,
};

const SERIES_COLORS: [Color; 4] = [Color::Green, Color::Cyan, Color::Magenta, Color::Yellow];

struct BatterySeries {
    label: String,
    color: Color,
    points: VecDeque<(f64, f64)>,
}

impl BatterySeries {
    fn new(label: String, color: Color) -> Self {
        Self {
            label,
            color,
            points: VecDeque::new(),
        }
    }

    fn push(&mut self, x: f64, y: f64, window_sec: f64) {
        self.points.push_back((x, y));
        while let Some((old_x, _)) = self.points.front() {
            if x - old_x > window_sec {
                self.points.pop_front();
            } else {
                break;
            }
        }
    }
}

struct ViewerState {
    start: Instant,
    status: Option<CoordinatorStatus>,
    entities: Vec<EntityDescription>,
    series: Vec<(String, BatterySeries)>,
}

impl ViewerState {
    fn new(registry: &EntityRegistry) -> Self {
        let series = registry
            .iter()
            .filter(|entity| matches!(entity, TryFiEntity::Battery(_)))
            .take(SERIES_COLORS.len())
            .zip(SERIES_COLORS)
            .map(|(entity, color)| (entity.unique_id(), BatterySeries::new(entity.name(), color)))
            .collect();

        Self {
            start: Instant::now(),
            status: None,
            entities: Vec::new(),
            series,
        }
    }

    fn update(&mut self, status: CoordinatorStatus, entities: Vec<EntityDescription>, window_sec: f64) {
        let t = self.start.elapsed().as_secs_f64();
        for (unique_id, series) in &mut self.series {
            let level = entities
                .iter()
                .find(|entity| &entity.unique_id == unique_id)
                .and_then(|entity| entity.state.as_f64());
            if let Some(level) = level {
                series.push(t, level, window_sec);
            }
        }
        self.status = Some(status);
        self.entities = entities;
    }
}

pub async fn run_viewer<C: TryFiClient + 'static>(
    coordinator: &mut Coordinator<C>,
    registry: &EntityRegistry,
    window_sec: f64,
) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = ViewerState::new(registry);
    state.update(coordinator.status(), registry.describe_all(), window_sec);
    let mut next_tick = Instant::now() + coordinator.effective_interval();

    let run_result = async {
        loop {
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.code == KeyCode::Char('q') {
                        break;
                    }
                }
            }

            if Instant::now() >= next_tick {
                let _ = coordinator.refresh().await;
                state.update(coordinator.status(), registry.describe_all(), window_sec);
                next_tick = Instant::now() + coordinator.effective_interval();
            }

            terminal.draw(|frame| draw_ui(frame.size(), frame, &state, window_sec))?;
        }

        Ok::<(), anyhow::Error>(())
    }
    .await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}

fn draw_ui(area: Rect, frame: &mut ratatui::Frame<'_>, state: &ViewerState, window_sec: f64) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    frame.render_widget(render_header(state, window_sec), rows[0]);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    let chart_count = state.series.len().max(1);
    let chart_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, chart_count as u32); chart_count])
        .split(cols[0]);

    if state.series.is_empty() {
        let empty = Paragraph::new(Line::from("No pets registered"))
            .block(Block::default().borders(Borders::ALL).title("Battery"));
        frame.render_widget(empty, chart_rows[0]);
    }
    let now_sec = state.start.elapsed().as_secs_f64();
    for ((_, series), area) in state.series.iter().zip(chart_rows.iter().copied()) {
        render_battery_chart(frame, area, series, now_sec, window_sec);
    }

    frame.render_widget(render_entities(state), cols[1]);
}

fn render_header(state: &ViewerState, window_sec: f64) -> Paragraph<'static> {
    let mut lines = Vec::new();
    if let Some(status) = &state.status {
        let summary = format!(
            "stale={} age_ms={} errors_in_row={} reads_ok={} reads_err={} interval_ms={}",
            status.stale,
            status
                .age_ms
                .map(|age| age.to_string())
                .unwrap_or_else(|| "n/a".to_string()),
            status.errors_in_row,
            status.reads_ok,
            status.reads_err,
            status.effective_interval_ms,
        );
        lines.push(Line::from(vec![
            Span::styled("TryFi Viewer  ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw(summary),
        ]));
        lines.push(Line::from(format!(
            "last_error={}  window={}s  (press 'q' to quit)",
            status.last_error.as_deref().unwrap_or("none"),
            window_sec as u64
        )));
    } else {
        lines.push(Line::from("Waiting first snapshot..."));
    }

    Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Status"))
}

fn render_entities(state: &ViewerState) -> Paragraph<'static> {
    let lines: Vec<Line<'static>> = state
        .entities
        .iter()
        .map(|entity| {
            let unit = entity.unit_of_measurement.unwrap_or("");
            let style = if entity.state.is_unknown() {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::raw(format!("{:<36} ", entity.name)),
                Span::styled(format!("{} {unit}", entity.state), style),
            ])
        })
        .collect();

    Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Entities"))
}

fn render_battery_chart(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    series: &BatterySeries,
    now_sec: f64,
    window_sec: f64,
) {
    let points: Vec<(f64, f64)> = series.points.iter().copied().collect();

    let x_min = (now_sec - window_sec).max(0.0);
    let x_max = now_sec.max(window_sec);
    let x_mid = (x_min + x_max) / 2.0;

    let dataset = Dataset::default()
        .name(series.label.clone())
        .marker(symbols::Marker::Braille)
        .graph_type(ratatui::widgets::GraphType::Line)
        .style(Style::default().fg(series.color))
        .data(&points);

    let chart = Chart::new(vec![dataset])
        .block(Block::default().borders(Borders::ALL).title(series.label.clone()))
        .x_axis(
            Axis::default()
                .title("time (s)")
                .style(Style::default().fg(Color::Gray))
                .bounds([x_min, x_max])
                .labels(vec![
                    Span::raw(format!("{x_min:.0}")),
                    Span::raw(format!("{x_mid:.0}")),
                    Span::raw(format!("{x_max:.0}")),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("%")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, 100.0])
                .labels(vec![Span::raw("0"), Span::raw("50"), Span::raw("100")]),
        );

    frame.render_widget(chart, area);
}
