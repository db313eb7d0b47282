use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge, Padding, Paragraph},
};

use crate::app::App;
use crate::progress::ProgressBackend;

use super::progress_color;

pub fn render<B: ProgressBackend>(frame: &mut Frame, area: Rect, app: &App<B>) {
    let chunks = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    render_header(frame, chunks[0], app);
    render_overall(frame, chunks[1], app.overall_progress());
    render_module_list(frame, chunks[2], app);
    render_status(frame, chunks[3], app);
    render_controls(frame, chunks[4], app.pending_module().is_some());
}

fn render_header<B: ProgressBackend>(frame: &mut Frame, area: Rect, app: &App<B>) {
    let line = Line::from(vec![
        Span::styled("SELECT A MODULE", Style::default().fg(Color::Cyan).bold()),
        Span::styled(
            format!("   signed in as {}", app.store().user()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_overall(frame: &mut Frame, area: Rect, overall: u8) {
    let gauge = Gauge::default()
        .block(Block::default().title(" Overall progress ").borders(Borders::ALL))
        .gauge_style(Style::default().fg(progress_color(overall)))
        .percent(u16::from(overall));
    frame.render_widget(gauge, area);
}

fn render_module_list<B: ProgressBackend>(frame: &mut Frame, area: Rect, app: &App<B>) {
    let pending = app.pending_module();
    let mut lines: Vec<Line> = Vec::with_capacity(app.modules().len() * 2);

    for (index, module) in app.modules().iter().enumerate() {
        let is_selected = index == app.selected_module();
        let style = if is_selected {
            Style::default().fg(Color::Cyan).bold()
        } else {
            Style::default().fg(Color::Gray)
        };
        let marker = if is_selected { ">" } else { " " };
        let progress = app.module_progress(&module.id);

        let mut spans = vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{:<28}", module.name), style),
            Span::styled(
                format!("{:>4}%", progress),
                Style::default().fg(progress_color(progress)).bold(),
            ),
        ];
        if pending == Some(module.id.as_str()) {
            spans.push(Span::styled(
                "  (unfinished)",
                Style::default().fg(Color::Yellow),
            ));
        }

        lines.push(Line::from(spans));
        lines.push(Line::from(""));
    }

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Color::DarkGray)
            .padding(Padding::vertical(1)),
    );
    frame.render_widget(widget, area);
}

fn render_status<B: ProgressBackend>(frame: &mut Frame, area: Rect, app: &App<B>) {
    if let Some(status) = app.status() {
        let widget = Paragraph::new(status)
            .alignment(Alignment::Center)
            .fg(Color::Red);
        frame.render_widget(widget, area);
    }
}

fn render_controls(frame: &mut Frame, area: Rect, has_pending: bool) {
    let text = if has_pending {
        "j/k move  ·  enter start  ·  c continue  ·  l logout  ·  q quit"
    } else {
        "j/k move  ·  enter start  ·  l logout  ·  q quit"
    };
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
