use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::progress::ProgressBackend;
use crate::session::{Outcome, PerformanceLevel, Review, ReviewItem, format_time};

pub fn render<B: ProgressBackend>(frame: &mut Frame, area: Rect, app: &App<B>) {
    let Some(review) = app.review() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(8),
        Constraint::Fill(1),
        Constraint::Length(2),
    ])
    .margin(1)
    .split(area);

    render_score_summary(frame, chunks[0], app.module_name(&review.module), review);
    render_question_breakdown(frame, chunks[1], review, app.review_scroll());
    render_controls(frame, chunks[2]);
}

fn level_color(level: PerformanceLevel) -> Color {
    match level {
        PerformanceLevel::Excellent => Color::Green,
        PerformanceLevel::VeryGood => Color::Cyan,
        PerformanceLevel::Good => Color::Blue,
        PerformanceLevel::Fair => Color::Yellow,
        PerformanceLevel::NeedsImprovement => Color::Red,
    }
}

fn outcome_style(outcome: Outcome) -> (&'static str, Color) {
    match outcome {
        Outcome::Correct => ("+", Color::Green),
        Outcome::Incorrect => ("-", Color::Red),
        Outcome::Unanswered => ("?", Color::DarkGray),
    }
}

fn render_score_summary(frame: &mut Frame, area: Rect, module_name: &str, review: &Review) {
    let summary = &review.summary;
    let level = review.level();
    let color = level_color(level);

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("RESULTS · {}", module_name),
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("{}%  {}", summary.percentage, level),
            Style::default().fg(color).bold(),
        )),
        Line::from(vec![
            Span::styled(
                format!("{} correct", summary.correct),
                Style::default().fg(Color::Green),
            ),
            Span::styled("  ·  ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{} incorrect", summary.incorrect),
                Style::default().fg(Color::Red),
            ),
            Span::styled("  ·  ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{} unanswered", summary.unanswered),
                Style::default().fg(Color::Gray),
            ),
            Span::styled("  ·  ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format_time(review.elapsed_seconds),
                Style::default().fg(Color::Yellow),
            ),
        ]),
        Line::from(""),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn review_lines(item: &ReviewItem) -> Vec<Line<'_>> {
    let (symbol, color) = outcome_style(item.outcome);
    let question = &item.question;

    let mut lines = vec![Line::from(vec![
        Span::styled(format!(" {} ", symbol), Style::default().fg(color).bold()),
        Span::styled(
            format!("{:2}. ", item.index + 1),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(question.text.as_str(), Style::default().fg(Color::White)),
        Span::styled(
            format!("  [{} · {}]", item.outcome.label(), question.kind.label()),
            Style::default().fg(color),
        ),
    ])];

    for (index, option) in question.options.iter().enumerate() {
        let is_correct = index == question.correct_index;
        let is_selected = item.selected == Some(index);
        let (marker, style) = match (is_correct, is_selected) {
            (true, _) => ("✓", Style::default().fg(Color::Green)),
            (false, true) => ("→", Style::default().fg(Color::Red)),
            (false, false) => (" ", Style::default().fg(Color::Gray)),
        };
        lines.push(Line::from(vec![
            Span::styled(format!("      {} ", marker), style),
            Span::styled(option.as_str(), style),
        ]));
    }

    lines.push(Line::from(vec![
        Span::styled("      Explanation: ", Style::default().fg(Color::Yellow)),
        Span::styled(
            question.explanation.as_str(),
            Style::default().fg(Color::DarkGray),
        ),
    ]));
    lines.push(Line::from(""));
    lines
}

fn render_question_breakdown(frame: &mut Frame, area: Rect, review: &Review, scroll: usize) {
    // Scroll moves one question at a time, so skip whole items.
    let lines: Vec<Line> = review
        .items
        .iter()
        .skip(scroll)
        .flat_map(review_lines)
        .collect();

    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().padding(Padding::horizontal(1)));
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("j/k scroll  ·  r retry  ·  enter modules  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
