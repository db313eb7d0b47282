use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
};

use crate::app::App;
use crate::progress::ProgressBackend;
use crate::session::{QuestionState, Session, format_time};

const OPTION_LABELS: [char; 6] = ['A', 'B', 'C', 'D', 'E', 'F'];

pub fn render<B: ProgressBackend>(frame: &mut Frame, area: Rect, app: &App<B>) {
    let Some(session) = app.session() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    render_header(frame, chunks[0], app.module_name(session.module()), session);
    render_navigation(frame, chunks[1], session);
    render_answered(frame, chunks[2], session);
    render_question_text(frame, chunks[4], session);
    render_options(frame, chunks[5], session, app.selected_option());
    render_controls(frame, chunks[6], session.is_last());
}

fn render_header(frame: &mut Frame, area: Rect, module_name: &str, session: &Session) {
    let [left, right] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Length(24)]).areas(area);

    let question = session.current_question();
    let title = Line::from(vec![
        Span::styled(module_name, Style::default().fg(Color::Cyan).bold()),
        Span::styled(
            format!(
                "   Question {}/{} · {}",
                session.current_index() + 1,
                session.len(),
                question.kind.label()
            ),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(title), left);

    let timer = Paragraph::new(format_time(session.elapsed_seconds()))
        .alignment(Alignment::Right)
        .fg(Color::Yellow);
    frame.render_widget(timer, right);
}

fn render_navigation(frame: &mut Frame, area: Rect, session: &Session) {
    let spans: Vec<Span> = session
        .question_states()
        .into_iter()
        .enumerate()
        .map(|(index, state)| {
            let is_current = index == session.current_index();
            let mut style = match state {
                QuestionState::Answered => Style::default().fg(Color::Green),
                QuestionState::Current => Style::default().fg(Color::Cyan),
                QuestionState::Unvisited => Style::default().fg(Color::DarkGray),
            };
            if is_current {
                style = style.bold().reversed();
            }
            Span::styled(format!(" {} ", index + 1), style)
        })
        .collect();

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_answered(frame: &mut Frame, area: Rect, session: &Session) {
    let answered = session.answered_count();
    let total = session.len();
    let ratio = if total > 0 {
        answered as f64 / total as f64
    } else {
        0.0
    };

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Green).bg(Color::Black))
        .label(format!("Answered: {}/{}", answered, total))
        .ratio(ratio);
    frame.render_widget(gauge, area);
}

fn render_question_text(frame: &mut Frame, area: Rect, session: &Session) {
    let widget = Paragraph::new(session.current_question().text.as_str())
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold();
    frame.render_widget(widget, area);
}

fn render_options(frame: &mut Frame, area: Rect, session: &Session, selected: usize) {
    let question = session.current_question();
    let answered = session.answer_for(session.current_index());
    let mut lines: Vec<Line> = Vec::with_capacity(question.options.len() * 2);

    for (index, option) in question.options.iter().enumerate() {
        let is_selected = index == selected;
        let is_answer = answered == Some(index);
        let style = if is_answer {
            Style::default().fg(Color::Green).bold()
        } else if is_selected {
            Style::default().fg(Color::Cyan).bold()
        } else {
            Style::default().fg(Color::Gray)
        };
        let marker = if is_selected { ">" } else { " " };
        let label = OPTION_LABELS
            .get(index)
            .map(|c| c.to_string())
            .unwrap_or_else(|| (index + 1).to_string());
        let check = if is_answer { "  ✓" } else { "" };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{}. ", label), style),
            Span::styled(option.as_str(), style),
            Span::styled(check, style),
        ]));
        lines.push(Line::from(""));
    }

    let widget = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect, is_last: bool) {
    let text = if is_last {
        "j/k option  ·  enter answer  ·  h/l move  ·  digits jump  ·  f finish  ·  q quit"
    } else {
        "j/k option  ·  enter answer  ·  h/l move  ·  digits jump  ·  f finish early  ·  q quit"
    };
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
