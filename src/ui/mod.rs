mod login;
mod modules;
mod quiz;
mod review;

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::app::App;
use crate::models::Screen;
use crate::progress::ProgressBackend;

pub fn render<B: ProgressBackend>(frame: &mut Frame, app: &App<B>) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    match app.screen {
        Screen::Login => login::render(frame, area, app),
        Screen::ModuleSelection => modules::render(frame, area, app),
        Screen::Quiz => quiz::render(frame, area, app),
        Screen::Review => review::render(frame, area, app),
    }

    if app.is_confirming_quit() {
        render_quit_dialog(frame, area);
    }
}

/// Badge color for a stored percentage.
fn progress_color(percentage: u8) -> Color {
    match percentage {
        80.. => Color::Green,
        40..=79 => Color::Yellow,
        _ => Color::Blue,
    }
}

fn render_quit_dialog(frame: &mut Frame, area: Rect) {
    let [_, row, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(7),
        Constraint::Fill(1),
    ])
    .areas(area);
    let [_, dialog, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(52),
        Constraint::Fill(1),
    ])
    .areas(row);

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Leave this quiz? Your answers will not be scored.",
            Style::default().fg(Color::White).bold(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("[Y] ", Style::default().fg(Color::Red).bold()),
            Span::styled("leave  ·  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[N] ", Style::default().fg(Color::Green).bold()),
            Span::styled("keep going", Style::default().fg(Color::DarkGray)),
        ]),
    ];

    frame.render_widget(Clear, dialog);
    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::Yellow),
    );
    frame.render_widget(widget, dialog);
}
