mod home;
mod login;
mod overlay;
mod quiz;
mod result;

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::app::View;
use crate::models::Screen;

pub fn render(frame: &mut Frame, view: &View) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    let [header, body] =
        Layout::vertical([Constraint::Length(2), Constraint::Fill(1)]).areas(area);
    render_header(frame, header, view);

    match view.state.screen {
        Screen::Login => login::render(frame, body, view),
        Screen::Home => home::render(frame, body, view),
        Screen::Quiz => quiz::render(frame, body, view),
        Screen::Results => result::render(frame, body, view),
    }

    if view.state.is_loading {
        overlay::render_loading(frame, area);
    } else if view.confirm_stop {
        overlay::render_confirm_stop(frame, area);
    }
}

fn render_header(frame: &mut Frame, area: Rect, view: &View) {
    let mut spans = vec![Span::styled(
        " QuizApp",
        Style::default().fg(Color::Cyan).bold(),
    )];
    if let Some(user) = view.state.user {
        spans.push(Span::styled(
            format!("  ·  Halo, {}", user.username),
            Style::default().fg(Color::Gray),
        ));
    }

    let widget = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

/// Centers a box of the given size inside `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [_, row, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(1),
    ])
    .areas(area);
    let [_, cell, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width),
        Constraint::Fill(1),
    ])
    .areas(row);
    cell
}

fn render_controls(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text.to_string())
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
