use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::app::{LoginField, View};

pub fn render(frame: &mut Frame, area: Rect, view: &View) {
    let form = view.login;
    let field_style = |field: LoginField| {
        if form.focus == field {
            Style::default().fg(Color::Yellow).bold()
        } else {
            Style::default().fg(Color::Gray)
        }
    };
    let cursor = |field: LoginField| if form.focus == field { "_" } else { "" };
    let masked = "*".repeat(form.password.chars().count());

    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "LOGIN QUIZAPP",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Username: ", Style::default().fg(Color::White)),
            Span::styled(form.username.as_str(), field_style(LoginField::Username)),
            Span::styled(cursor(LoginField::Username), field_style(LoginField::Username)),
        ]),
        Line::from(vec![
            Span::styled("Password: ", Style::default().fg(Color::White)),
            Span::styled(masked, field_style(LoginField::Password)),
            Span::styled(cursor(LoginField::Password), field_style(LoginField::Password)),
        ]),
        Line::from(""),
    ];

    match view.state.error_message {
        Some(err) => content.push(Line::from(Span::styled(
            err,
            Style::default().fg(Color::Red),
        ))),
        None => content.push(Line::from("")),
    }

    content.push(Line::from(""));
    content.push(Line::from(Span::styled(
        "[Tab] switch field  ·  [Enter] login  ·  [Esc] quit",
        Style::default().fg(Color::DarkGray),
    )));

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, super::centered(area, 60, 12));
}
