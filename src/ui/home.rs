use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::app::View;
use crate::models::{QUESTION_COUNT, TIME_LIMIT_SECS};

pub fn render(frame: &mut Frame, area: Rect, view: &View) {
    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "SELAMAT DATANG DI QUIZAPP",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(
            "Uji pengetahuan Anda dengan kuis interaktif dari berbagai kategori.".fg(Color::Gray),
        ),
        Line::from(
            format!(
                "{} soal · {} menit",
                QUESTION_COUNT,
                TIME_LIMIT_SECS / 60
            )
            .fg(Color::DarkGray),
        ),
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
        "ENTER",
        Style::default().fg(Color::Green).bold(),
    )));
    content.push(Line::from("mulai kuis baru".fg(Color::DarkGray)));
    content.push(Line::from(""));
    content.push(Line::from(
        "l logout  ·  q quit".fg(Color::DarkGray),
    ));

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, super::centered(area, 72, 14));
}
