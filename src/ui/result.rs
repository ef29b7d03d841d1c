use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::app::View;
use crate::engine::{compute_summary, Grade, Summary};
use crate::store::EndReason;

pub fn render(frame: &mut Frame, area: Rect, view: &View) {
    let Some(session) = view.state.session else {
        return;
    };
    let summary = compute_summary(session);

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(6),
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    render_title(frame, chunks[0], view.state.end_reason);
    render_counts(frame, chunks[1], &summary);
    render_score(frame, chunks[2], &summary);
    super::render_controls(frame, chunks[4], "enter kembali ke beranda  ·  l logout  ·  q quit");
}

fn grade_color(grade: Grade) -> Color {
    match grade {
        Grade::Excellent => Color::Green,
        Grade::Good => Color::Cyan,
        Grade::Fair => Color::Yellow,
        Grade::Poor => Color::Red,
    }
}

fn render_title(frame: &mut Frame, area: Rect, reason: Option<EndReason>) {
    let subtitle = match reason {
        Some(EndReason::TimedOut) => "  (waktu habis)",
        Some(EndReason::Stopped) => "  (dihentikan)",
        Some(EndReason::Completed) | None => "",
    };
    let line = Line::from(vec![
        Span::styled("HASIL KUIS", Style::default().fg(Color::Cyan).bold()),
        Span::styled(subtitle, Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn render_counts(frame: &mut Frame, area: Rect, summary: &Summary) {
    let columns = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
    ])
    .split(area);

    let cells = [
        (summary.correct, "Benar", Color::Green),
        (summary.incorrect, "Salah", Color::Red),
        (summary.answered, "Dijawab", Color::Blue),
    ];

    for ((value, label, color), column) in cells.into_iter().zip(columns.iter()) {
        let content = vec![
            Line::from(""),
            Line::from(Span::styled(
                value.to_string(),
                Style::default().fg(color).bold(),
            )),
            Line::from(Span::styled(label, Style::default().fg(Color::Gray))),
        ];
        let widget = Paragraph::new(content).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Color::DarkGray),
        );
        frame.render_widget(widget, *column);
    }
}

fn render_score(frame: &mut Frame, area: Rect, summary: &Summary) {
    let content = vec![
        Line::from(""),
        Line::from(
            format!(
                "Total soal: {}  ·  Tidak dijawab: {}",
                summary.total,
                summary.unanswered()
            )
            .fg(Color::Gray),
        ),
        Line::from(Span::styled(
            format!("Skor: {}%", summary.percentage),
            Style::default().fg(grade_color(summary.grade())).bold(),
        )),
    ];
    frame.render_widget(Paragraph::new(content).alignment(Alignment::Center), area);
}
