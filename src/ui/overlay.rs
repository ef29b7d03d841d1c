use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};

pub fn render_loading(frame: &mut Frame, area: Rect) {
    render_box(
        frame,
        area,
        vec![
            Line::from(""),
            Line::from(Span::styled(
                "Sedang memuat...",
                Style::default().fg(Color::Yellow).bold(),
            )),
        ],
    );
}

pub fn render_confirm_stop(frame: &mut Frame, area: Rect) {
    render_box(
        frame,
        area,
        vec![
            Line::from(Span::styled(
                "Apakah Anda yakin ingin menghentikan kuis?",
                Style::default().fg(Color::White).bold(),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("[Y] ya", Style::default().fg(Color::Red).bold()),
                Span::styled("   ·   ", Style::default().fg(Color::DarkGray)),
                Span::styled("[N] tidak", Style::default().fg(Color::Green).bold()),
            ]),
        ],
    );
}

fn render_box(frame: &mut Frame, area: Rect, content: Vec<Line>) {
    let popup = super::centered(area, 50, 5);
    frame.render_widget(Clear, popup);

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::Cyan),
    );
    frame.render_widget(widget, popup);
}
