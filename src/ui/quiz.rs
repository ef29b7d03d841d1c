use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::View;
use crate::models::{Question, QuizSession};

const OPTION_LABELS: [char; 4] = ['A', 'B', 'C', 'D'];
const LOW_TIME_SECS: u32 = 60;

pub fn render(frame: &mut Frame, area: Rect, view: &View) {
    let Some(session) = view.state.session else {
        return;
    };
    let Some(question) = session.current_question() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1), // Progress and timer
        Constraint::Length(1), // Category and difficulty
        Constraint::Length(5), // Question text
        Constraint::Min(8),    // Options
        Constraint::Length(1), // Controls
    ])
    .margin(1)
    .split(area);

    render_progress(frame, chunks[0], session);
    render_meta(frame, chunks[1], question);
    render_question_text(frame, chunks[2], &question.display_text());
    render_options(frame, chunks[3], question, view.selected_option);
    super::render_controls(
        frame,
        chunks[4],
        "j/k select  ·  enter/1-4 answer  ·  x stop  ·  l logout  ·  q quit",
    );
}

fn render_progress(frame: &mut Frame, area: Rect, session: &QuizSession) {
    let [left, right] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Length(12)]).areas(area);

    let progress = Line::from(vec![
        Span::styled(
            format!("Soal {}/{}", session.current_index + 1, session.total()),
            Style::default().fg(Color::Cyan).bold(),
        ),
        Span::styled(
            format!("   Dijawab: {}/{}", session.answered, session.total()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(progress), left);

    let timer_color = if session.remaining_seconds < LOW_TIME_SECS {
        Color::Red
    } else {
        Color::White
    };
    let timer = Paragraph::new(format!("⏱ {}", session.format_time()))
        .alignment(Alignment::Right)
        .style(Style::default().fg(timer_color).bold());
    frame.render_widget(timer, right);
}

fn render_meta(frame: &mut Frame, area: Rect, question: &Question) {
    let [left, right] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).areas(area);

    let category = Paragraph::new(format!("Kategori: {}", question.category))
        .fg(Color::DarkGray);
    let difficulty = Paragraph::new(format!("Tingkat: {}", question.difficulty.label()))
        .alignment(Alignment::Right)
        .fg(Color::DarkGray);
    frame.render_widget(category, left);
    frame.render_widget(difficulty, right);
}

fn render_question_text(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text.to_string())
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::White).bold())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(widget, area);
}

fn render_options(frame: &mut Frame, area: Rect, question: &Question, selected: usize) {
    let mut lines: Vec<Line> = Vec::with_capacity(question.answers.len() * 2);

    for (index, answer) in question.answers.iter().enumerate() {
        let is_selected = index == selected;
        let style = if is_selected {
            Style::default().fg(Color::Yellow).bold()
        } else {
            Style::default().fg(Color::Gray)
        };
        let marker = if is_selected { ">" } else { " " };
        let label = OPTION_LABELS.get(index).copied().unwrap_or('?');

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{}. ", label), style),
            Span::styled(answer.display_text(), style),
        ]));
        lines.push(Line::from(""));
    }

    let widget = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Jawaban ")
            .title_style(Style::default().fg(Color::Cyan))
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}
