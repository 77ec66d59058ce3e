pub mod screen;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{App, AppState};
use cybertype::session::{Outcome, Phase, Session};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

/// Split `width` cells into (correct, error) shares for the accuracy bar
pub fn distribution_widths(width: u16, accuracy: u32) -> (u16, u16) {
    let accuracy = accuracy.min(100);
    let correct = ((width as u32 * accuracy) as f64 / 100.0).round() as u16;
    (correct, width - correct)
}

fn sample_spans(session: &Session) -> Vec<Span<'static>> {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let green_bold_style = Style::default().patch(bold_style).fg(Color::Green);
    let red_bold_style = Style::default().patch(bold_style).fg(Color::Red);
    let dim_bold_style = Style::default()
        .patch(bold_style)
        .add_modifier(Modifier::DIM);
    let cursor_style = Style::default()
        .patch(dim_bold_style)
        .fg(Color::Cyan)
        .add_modifier(Modifier::UNDERLINED);

    let cursor = session.cursor_pos();
    let sample_len = session.sample_text().chars().count();

    let overflow = session
        .typed_text()
        .chars()
        .skip(sample_len)
        .map(|c| match c {
            ' ' => Span::styled("·", red_bold_style),
            c => Span::styled(c.to_string(), red_bold_style),
        });

    session
        .sample_text()
        .chars()
        .zip(session.char_outcomes())
        .enumerate()
        .map(|(idx, (expected, outcome))| match outcome {
            Outcome::Correct => Span::styled(expected.to_string(), green_bold_style),
            Outcome::Incorrect => Span::styled(
                match expected {
                    ' ' => "·".to_owned(),
                    c => c.to_string(),
                },
                red_bold_style,
            ),
            Outcome::Pending if idx == cursor => {
                Span::styled(expected.to_string(), cursor_style)
            }
            Outcome::Pending => Span::styled(expected.to_string(), dim_bold_style),
        })
        .chain(overflow)
        .collect()
}

impl App {
    fn render_typing(&self, area: Rect, buf: &mut Buffer) {
        let session = self.controller.session();
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_bold_style = Style::default()
            .patch(bold_style)
            .add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
        let prompt_width = session.sample_text().width().max(session.typed_text().width());
        let prompt_occupied_lines = ((prompt_width as f64
            / max_chars_per_line as f64)
            .ceil()
            + 1.0) as u16;
        let stats_lines = if self.show_live_stats { 1 } else { 0 };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints(
                [
                    Constraint::Length(2), // title
                    Constraint::Min(0),
                    Constraint::Length(2), // timer
                    Constraint::Length(prompt_occupied_lines),
                    Constraint::Length(stats_lines),
                    Constraint::Min(0),
                    Constraint::Length(1), // legend
                ]
                .as_ref(),
            )
            .split(area);

        Paragraph::new(vec![
            Line::from(Span::styled(
                "Cyber Speed Typing",
                Style::default().patch(bold_style).fg(Color::Cyan),
            )),
            Line::from(Span::styled("Test your typing prowess", italic_style)),
        ])
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

        let timer_text = match session.phase() {
            Phase::Idle => format!("{}s  (start typing)", session.remaining_seconds()),
            _ => format!("{}s", session.remaining_seconds()),
        };
        Paragraph::new(Span::styled(timer_text, dim_bold_style))
            .alignment(Alignment::Center)
            .render(chunks[2], buf);

        Paragraph::new(Line::from(sample_spans(session)))
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: false })
            .render(chunks[3], buf);

        if self.show_live_stats {
            let m = session.metrics();
            Paragraph::new(Span::styled(
                format!("{} wpm   {}% acc", m.wpm, m.accuracy),
                bold_style,
            ))
            .alignment(Alignment::Center)
            .render(chunks[4], buf);
        }

        Paragraph::new(Span::styled("(ctrl+r) restart / (esc)ape", italic_style))
            .render(chunks[6], buf);
    }

    fn render_results(&self, area: Rect, buf: &mut Buffer) {
        let snapshot = self.controller.snapshot();
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);
        let cyan_style = Style::default().fg(Color::Cyan);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints(
                [
                    Constraint::Min(0),
                    Constraint::Length(1), // heading
                    Constraint::Length(3), // grade
                    Constraint::Length(1), // "Performance Grade"
                    Constraint::Length(1),
                    Constraint::Length(1), // stats
                    Constraint::Length(1),
                    Constraint::Length(3), // distribution
                    Constraint::Min(0),
                    Constraint::Length(1), // legend
                ]
                .as_ref(),
            )
            .split(area);

        Paragraph::new(Span::styled(
            "Performance Analysis",
            Style::default().patch(bold_style).fg(Color::Cyan),
        ))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

        let grade_area = centered(chunks[2], 7);
        Paragraph::new(Span::styled(
            snapshot.grade.to_string(),
            Style::default().patch(bold_style).fg(Color::Yellow),
        ))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL))
        .render(grade_area, buf);

        Paragraph::new(Span::styled("Performance Grade", cyan_style))
            .alignment(Alignment::Center)
            .render(chunks[3], buf);

        Paragraph::new(Span::styled(
            format!(
                "{} wpm   {}% acc   {} correct   {} errors",
                snapshot.wpm, snapshot.accuracy, snapshot.correct_count, snapshot.error_count
            ),
            bold_style,
        ))
        .alignment(Alignment::Center)
        .render(chunks[5], buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .title("Accuracy Distribution");
        let inner = block.inner(chunks[7]);
        block.render(chunks[7], buf);

        let (correct, errors) = distribution_widths(inner.width, snapshot.accuracy);
        Paragraph::new(Line::from(vec![
            Span::styled("█".repeat(correct as usize), Style::default().fg(Color::Green)),
            Span::styled("█".repeat(errors as usize), Style::default().fg(Color::Red)),
        ]))
        .render(inner, buf);

        Paragraph::new(Span::styled("(r)etry / (esc)ape", italic_style)).render(chunks[9], buf);
    }
}

fn centered(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.state {
            AppState::Typing => self.render_typing(area, buf),
            AppState::Results => self.render_results(area, buf),
        }
    }
}
