pub mod charting;
pub mod history_view;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Axis, Chart, Dataset, GraphType, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use swot::question::AnswerLabel;
use swot::quiz::Phase;
use swot::util::format_time_spent;

use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.quiz.phase() {
            Phase::InProgress => render_question(self, area, buf),
            Phase::Completed => render_results(self, area, buf),
            Phase::NotStarted => {
                let waiting = Paragraph::new(Span::styled(
                    "Preparing quiz...",
                    Style::default().add_modifier(Modifier::ITALIC),
                ))
                .alignment(Alignment::Center);
                waiting.render(area, buf);
            }
        }
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.to_string().width();
        if used + w + 1 > max_width {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}

fn render_question(app: &App, area: Rect, buf: &mut Buffer) {
    let quiz = &app.quiz;
    let (Some(question), Some(state)) = (quiz.current_question(), quiz.current_state()) else {
        return;
    };

    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_style = Style::default().add_modifier(Modifier::DIM);
    let green_bold_style = Style::default().patch(bold_style).fg(Color::Green);
    let red_bold_style = Style::default().patch(bold_style).fg(Color::Red);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(10);
    let mut question_lines =
        ((question.text.width() as f64 / max_chars_per_line as f64).ceil() + 1.0) as u16;
    if question.text.width() <= max_chars_per_line as usize {
        question_lines = 1;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints(
            [
                Constraint::Length(2),                  // countdown
                Constraint::Length(2),                  // header
                Constraint::Length(question_lines + 1), // question text
                Constraint::Length(9),                  // options
                Constraint::Length(2),                  // reveal / frozen notice
                Constraint::Min(0),
                Constraint::Length(1), // key hints
            ]
            .as_ref(),
        )
        .split(area);

    let seconds = quiz.display_seconds();
    let timer_style = if !state.viewed && seconds <= 5 {
        Style::default().patch(bold_style).fg(Color::Red)
    } else if !state.viewed && seconds <= 10 {
        Style::default().patch(bold_style).fg(Color::Yellow)
    } else {
        Style::default().patch(bold_style).add_modifier(Modifier::DIM)
    };
    Paragraph::new(Span::styled(format!("{}s", seconds), timer_style))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    let header = format!(
        "Question {} of {} · {} · {}",
        quiz.current_index() + 1,
        quiz.questions().len(),
        quiz.config.difficulty,
        quiz.config.course,
    );
    Paragraph::new(Span::styled(header, dim_style))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    Paragraph::new(Span::styled(question.text.clone(), bold_style))
        .alignment(if question_lines == 1 {
            Alignment::Center
        } else {
            Alignment::Left
        })
        .wrap(Wrap { trim: true })
        .render(chunks[2], buf);

    // Correct answer is revealed once the clock is gone: expiry, or a frozen
    // revisited question. An active selection is only highlighted.
    let reveal = state.viewed && seconds == 0;
    let mut option_lines: Vec<Line> = Vec::with_capacity(8);
    for label in AnswerLabel::ALL {
        let selected = state.user_answer == Some(label);
        let is_correct = question.correct == label;
        let style = if reveal && is_correct {
            green_bold_style
        } else if reveal && selected {
            red_bold_style
        } else if selected {
            Style::default()
                .patch(bold_style)
                .fg(Color::Cyan)
                .add_modifier(Modifier::UNDERLINED)
        } else {
            Style::default()
        };
        let marker = if reveal && is_correct {
            "✓ "
        } else if reveal && selected {
            "✗ "
        } else {
            "  "
        };
        option_lines.push(Line::from(Span::styled(
            format!("{}{}) {}", marker, label, question.option(label)),
            style,
        )));
        option_lines.push(Line::default());
    }
    Paragraph::new(option_lines)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true })
        .render(chunks[3], buf);

    let notice = if quiz.is_revealing() {
        Span::styled(
            "Time's up!",
            Style::default().patch(red_bold_style).patch(italic_style),
        )
    } else if state.viewed && !state.time_expired && seconds == 0 {
        Span::styled(
            "Answered earlier, use the arrows to navigate",
            dim_style.patch(italic_style),
        )
    } else {
        Span::raw("")
    };
    Paragraph::new(notice)
        .alignment(Alignment::Center)
        .render(chunks[4], buf);

    let hint = if quiz.is_last_question() {
        "(a-d) answer · (←) previous · (enter) finish quiz · (esc) quit"
    } else {
        "(a-d) answer · (←) previous · (→/enter) next · (esc) quit"
    };
    Paragraph::new(Span::styled(hint, dim_style.patch(italic_style)))
        .alignment(Alignment::Center)
        .render(chunks[6], buf);
}

fn render_results(app: &App, area: Rect, buf: &mut Buffer) {
    let Some(result) = app.quiz.result() else {
        return;
    };

    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_style = Style::default().add_modifier(Modifier::DIM);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);
    let magenta_style = Style::default().fg(Color::Magenta);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints(
            [
                Constraint::Min(5),    // score trend chart
                Constraint::Length(1), // headline
                Constraint::Length(1), // message
                Constraint::Length(1), // meta
                Constraint::Length(1), // persistence notice
                Constraint::Length(1), // padding
                Constraint::Length(result.per_question.len().min(10) as u16 + 1),
                Constraint::Length(1), // legend
            ]
            .as_ref(),
        )
        .split(area);

    if app.chart_points.len() > 1 {
        let (max_attempt, max_pct) = charting::compute_chart_params(&app.chart_points);
        let datasets = vec![Dataset::default()
            .marker(ratatui::symbols::Marker::Braille)
            .style(magenta_style)
            .graph_type(GraphType::Line)
            .data(&app.chart_points)];
        let chart = Chart::new(datasets)
            .x_axis(
                Axis::default()
                    .title("attempt")
                    .bounds([1.0, max_attempt])
                    .labels(vec![
                        Span::styled("1", bold_style),
                        Span::styled(charting::format_label(max_attempt), bold_style),
                    ]),
            )
            .y_axis(
                Axis::default()
                    .title("score %")
                    .bounds([0.0, max_pct])
                    .labels(vec![
                        Span::styled("0", bold_style),
                        Span::styled(charting::format_label(max_pct), bold_style),
                    ]),
            );
        chart.render(chunks[0], buf);
    } else {
        Paragraph::new(Span::styled(
            "Complete more quizzes to see your score trend",
            dim_style.patch(italic_style),
        ))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);
    }

    Paragraph::new(Span::styled(
        format!(
            "{}/{} correct · {}%",
            result.score,
            result.total_questions,
            result.percentage()
        ),
        bold_style,
    ))
    .alignment(Alignment::Center)
    .render(chunks[1], buf);

    Paragraph::new(Span::styled(result.summary_message(), italic_style))
        .alignment(Alignment::Center)
        .render(chunks[2], buf);

    Paragraph::new(Span::styled(
        format!(
            "{} · {} · {}",
            result.difficulty,
            result.course,
            format_time_spent(result.time_spent_ms)
        ),
        dim_style,
    ))
    .alignment(Alignment::Center)
    .render(chunks[3], buf);

    let notice = match app.emit_report {
        Some(report) if !report.history_saved => Span::styled(
            "history could not be saved; this result is kept for the session only",
            Style::default().fg(Color::Yellow),
        ),
        Some(report) if !report.handoff_saved => Span::styled(
            "ai-assist handoff could not be written",
            Style::default().fg(Color::Yellow),
        ),
        Some(_) => Span::styled("saved · handoff written for ai-assist", dim_style),
        None => Span::raw(""),
    };
    Paragraph::new(notice)
        .alignment(Alignment::Center)
        .render(chunks[4], buf);

    let width = chunks[6].width.saturating_sub(2) as usize;
    let breakdown: Vec<Line> = result
        .per_question
        .iter()
        .enumerate()
        .take(10)
        .map(|(i, pq)| {
            let outcome = match (pq.is_correct, pq.user_answer) {
                (true, _) => format!("✓ {}. {}", i + 1, pq.question),
                (false, Some(answer)) => format!(
                    "✗ {}. {} (you: {}, correct: {})",
                    i + 1,
                    pq.question,
                    answer,
                    pq.correct_answer
                ),
                (false, None) => format!(
                    "✗ {}. {} (unanswered, correct: {})",
                    i + 1,
                    pq.question,
                    pq.correct_answer
                ),
            };
            let style = if pq.is_correct {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::Red)
            };
            Line::from(Span::styled(truncate_to_width(&outcome, width), style))
        })
        .collect();
    Paragraph::new(breakdown)
        .alignment(Alignment::Left)
        .render(chunks[6], buf);

    Paragraph::new(Span::styled(
        "(r)etry (n)ew quiz (h)istory (t)weet (esc)ape",
        dim_style.patch(italic_style),
    ))
    .alignment(Alignment::Center)
    .render(chunks[7], buf);
}
