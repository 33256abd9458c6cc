use itertools::Itertools;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use time_humanize::{Accuracy, HumanTime, Tense};

use swot::history::AttemptRecord;
use swot::session::performance_level;
use swot::util::format_time_spent;

use crate::{App, SortBy};

/// Pure presenter for a single attempt row
pub fn present_row(attempt: &AttemptRecord) -> Row<'static> {
    let success = attempt.success_rate_pct();
    let success_color = if success >= 70 {
        Color::Green
    } else if success >= 50 {
        Color::Yellow
    } else {
        Color::Red
    };

    let age_secs = (chrono::Local::now() - attempt.taken_at).num_seconds().max(0) as u64;
    let when = HumanTime::from(std::time::Duration::from_secs(age_secs))
        .to_text_en(Accuracy::Rough, Tense::Past);

    Row::new(vec![
        Cell::from(attempt.course.clone()),
        Cell::from(attempt.difficulty.clone()),
        Cell::from(format!("{}/{}", attempt.score, attempt.total_questions)),
        Cell::from(format!("{}%", success)).style(Style::default().fg(success_color)),
        Cell::from(format_time_spent(attempt.time_spent_ms.max(0) as u64)),
        Cell::from(when),
    ])
}

/// Attempts visible under the current filter, in the current sort order.
pub fn visible_attempts(app: &App) -> Vec<AttemptRecord> {
    let view = &app.history_view;
    view.attempts
        .iter()
        .filter(|a| {
            view.filter_difficulty
                .as_ref()
                .map(|d| a.difficulty == *d)
                .unwrap_or(true)
        })
        .cloned()
        .sorted_by(|a, b| {
            let ord = match view.sort_by {
                SortBy::Date => a.taken_at.cmp(&b.taken_at),
                SortBy::Score => a.success_rate_pct().cmp(&b.success_rate_pct()),
                SortBy::Difficulty => a.difficulty.cmp(&b.difficulty),
                SortBy::Course => a.course.cmp(&b.course),
            };
            if view.sort_ascending {
                ord
            } else {
                ord.reverse()
            }
        })
        .collect()
}

pub fn render_history(app: &mut App, f: &mut Frame) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3), // title
            Constraint::Length(3), // headline stats
            Constraint::Min(0),    // attempts table
            Constraint::Length(4), // instructions
        ])
        .split(area);

    let sort_direction = if app.history_view.sort_ascending {
        "↑"
    } else {
        "↓"
    };
    let sort_by_text = match app.history_view.sort_by {
        SortBy::Date => "Date",
        SortBy::Score => "Score",
        SortBy::Difficulty => "Difficulty",
        SortBy::Course => "Course",
    };
    let filter_text = app
        .history_view
        .filter_difficulty
        .clone()
        .unwrap_or_else(|| "All".to_string());

    let title = Paragraph::new(format!(
        "Quiz History (Sort: {} {} | Filter: {})",
        sort_by_text, sort_direction, filter_text
    ))
    .block(Block::default().borders(Borders::ALL).title("History"))
    .style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
    .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    let stats = &app.history_view.stats;
    let headline = format!(
        "{} quizzes · avg {:.0}% · latest {:.0}% ({}) · spread {:.1}",
        stats.total_quizzes,
        stats.average_score_pct,
        stats.latest_score_pct,
        performance_level(stats.latest_score_pct.round() as u32),
        stats.score_spread,
    );
    let headline = Paragraph::new(headline)
        .block(Block::default().borders(Borders::ALL).title("Overall"))
        .alignment(Alignment::Center);
    f.render_widget(headline, chunks[1]);

    let attempts = visible_attempts(app);
    if attempts.is_empty() {
        let no_data = Paragraph::new("No quiz attempts found yet.\nComplete a quiz to start building your history!")
            .block(Block::default().borders(Borders::ALL).title("No Data"))
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center);
        f.render_widget(no_data, chunks[2]);
    } else {
        let table_height = chunks[2].height.saturating_sub(3) as usize;
        let max_scroll = attempts.len().saturating_sub(table_height);
        if app.history_view.scroll_offset > max_scroll {
            app.history_view.scroll_offset = max_scroll;
        }

        let header = Row::new(vec![
            Cell::from("Course"),
            Cell::from("Difficulty"),
            Cell::from("Score"),
            Cell::from("Success"),
            Cell::from("Time"),
            Cell::from("When"),
        ])
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

        let visible_rows: Vec<Row> = attempts
            .iter()
            .skip(app.history_view.scroll_offset)
            .take(table_height)
            .map(present_row)
            .collect();

        let scroll_info = if attempts.len() > table_height {
            format!(
                " ({}/{} rows)",
                app.history_view.scroll_offset + visible_rows.len().min(table_height),
                attempts.len()
            )
        } else {
            String::new()
        };

        let table = Table::new(
            visible_rows,
            &[
                Constraint::Min(16),
                Constraint::Length(10),
                Constraint::Length(7),
                Constraint::Length(8),
                Constraint::Length(14),
                Constraint::Length(22),
            ],
        )
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Attempts{}", scroll_info)),
        )
        .row_highlight_style(Style::default().bg(Color::DarkGray));

        f.render_widget(table, chunks[2]);
    }

    let instructions = Paragraph::new(
        "Sort: (1)Date (2)Score (3)Difficulty (4)Course | (Space)Toggle | (f)ilter difficulty\n↑/↓ PgUp/PgDn scroll | (b)ack (esc)ape",
    )
    .block(Block::default().borders(Borders::ALL))
    .style(Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC))
    .alignment(Alignment::Center);
    f.render_widget(instructions, chunks[3]);
}
