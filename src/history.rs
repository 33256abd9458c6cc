use chrono::{DateTime, Local};
use rusqlite::{params, Connection};
use thiserror::Error;

use crate::app_dirs::AppDirs;
use crate::session::SessionResult;
use crate::util::{mean, percentage, std_dev};

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history database error: {0}")]
    Db(#[from] rusqlite::Error),
    #[error("could not prepare history directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not export history: {0}")]
    Export(#[from] csv::Error),
}

/// One completed quiz run as stored on disk.
#[derive(Debug, Clone)]
pub struct AttemptRecord {
    pub id: i64,
    pub course: String,
    pub difficulty: String,
    pub score: i64,
    pub total_questions: i64,
    pub seconds_per_question: i64,
    pub time_spent_ms: i64,
    pub taken_at: DateTime<Local>,
}

impl AttemptRecord {
    pub fn success_rate_pct(&self) -> u32 {
        percentage(self.score.max(0) as usize, self.total_questions.max(0) as usize)
    }
}

/// Per-question row of a stored attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptQuestion {
    pub question: String,
    pub user_answer: Option<String>,
    pub correct_answer: String,
    pub was_correct: bool,
}

#[derive(Debug, Clone, Default)]
pub struct HistoryStats {
    pub total_quizzes: i64,
    pub average_score_pct: f64,
    pub latest_score_pct: f64,
    /// Standard deviation of attempt percentages; a consistency signal.
    pub score_spread: f64,
}

/// Aggregates behind the per-course charts (correct vs wrong, success rate).
#[derive(Debug, Clone, PartialEq)]
pub struct CourseSummary {
    pub course: String,
    pub attempts: i64,
    pub correct: i64,
    pub wrong: i64,
    pub success_rate_pct: u32,
}

/// Sqlite-backed store of quiz attempts
#[derive(Debug)]
pub struct HistoryDb {
    conn: Connection,
}

impl HistoryDb {
    /// Open (or create) the on-disk history database under the app state dir.
    pub fn new() -> Result<Self, HistoryError> {
        let db_path = AppDirs::db_path().unwrap_or_else(|| "swot_history.db".into());
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(&db_path)?;
        Self::init_schema(&conn)?;
        Ok(HistoryDb { conn })
    }

    /// In-memory database, used by tests.
    pub fn open_in_memory() -> Result<Self, HistoryError> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(HistoryDb { conn })
    }

    fn init_schema(conn: &Connection) -> Result<(), rusqlite::Error> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS attempts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                course TEXT NOT NULL,
                difficulty TEXT NOT NULL,
                score INTEGER NOT NULL,
                total_questions INTEGER NOT NULL,
                seconds_per_question INTEGER NOT NULL,
                time_spent_ms INTEGER NOT NULL,
                taken_at TEXT NOT NULL
            )
            "#,
            [],
        )?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS attempt_questions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                attempt_id INTEGER NOT NULL REFERENCES attempts(id),
                question TEXT NOT NULL,
                user_answer TEXT,
                correct_answer TEXT NOT NULL,
                was_correct BOOLEAN NOT NULL
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_attempts_course ON attempts(course)",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_attempt_questions_attempt ON attempt_questions(attempt_id)",
            [],
        )?;

        Ok(())
    }

    /// Persist one completed session with its per-question breakdown in a
    /// single transaction. Returns the attempt row id.
    pub fn record_attempt(
        &mut self,
        result: &SessionResult,
        seconds_per_question: u64,
    ) -> Result<i64, HistoryError> {
        let tx = self.conn.transaction()?;

        tx.execute(
            r#"
            INSERT INTO attempts
            (course, difficulty, score, total_questions, seconds_per_question, time_spent_ms, taken_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                result.course,
                result.difficulty.to_string(),
                result.score as i64,
                result.total_questions as i64,
                seconds_per_question as i64,
                result.time_spent_ms as i64,
                Local::now().to_rfc3339(),
            ],
        )?;
        let attempt_id = tx.last_insert_rowid();

        for pq in &result.per_question {
            tx.execute(
                r#"
                INSERT INTO attempt_questions
                (attempt_id, question, user_answer, correct_answer, was_correct)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![
                    attempt_id,
                    pq.question,
                    pq.user_answer.map(|a| a.to_string()),
                    pq.correct_answer.to_string(),
                    pq.is_correct,
                ],
            )?;
        }

        tx.commit()?;
        Ok(attempt_id)
    }

    /// Most recent attempts, newest first.
    pub fn recent_attempts(&self, limit: usize) -> Result<Vec<AttemptRecord>, HistoryError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, course, difficulty, score, total_questions,
                   seconds_per_question, time_spent_ms, taken_at
            FROM attempts
            ORDER BY taken_at DESC, id DESC
            LIMIT ?1
            "#,
        )?;

        let rows = stmt.query_map([limit.min(i64::MAX as usize) as i64], |row| {
            let taken_at_str: String = row.get(7)?;
            let taken_at = DateTime::parse_from_rfc3339(&taken_at_str)
                .map_err(|_| {
                    rusqlite::Error::InvalidColumnType(
                        7,
                        "taken_at".to_string(),
                        rusqlite::types::Type::Text,
                    )
                })?
                .with_timezone(&Local);

            Ok(AttemptRecord {
                id: row.get(0)?,
                course: row.get(1)?,
                difficulty: row.get(2)?,
                score: row.get(3)?,
                total_questions: row.get(4)?,
                seconds_per_question: row.get(5)?,
                time_spent_ms: row.get(6)?,
                taken_at,
            })
        })?;

        let mut attempts = Vec::new();
        for attempt in rows {
            attempts.push(attempt?);
        }
        Ok(attempts)
    }

    /// Breakdown rows for one stored attempt, in question order.
    pub fn attempt_questions(&self, attempt_id: i64) -> Result<Vec<AttemptQuestion>, HistoryError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT question, user_answer, correct_answer, was_correct
            FROM attempt_questions
            WHERE attempt_id = ?1
            ORDER BY id
            "#,
        )?;

        let rows = stmt.query_map([attempt_id], |row| {
            Ok(AttemptQuestion {
                question: row.get(0)?,
                user_answer: row.get(1)?,
                correct_answer: row.get(2)?,
                was_correct: row.get(3)?,
            })
        })?;

        let mut questions = Vec::new();
        for q in rows {
            questions.push(q?);
        }
        Ok(questions)
    }

    /// Headline numbers for the results and history screens.
    pub fn overall_stats(&self) -> Result<HistoryStats, HistoryError> {
        let percentages = self.attempt_percentages()?;
        Ok(HistoryStats {
            total_quizzes: percentages.len() as i64,
            average_score_pct: mean(&percentages).unwrap_or(0.0),
            latest_score_pct: percentages.last().copied().unwrap_or(0.0),
            score_spread: std_dev(&percentages).unwrap_or(0.0),
        })
    }

    /// Success percentage of every attempt, oldest first. Feeds the results
    /// chart and the overall stats.
    pub fn attempt_percentages(&self) -> Result<Vec<f64>, HistoryError> {
        let mut stmt = self.conn.prepare(
            "SELECT score, total_questions FROM attempts ORDER BY taken_at ASC, id ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            let score: i64 = row.get(0)?;
            let total: i64 = row.get(1)?;
            Ok(if total > 0 {
                score as f64 / total as f64 * 100.0
            } else {
                0.0
            })
        })?;

        let mut percentages = Vec::new();
        for p in rows {
            percentages.push(p?);
        }
        Ok(percentages)
    }

    /// Per-course aggregates, alphabetical by course.
    pub fn course_summary(&self) -> Result<Vec<CourseSummary>, HistoryError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT course,
                   COUNT(*) AS attempts,
                   SUM(score) AS correct,
                   SUM(total_questions - score) AS wrong,
                   SUM(total_questions) AS total
            FROM attempts
            GROUP BY course
            ORDER BY course
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            let correct: i64 = row.get(2)?;
            let total: i64 = row.get(4)?;
            Ok(CourseSummary {
                course: row.get(0)?,
                attempts: row.get(1)?,
                correct,
                wrong: row.get(3)?,
                success_rate_pct: percentage(correct.max(0) as usize, total.max(0) as usize),
            })
        })?;

        let mut summaries = Vec::new();
        for s in rows {
            summaries.push(s?);
        }
        Ok(summaries)
    }

    /// Dump every attempt as CSV, newest first. Returns the row count.
    pub fn export_csv<W: std::io::Write>(&self, writer: W) -> Result<usize, HistoryError> {
        let attempts = self.recent_attempts(usize::MAX)?;
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record([
            "taken_at",
            "course",
            "difficulty",
            "score",
            "total_questions",
            "success_rate_pct",
            "time_spent_secs",
        ])?;
        for a in &attempts {
            wtr.write_record([
                a.taken_at.to_rfc3339(),
                a.course.clone(),
                a.difficulty.clone(),
                a.score.to_string(),
                a.total_questions.to_string(),
                a.success_rate_pct().to_string(),
                (a.time_spent_ms / 1000).to_string(),
            ])?;
        }
        wtr.flush()?;
        Ok(attempts.len())
    }

    /// Wipe all stored attempts (for tests or an explicit reset).
    pub fn clear(&self) -> Result<(), HistoryError> {
        self.conn.execute("DELETE FROM attempt_questions", [])?;
        self.conn.execute("DELETE FROM attempts", [])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::AnswerLabel;
    use crate::session::{Difficulty, PerQuestion};

    fn result(course: &str, score: usize, total: usize) -> SessionResult {
        let per_question = (0..total)
            .map(|i| PerQuestion {
                question: format!("q{i}"),
                options: [
                    "1".to_string(),
                    "2".to_string(),
                    "3".to_string(),
                    "4".to_string(),
                ],
                correct_answer: AnswerLabel::A,
                user_answer: if i < score { Some(AnswerLabel::A) } else { None },
                is_correct: i < score,
            })
            .collect();
        SessionResult {
            score,
            total_questions: total,
            per_question,
            time_spent_ms: 42_000,
            difficulty: Difficulty::Medium,
            course: course.to_string(),
        }
    }

    #[test]
    fn record_and_read_back_attempt() {
        let mut db = HistoryDb::open_in_memory().unwrap();
        let id = db.record_attempt(&result("rust", 3, 5), 30).unwrap();

        let attempts = db.recent_attempts(10).unwrap();
        assert_eq!(attempts.len(), 1);
        let a = &attempts[0];
        assert_eq!(a.id, id);
        assert_eq!(a.course, "rust");
        assert_eq!(a.difficulty, "Medium");
        assert_eq!(a.score, 3);
        assert_eq!(a.total_questions, 5);
        assert_eq!(a.seconds_per_question, 30);
        assert_eq!(a.time_spent_ms, 42_000);
        assert_eq!(a.success_rate_pct(), 60);
    }

    #[test]
    fn per_question_rows_round_trip() {
        let mut db = HistoryDb::open_in_memory().unwrap();
        let id = db.record_attempt(&result("rust", 1, 2), 15).unwrap();

        let questions = db.attempt_questions(id).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].question, "q0");
        assert_eq!(questions[0].user_answer.as_deref(), Some("A"));
        assert!(questions[0].was_correct);
        assert_eq!(questions[1].user_answer, None);
        assert!(!questions[1].was_correct);
        assert_eq!(questions[1].correct_answer, "A");
    }

    #[test]
    fn overall_stats_track_average_and_latest() {
        let mut db = HistoryDb::open_in_memory().unwrap();
        db.record_attempt(&result("rust", 2, 4), 30).unwrap(); // 50%
        db.record_attempt(&result("rust", 4, 4), 30).unwrap(); // 100%

        let stats = db.overall_stats().unwrap();
        assert_eq!(stats.total_quizzes, 2);
        assert_eq!(stats.average_score_pct, 75.0);
        assert_eq!(stats.latest_score_pct, 100.0);
        assert_eq!(stats.score_spread, 25.0);
    }

    #[test]
    fn overall_stats_empty_db() {
        let db = HistoryDb::open_in_memory().unwrap();
        let stats = db.overall_stats().unwrap();
        assert_eq!(stats.total_quizzes, 0);
        assert_eq!(stats.average_score_pct, 0.0);
        assert_eq!(stats.latest_score_pct, 0.0);
    }

    #[test]
    fn course_summary_aggregates_per_course() {
        let mut db = HistoryDb::open_in_memory().unwrap();
        db.record_attempt(&result("algebra", 1, 4), 30).unwrap();
        db.record_attempt(&result("algebra", 3, 4), 30).unwrap();
        db.record_attempt(&result("rust", 4, 4), 30).unwrap();

        let summary = db.course_summary().unwrap();
        assert_eq!(summary.len(), 2);

        let algebra = &summary[0];
        assert_eq!(algebra.course, "algebra");
        assert_eq!(algebra.attempts, 2);
        assert_eq!(algebra.correct, 4);
        assert_eq!(algebra.wrong, 4);
        assert_eq!(algebra.success_rate_pct, 50);

        let rust = &summary[1];
        assert_eq!(rust.course, "rust");
        assert_eq!(rust.success_rate_pct, 100);
    }

    #[test]
    fn csv_export_includes_header_and_rows() {
        let mut db = HistoryDb::open_in_memory().unwrap();
        db.record_attempt(&result("rust", 3, 5), 30).unwrap();

        let mut out = Vec::new();
        let rows = db.export_csv(&mut out).unwrap();
        assert_eq!(rows, 1);

        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "taken_at,course,difficulty,score,total_questions,success_rate_pct,time_spent_secs"
        );
        let row = lines.next().unwrap();
        assert!(row.contains("rust"));
        assert!(row.contains(",3,5,60,42"));
    }

    #[test]
    fn clear_removes_everything() {
        let mut db = HistoryDb::open_in_memory().unwrap();
        let id = db.record_attempt(&result("rust", 3, 5), 30).unwrap();
        db.clear().unwrap();

        assert!(db.recent_attempts(10).unwrap().is_empty());
        assert!(db.attempt_questions(id).unwrap().is_empty());
        assert_eq!(db.overall_stats().unwrap().total_quizzes, 0);
    }
}
