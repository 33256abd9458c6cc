pub mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    fs::File,
    io::{self, stdin},
    path::PathBuf,
    sync::mpsc,
    thread,
    time::Duration,
};
use webbrowser::Browser;

use swot::assist::{EmitReport, ResultEmitter};
use swot::config::{Config, ConfigStore, FileConfigStore};
use swot::generator::{GeneratorConfig, QuestionGenerator};
use swot::history::{AttemptRecord, HistoryDb, HistoryStats};
use swot::question::{AnswerLabel, RawQuestion};
use swot::quiz::Quiz;
use swot::session::{Difficulty, SessionConfig};
use swot::TICK_RATE_MS;

/// terminal quiz runner with timed questions and tracked progress
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal quiz runner: timed multiple-choice sessions from embedded banks or AI-generated question sets, with attempt history, score trends, and an ai-assist handoff."
)]
pub struct Cli {
    /// number of questions in the quiz
    #[clap(short = 'n', long)]
    number_of_questions: Option<usize>,

    /// difficulty of the question set
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<Difficulty>,

    /// seconds allowed per question
    #[clap(short = 's', long)]
    seconds_per_question: Option<u64>,

    /// course label recorded with the attempt
    #[clap(short = 'c', long)]
    course: Option<String>,

    /// load the question set from a file (raw AI response text or a JSON array)
    #[clap(short = 'f', long)]
    questions_file: Option<PathBuf>,

    /// export attempt history as CSV to the given path and exit
    #[clap(long)]
    export_history: Option<PathBuf>,
}

impl Cli {
    /// Merge CLI flags over the persisted defaults.
    fn to_session_config(&self, defaults: &Config) -> SessionConfig {
        SessionConfig {
            number_of_questions: self
                .number_of_questions
                .unwrap_or(defaults.number_of_questions),
            difficulty: self.difficulty.unwrap_or(defaults.difficulty),
            seconds_per_question: self
                .seconds_per_question
                .unwrap_or(defaults.seconds_per_question),
            course: self
                .course
                .clone()
                .unwrap_or_else(|| defaults.course.clone()),
        }
    }

    fn to_generator_config(&self, session: &SessionConfig) -> GeneratorConfig {
        GeneratorConfig {
            number_of_questions: session.number_of_questions,
            difficulty: session.difficulty,
            questions_file: self.questions_file.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    Quiz,
    Results,
    History,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SortBy {
    Date,
    Score,
    Difficulty,
    Course,
}

#[derive(Debug)]
pub struct HistoryViewState {
    pub scroll_offset: usize,
    pub sort_by: SortBy,
    pub sort_ascending: bool,
    pub filter_difficulty: Option<String>,
    pub attempts: Vec<AttemptRecord>,
    pub stats: HistoryStats,
}

impl Default for HistoryViewState {
    fn default() -> Self {
        Self {
            scroll_offset: 0,
            sort_by: SortBy::Date,
            sort_ascending: false,
            filter_difficulty: None,
            attempts: vec![],
            stats: HistoryStats::default(),
        }
    }
}

#[derive(Debug)]
pub struct App {
    pub cli: Option<Cli>,
    pub session_config: SessionConfig,
    pub raw_set: Vec<RawQuestion>,
    pub quiz: Quiz,
    pub state: AppState,
    pub emitter: ResultEmitter,
    pub emit_report: Option<EmitReport>,
    pub chart_points: Vec<(f64, f64)>,
    pub history_view: HistoryViewState,
}

impl App {
    pub fn new(cli: Cli) -> Result<Self, Box<dyn Error>> {
        let store = FileConfigStore::new();
        let defaults = store.load();
        let session_config = cli.to_session_config(&defaults);
        // Persist the effective settings as the next run's defaults.
        if let Err(e) = store.save(&Config::from(&session_config)) {
            log::warn!("could not save config: {e}");
        }

        let generator = QuestionGenerator::new(cli.to_generator_config(&session_config));
        let raw_set = generator.generate()?;

        let app = Self::with_parts(Some(cli), session_config, raw_set, ResultEmitter::new())?;
        Ok(app)
    }

    /// Assemble an app from explicit parts; `new` wires the production ones.
    pub fn with_parts(
        cli: Option<Cli>,
        session_config: SessionConfig,
        raw_set: Vec<RawQuestion>,
        emitter: ResultEmitter,
    ) -> Result<Self, Box<dyn Error>> {
        let mut quiz = Quiz::new(session_config.clone());
        quiz.start(&raw_set)?;

        Ok(Self {
            cli,
            session_config,
            raw_set,
            quiz,
            state: AppState::Quiz,
            emitter,
            emit_report: None,
            chart_points: vec![],
            history_view: HistoryViewState::default(),
        })
    }

    /// Start over: same question set on retry, a fresh sample otherwise.
    pub fn reset(&mut self, regenerate: bool) {
        if regenerate {
            if let Some(cli) = self.cli.clone() {
                let generator =
                    QuestionGenerator::new(cli.to_generator_config(&self.session_config));
                match generator.generate() {
                    Ok(set) => self.raw_set = set,
                    Err(e) => {
                        log::warn!("could not generate a new question set, reusing previous: {e}")
                    }
                }
            }
        }

        self.quiz = Quiz::new(self.session_config.clone());
        if let Err(e) = self.quiz.start(&self.raw_set) {
            log::warn!("cached question set no longer valid: {e}");
        }
        self.state = AppState::Quiz;
        self.emit_report = None;
        self.history_view = HistoryViewState::default();
    }

    /// Completion hand-off: publish to history + ai-assist, refresh the
    /// trend chart, move to the results screen. Failures surface as the
    /// notice in the emit report, never as an error.
    fn on_completed(&mut self) {
        if let Some(result) = self.quiz.result() {
            self.emit_report = Some(
                self.emitter
                    .publish(&result, self.session_config.seconds_per_question),
            );
            if let Some(db) = self.emitter.history() {
                self.chart_points =
                    ui::charting::attempt_points(&db.attempt_percentages().unwrap_or_default());
            }
        }
        self.state = AppState::Results;
    }

    fn enter_history(&mut self) {
        if let Some(db) = self.emitter.history() {
            self.history_view.attempts = db.recent_attempts(200).unwrap_or_default();
            self.history_view.stats = db.overall_stats().unwrap_or_default();
        }
        self.history_view.scroll_offset = 0;
        self.state = AppState::History;
    }

    fn cycle_history_filter(&mut self) {
        self.history_view.filter_difficulty = match self.history_view.filter_difficulty.as_deref() {
            None => Some("Easy".to_string()),
            Some("Easy") => Some("Medium".to_string()),
            Some("Medium") => Some("Hard".to_string()),
            _ => None,
        };
        self.history_view.scroll_offset = 0;
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    // The export path runs headless; everything else needs a terminal.
    if let Some(path) = cli.export_history.clone() {
        let db = HistoryDb::new()?;
        let rows = db.export_csv(File::create(&path)?)?;
        println!("exported {} attempts to {}", rows, path.display());
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let mut app = match App::new(cli) {
        Ok(app) => app,
        Err(e) => {
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::InvalidValue, format!("could not start quiz: {e}"))
                .exit();
        }
    };

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    start_tui(&mut terminal, &mut app)?;
    app.quiz.dispose();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    Ok(())
}

#[derive(Debug)]
enum ExitType {
    Restart,
    New,
    Quit,
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    mut app: &mut App,
) -> Result<(), Box<dyn Error>> {
    let quiz_events = get_quiz_events();

    loop {
        let mut exit_type: ExitType = ExitType::Quit;
        terminal.draw(|f| ui(app, f))?;

        loop {
            let app = &mut app;

            match quiz_events.recv()? {
                QuizLoopEvent::Tick => {
                    if app.state == AppState::Quiz {
                        app.quiz.on_tick();
                        if app.quiz.has_finished() {
                            app.on_completed();
                        }
                        terminal.draw(|f| ui(app, f))?;
                    }
                }
                QuizLoopEvent::Resize => {
                    terminal.draw(|f| ui(app, f))?;
                }
                QuizLoopEvent::Key(key) => {
                    if key.modifiers.contains(KeyModifiers::CONTROL)
                        && key.code == KeyCode::Char('c')
                    {
                        break;
                    }
                    match key.code {
                        KeyCode::Esc => {
                            break;
                        }
                        _ => match app.state {
                            AppState::Quiz => handle_quiz_key(app, key),
                            AppState::Results => {
                                if let Some(exit) = handle_results_key(app, key) {
                                    exit_type = exit;
                                    break;
                                }
                            }
                            AppState::History => {
                                if let Some(exit) = handle_history_key(app, key) {
                                    exit_type = exit;
                                    break;
                                }
                            }
                        },
                    }
                    terminal.draw(|f| ui(app, f))?;
                }
            }
        }

        match exit_type {
            ExitType::Restart => {
                app.reset(false);
            }
            ExitType::New => {
                app.reset(true);
            }
            ExitType::Quit => {
                break;
            }
        }
    }

    Ok(())
}

fn answer_for_key(c: char) -> Option<AnswerLabel> {
    match c {
        'a'..='d' => AnswerLabel::from_index(c as usize - 'a' as usize),
        'A'..='D' => AnswerLabel::from_index(c as usize - 'A' as usize),
        '1'..='4' => AnswerLabel::from_index(c as usize - '1' as usize),
        _ => None,
    }
}

fn handle_quiz_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char(c) => {
            if let Some(label) = answer_for_key(c) {
                app.quiz.select_answer(label);
            }
        }
        KeyCode::Left => {
            app.quiz.retreat();
        }
        KeyCode::Right => {
            if app.quiz.advance() && app.quiz.has_finished() {
                app.on_completed();
            }
        }
        KeyCode::Enter => {
            let moved = if app.quiz.is_last_question() {
                app.quiz.finish()
            } else {
                app.quiz.advance()
            };
            if moved && app.quiz.has_finished() {
                app.on_completed();
            }
        }
        _ => {}
    }
}

fn handle_results_key(app: &mut App, key: KeyEvent) -> Option<ExitType> {
    match key.code {
        KeyCode::Char('r') => return Some(ExitType::Restart),
        KeyCode::Char('n') => return Some(ExitType::New),
        KeyCode::Char('h') => app.enter_history(),
        KeyCode::Char('t') => {
            if let Some(result) = app.quiz.result() {
                if Browser::is_available() {
                    webbrowser::open(&format!(
                        "https://twitter.com/intent/tweet?text={}%2F{}%20({}%25)%20on%20a%20{}%20quiz%20with%20swot",
                        result.score,
                        result.total_questions,
                        result.percentage(),
                        result.difficulty,
                    ))
                    .unwrap_or_default();
                }
            }
        }
        _ => {}
    }
    None
}

fn handle_history_key(app: &mut App, key: KeyEvent) -> Option<ExitType> {
    match key.code {
        KeyCode::Char('r') => return Some(ExitType::Restart),
        KeyCode::Char('n') => return Some(ExitType::New),
        KeyCode::Char('b') | KeyCode::Backspace => {
            app.state = AppState::Results;
        }
        KeyCode::Up => {
            app.history_view.scroll_offset = app.history_view.scroll_offset.saturating_sub(1);
        }
        KeyCode::Down => {
            // Clamped against the row count in the render function
            app.history_view.scroll_offset += 1;
        }
        KeyCode::PageUp => {
            app.history_view.scroll_offset = app.history_view.scroll_offset.saturating_sub(10);
        }
        KeyCode::PageDown => {
            app.history_view.scroll_offset += 10;
        }
        KeyCode::Home => {
            app.history_view.scroll_offset = 0;
        }
        KeyCode::Char('1') => {
            app.history_view.sort_by = SortBy::Date;
            app.history_view.scroll_offset = 0;
        }
        KeyCode::Char('2') => {
            app.history_view.sort_by = SortBy::Score;
            app.history_view.scroll_offset = 0;
        }
        KeyCode::Char('3') => {
            app.history_view.sort_by = SortBy::Difficulty;
            app.history_view.scroll_offset = 0;
        }
        KeyCode::Char('4') => {
            app.history_view.sort_by = SortBy::Course;
            app.history_view.scroll_offset = 0;
        }
        KeyCode::Char(' ') => {
            app.history_view.sort_ascending = !app.history_view.sort_ascending;
            app.history_view.scroll_offset = 0;
        }
        KeyCode::Char('f') => {
            app.cycle_history_filter();
        }
        _ => {}
    }
    None
}

#[derive(Clone)]
enum QuizLoopEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

fn get_quiz_events() -> mpsc::Receiver<QuizLoopEvent> {
    let (tx, rx) = mpsc::channel();

    let tick_tx = tx.clone();
    thread::spawn(move || loop {
        if tick_tx.send(QuizLoopEvent::Tick).is_err() {
            break;
        }

        thread::sleep(Duration::from_millis(TICK_RATE_MS))
    });

    thread::spawn(move || loop {
        let evt = match event::read() {
            Ok(Event::Key(key)) => Some(QuizLoopEvent::Key(key)),
            Ok(Event::Resize(_, _)) => Some(QuizLoopEvent::Resize),
            Ok(_) => None,
            Err(_) => break,
        };

        if let Some(evt) = evt {
            if tx.send(evt).is_err() {
                break;
            }
        }
    });

    rx
}

fn ui(app: &mut App, f: &mut Frame) {
    match app.state {
        AppState::Quiz | AppState::Results => {
            f.render_widget(&*app, f.area());
        }
        AppState::History => {
            ui::history_view::render_history(app, f);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use swot::assist::HandoffStore;

    fn raw(text: &str, correct: &str) -> RawQuestion {
        RawQuestion {
            question: text.to_string(),
            options: vec![
                "one".to_string(),
                "two".to_string(),
                "three".to_string(),
                "four".to_string(),
            ],
            correct_answer: correct.to_string(),
        }
    }

    fn test_app(raw_set: Vec<RawQuestion>) -> (App, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = HandoffStore::with_path(dir.path().join("handoff.json"));
        let emitter =
            ResultEmitter::with_parts(Some(HistoryDb::open_in_memory().unwrap()), store);
        let app = App::with_parts(None, SessionConfig::default(), raw_set, emitter).unwrap();
        (app, dir)
    }

    #[test]
    fn test_cli_defaults_are_all_optional() {
        let cli = Cli::parse_from(["swot"]);

        assert_eq!(cli.number_of_questions, None);
        assert_eq!(cli.difficulty, None);
        assert_eq!(cli.seconds_per_question, None);
        assert_eq!(cli.course, None);
        assert_eq!(cli.questions_file, None);
        assert_eq!(cli.export_history, None);
    }

    #[test]
    fn test_cli_flag_parsing() {
        let cli = Cli::parse_from(["swot", "-n", "10", "-d", "hard", "-s", "15", "-c", "rust"]);
        assert_eq!(cli.number_of_questions, Some(10));
        assert_eq!(cli.difficulty, Some(Difficulty::Hard));
        assert_eq!(cli.seconds_per_question, Some(15));
        assert_eq!(cli.course.as_deref(), Some("rust"));

        let cli = Cli::parse_from(["swot", "--questions-file", "set.json"]);
        assert_eq!(cli.questions_file, Some(PathBuf::from("set.json")));

        let cli = Cli::parse_from(["swot", "--export-history", "out.csv"]);
        assert_eq!(cli.export_history, Some(PathBuf::from("out.csv")));
    }

    #[test]
    fn test_cli_overrides_persisted_defaults() {
        let defaults = Config {
            number_of_questions: 8,
            difficulty: Difficulty::Easy,
            seconds_per_question: 45,
            course: "networks".into(),
        };

        let cli = Cli::parse_from(["swot", "-n", "3"]);
        let session = cli.to_session_config(&defaults);
        assert_eq!(session.number_of_questions, 3);
        assert_eq!(session.difficulty, Difficulty::Easy);
        assert_eq!(session.seconds_per_question, 45);
        assert_eq!(session.course, "networks");
    }

    #[test]
    fn test_generator_config_follows_session() {
        let cli = Cli::parse_from(["swot", "-f", "set.json"]);
        let session = SessionConfig {
            number_of_questions: 7,
            difficulty: Difficulty::Hard,
            ..SessionConfig::default()
        };
        let config = cli.to_generator_config(&session);
        assert_eq!(config.number_of_questions, 7);
        assert_eq!(config.difficulty, Difficulty::Hard);
        assert_eq!(config.questions_file, Some(PathBuf::from("set.json")));
    }

    #[test]
    fn test_app_starts_in_quiz_state() {
        let (app, _dir) = test_app(vec![raw("q1", "A"), raw("q2", "B")]);

        assert_eq!(app.state, AppState::Quiz);
        assert!(app.quiz.has_started());
        assert!(!app.quiz.has_finished());
        assert_eq!(app.quiz.questions().len(), 2);
    }

    #[test]
    fn test_app_rejects_malformed_set() {
        let dir = tempfile::tempdir().unwrap();
        let store = HandoffStore::with_path(dir.path().join("handoff.json"));
        let emitter = ResultEmitter::with_parts(None, store);
        let mut bad = raw("q", "A");
        bad.options.truncate(2);

        let result = App::with_parts(None, SessionConfig::default(), vec![bad], emitter);
        assert!(result.is_err());
    }

    #[test]
    fn test_completion_publishes_and_moves_to_results() {
        let (mut app, _dir) = test_app(vec![raw("q1", "A")]);

        app.quiz.select_answer(AnswerLabel::A);
        assert!(app.quiz.finish());
        assert!(app.quiz.has_finished());
        app.on_completed();

        assert_eq!(app.state, AppState::Results);
        let report = app.emit_report.unwrap();
        assert!(report.history_saved);
        assert!(report.handoff_saved);
        assert_eq!(app.chart_points, vec![(1.0, 100.0)]);
    }

    #[test]
    fn test_enter_history_loads_attempts_and_stats() {
        let (mut app, _dir) = test_app(vec![raw("q1", "A")]);

        app.quiz.select_answer(AnswerLabel::A);
        app.quiz.finish();
        app.on_completed();

        app.enter_history();
        assert_eq!(app.state, AppState::History);
        assert_eq!(app.history_view.attempts.len(), 1);
        assert_eq!(app.history_view.stats.total_quizzes, 1);
        assert_eq!(app.history_view.stats.latest_score_pct, 100.0);
    }

    #[test]
    fn test_reset_restarts_with_same_set() {
        let (mut app, _dir) = test_app(vec![raw("q1", "A"), raw("q2", "B")]);

        app.quiz.select_answer(AnswerLabel::C);
        app.quiz.advance();
        app.reset(false);

        assert_eq!(app.state, AppState::Quiz);
        assert_eq!(app.quiz.current_index(), 0);
        assert!(!app.quiz.has_finished());
        assert_eq!(app.quiz.questions().len(), 2);
        assert!(app.quiz.current_state().unwrap().user_answer.is_none());
        assert!(app.emit_report.is_none());
    }

    #[test]
    fn test_answer_for_key_accepts_letters_and_digits() {
        assert_eq!(answer_for_key('a'), Some(AnswerLabel::A));
        assert_eq!(answer_for_key('D'), Some(AnswerLabel::D));
        assert_eq!(answer_for_key('2'), Some(AnswerLabel::B));
        assert_eq!(answer_for_key('e'), None);
        assert_eq!(answer_for_key('5'), None);
    }

    #[test]
    fn test_quiz_keys_drive_session() {
        let (mut app, _dir) = test_app(vec![raw("q1", "A"), raw("q2", "B")]);

        handle_quiz_key(&mut app, KeyEvent::new(KeyCode::Char('b'), KeyModifiers::NONE));
        assert_eq!(
            app.quiz.current_state().unwrap().user_answer,
            Some(AnswerLabel::B)
        );

        handle_quiz_key(&mut app, KeyEvent::new(KeyCode::Right, KeyModifiers::NONE));
        assert_eq!(app.quiz.current_index(), 1);

        app.quiz.on_tick();
        handle_quiz_key(&mut app, KeyEvent::new(KeyCode::Left, KeyModifiers::NONE));
        assert_eq!(app.quiz.current_index(), 0);
    }

    #[test]
    fn test_finish_key_on_last_question_completes() {
        let (mut app, _dir) = test_app(vec![raw("q1", "A")]);

        handle_quiz_key(&mut app, KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE));
        handle_quiz_key(&mut app, KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));

        assert_eq!(app.state, AppState::Results);
        assert_eq!(app.quiz.result().unwrap().score, 1);
    }

    #[test]
    fn test_history_keys_sort_scroll_and_filter() {
        let (mut app, _dir) = test_app(vec![raw("q1", "A")]);
        app.state = AppState::History;

        handle_history_key(&mut app, KeyEvent::new(KeyCode::Char('2'), KeyModifiers::NONE));
        assert_eq!(app.history_view.sort_by, SortBy::Score);

        handle_history_key(&mut app, KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE));
        assert!(app.history_view.sort_ascending);

        handle_history_key(&mut app, KeyEvent::new(KeyCode::Down, KeyModifiers::NONE));
        assert_eq!(app.history_view.scroll_offset, 1);
        handle_history_key(&mut app, KeyEvent::new(KeyCode::Home, KeyModifiers::NONE));
        assert_eq!(app.history_view.scroll_offset, 0);

        handle_history_key(&mut app, KeyEvent::new(KeyCode::Char('f'), KeyModifiers::NONE));
        assert_eq!(app.history_view.filter_difficulty.as_deref(), Some("Easy"));
        handle_history_key(&mut app, KeyEvent::new(KeyCode::Char('f'), KeyModifiers::NONE));
        assert_eq!(app.history_view.filter_difficulty.as_deref(), Some("Medium"));

        handle_history_key(&mut app, KeyEvent::new(KeyCode::Char('b'), KeyModifiers::NONE));
        assert_eq!(app.state, AppState::Results);
    }

    #[test]
    fn test_ui_renders_question_screen() {
        use ratatui::{backend::TestBackend, Terminal};

        let (mut app, _dir) = test_app(vec![raw("what is a lifetime?", "A")]);

        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| ui(&mut app, f)).unwrap();

        let buffer = terminal.backend().buffer();
        let content: String = buffer.content.iter().map(|c| c.symbol()).collect();
        assert!(content.contains("what is a lifetime?"));
        assert!(content.contains("Question 1 of 1"));
    }

    #[test]
    fn test_ui_renders_results_screen() {
        use ratatui::{backend::TestBackend, Terminal};

        let (mut app, _dir) = test_app(vec![raw("q1", "A")]);
        app.quiz.select_answer(AnswerLabel::A);
        app.quiz.finish();
        app.on_completed();

        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| ui(&mut app, f)).unwrap();

        let buffer = terminal.backend().buffer();
        let content: String = buffer.content.iter().map(|c| c.symbol()).collect();
        assert!(content.contains("1/1 correct"));
    }

    #[test]
    fn test_ui_renders_history_screen() {
        use ratatui::{backend::TestBackend, Terminal};

        let (mut app, _dir) = test_app(vec![raw("q1", "A")]);
        app.quiz.select_answer(AnswerLabel::A);
        app.quiz.finish();
        app.on_completed();
        app.enter_history();

        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| ui(&mut app, f)).unwrap();

        let buffer = terminal.backend().buffer();
        let content: String = buffer.content.iter().map(|c| c.symbol()).collect();
        assert!(content.contains("Quiz History"));
    }

    #[test]
    fn test_history_view_state_default() {
        let state = HistoryViewState::default();
        assert_eq!(state.scroll_offset, 0);
        assert_eq!(state.sort_by, SortBy::Date);
        assert!(!state.sort_ascending);
        assert_eq!(state.filter_difficulty, None);
    }

    #[test]
    fn test_tick_rate_constant() {
        assert_eq!(TICK_RATE_MS, 250);
        const _: () = assert!(TICK_RATE_MS > 0);
        const _: () = assert!(TICK_RATE_MS <= 1000); // Should be sub-second
    }

    #[test]
    fn test_exit_type_debug() {
        assert_eq!(format!("{:?}", ExitType::Restart), "Restart");
        assert_eq!(format!("{:?}", ExitType::New), "New");
        assert_eq!(format!("{:?}", ExitType::Quit), "Quit");
    }
}
