//! # health-quiz
//!
//! A terminal multiple-choice quiz: pick a topic module, answer its
//! questions in any order, and get a scored review at the end. Per-user,
//! per-module progress is kept in a JSON file between runs.
//!
//! The quiz core ([`session`], [`progress`], [`data`]) never draws
//! anything; the terminal front end reads its state and drives its
//! transitions.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use health_quiz::{ConfigLoader, Quiz, QuizError};
//!
//! fn main() -> Result<(), QuizError> {
//!     let config = ConfigLoader::load(None)?;
//!     let quiz = Quiz::from_config(config, None, None)?;
//!     quiz.run()?;
//!     Ok(())
//! }
//! ```

mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod models;
pub mod progress;
pub mod session;
pub mod terminal;
mod ui;

use std::path::PathBuf;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub use app::App;
pub use config::{ConfigLoader, QuizConfig};
pub use data::{QuestionRepository, load_questions_from_json};
pub use error::{ConfigError, LoadError, NoQuestionsError, QuizError, StoreError};
pub use models::{Module, Question, QuestionType, Screen};
pub use progress::{DEFAULT_USER, JsonFileBackend, MemoryBackend, ProgressBackend, ProgressStore};
pub use session::{QuizMachine, Review, Session, format_time};

/// A quiz instance that can be run in the terminal.
pub struct Quiz<B: ProgressBackend = JsonFileBackend> {
    app: App<B>,
}

impl Quiz<JsonFileBackend> {
    /// Loads every module's questions and opens the progress file.
    ///
    /// `data_dir` defaults to the platform data directory; `user` preselects
    /// the name shown on the login screen.
    pub fn from_config(
        config: QuizConfig,
        data_dir: Option<PathBuf>,
        user: Option<String>,
    ) -> Result<Self, QuizError> {
        let repo = QuestionRepository::load(&config)?;

        let data_dir = data_dir.unwrap_or_else(JsonFileBackend::default_data_dir);
        let backend = JsonFileBackend::for_storage_key(&data_dir, &config.storage_key);
        tracing::info!(path = %backend.path().display(), "using progress file");

        let user = user.unwrap_or_else(|| DEFAULT_USER.to_string());
        let store = ProgressStore::open(backend, user, config.module_ids());
        Ok(Self::new(App::new(config, repo, store)))
    }
}

impl<B: ProgressBackend> Quiz<B> {
    pub fn new(app: App<B>) -> Self {
        Self { app }
    }

    /// Run the quiz in the terminal.
    ///
    /// This will take over the terminal, display the quiz UI, and return
    /// when the user quits. A session still running at that point is saved
    /// so it can be continued next time.
    pub fn run(mut self) -> Result<(), QuizError> {
        let shutdown = terminal::ShutdownSignal::register()?;
        let mut guard = terminal::TerminalGuard::new()?;
        let result = run_event_loop(guard.terminal(), &mut self.app, &shutdown);
        if !self.app.should_quit() {
            self.app.exit();
        }
        drop(guard);
        result
    }

    /// Get a reference to the underlying app for custom handling.
    pub fn app(&self) -> &App<B> {
        &self.app
    }

    /// Get a mutable reference to the underlying app for custom handling.
    pub fn app_mut(&mut self) -> &mut App<B> {
        &mut self.app
    }
}

fn run_event_loop<B: ProgressBackend>(
    terminal: &mut terminal::AppTerminal,
    app: &mut App<B>,
    shutdown: &terminal::ShutdownSignal,
) -> Result<(), QuizError> {
    while !app.should_quit() {
        if handle_shutdown(app, shutdown) {
            break;
        }
        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(app.poll_timeout())? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_input(app, key);
                }
            }
        }

        app.pump_clock();
    }

    Ok(())
}

/// Exits the app, saving a running session, once a termination signal arrived.
fn handle_shutdown<B: ProgressBackend>(
    app: &mut App<B>,
    shutdown: &terminal::ShutdownSignal,
) -> bool {
    if !shutdown.is_requested() {
        return false;
    }
    tracing::info!("termination signal received");
    app.exit();
    true
}

fn handle_input<B: ProgressBackend>(app: &mut App<B>, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.exit();
        return;
    }

    match app.screen {
        Screen::Login => handle_login_input(app, key.code),
        Screen::ModuleSelection => handle_module_input(app, key.code),
        Screen::Quiz if app.is_confirming_quit() => handle_confirm_input(app, key.code),
        Screen::Quiz => handle_quiz_input(app, key.code),
        Screen::Review => handle_review_input(app, key.code),
    }
}

fn handle_login_input<B: ProgressBackend>(app: &mut App<B>, key: KeyCode) {
    match key {
        KeyCode::Enter => app.submit_login(),
        KeyCode::Backspace => app.name_input_pop(),
        KeyCode::Esc => app.exit(),
        KeyCode::Char(c) => app.name_input_push(c),
        _ => {}
    }
}

fn handle_module_input<B: ProgressBackend>(app: &mut App<B>, key: KeyCode) {
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_module(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_module(),
        KeyCode::Enter => app.start_selected_module(),
        KeyCode::Char('c') | KeyCode::Char('C') => app.resume_pending(),
        KeyCode::Char('l') | KeyCode::Char('L') => app.logout(),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => app.exit(),
        _ => {}
    }
}

fn handle_quiz_input<B: ProgressBackend>(app: &mut App<B>, key: KeyCode) {
    if let KeyCode::Char(c) = key {
        if let Some(digit) = c.to_digit(10) {
            app.push_jump_digit(digit as usize);
            return;
        }
    }
    app.clear_jump_number();

    match key {
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_option(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_option(),
        KeyCode::Enter | KeyCode::Char(' ') => app.submit_answer(),
        KeyCode::Left | KeyCode::Char('h') => app.previous_question(),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('n') => app.next_question(),
        KeyCode::Char('f') | KeyCode::Char('F') => app.finish_quiz(),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => app.request_quit(),
        _ => {}
    }
}

fn handle_confirm_input<B: ProgressBackend>(app: &mut App<B>, key: KeyCode) {
    match key {
        KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_quit(),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_quit(),
        _ => {}
    }
}

fn handle_review_input<B: ProgressBackend>(app: &mut App<B>, key: KeyCode) {
    match key {
        KeyCode::Down | KeyCode::Char('j') => app.scroll_review_down(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_review_up(),
        KeyCode::Char('r') | KeyCode::Char('R') => app.retry(),
        KeyCode::Enter | KeyCode::Char('m') | KeyCode::Char('M') => app.return_to_modules(),
        KeyCode::Char('q') | KeyCode::Char('Q') => app.exit(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuestionType;

    fn question(correct_index: usize) -> Question {
        Question {
            text: "Q".to_string(),
            options: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            correct_index,
            explanation: String::new(),
            kind: QuestionType::ContentRecall,
        }
    }

    fn app() -> App<MemoryBackend> {
        let config = QuizConfig::default();
        let repo = QuestionRepository::from_sets([(
            "historia",
            vec![question(2), question(0)],
        )]);
        let store = ProgressStore::open(MemoryBackend::new(), DEFAULT_USER, config.module_ids());
        App::new(config, repo, store)
    }

    fn press(app: &mut App<MemoryBackend>, code: KeyCode) {
        handle_input(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_keyboard_walkthrough() {
        let mut app = app();
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.name_input(), "j");
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen, Screen::ModuleSelection);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen, Screen::Quiz);

        press(&mut app, KeyCode::Char('k'));
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.session().unwrap().current_index(), 1);
        press(&mut app, KeyCode::Char('9'));
        assert_eq!(app.session().unwrap().current_index(), 1);

        press(&mut app, KeyCode::Char('f'));
        assert_eq!(app.screen, Screen::Review);
        assert_eq!(app.review().unwrap().summary.percentage, 100);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen, Screen::ModuleSelection);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit());
    }

    #[test]
    fn test_quit_dialog_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);

        press(&mut app, KeyCode::Char('q'));
        assert!(app.is_confirming_quit());
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.selected_option(), 0);
        press(&mut app, KeyCode::Char('n'));
        assert!(!app.is_confirming_quit());

        press(&mut app, KeyCode::Char('q'));
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.screen, Screen::ModuleSelection);
        assert_eq!(app.store().get("historia"), 0);
    }

    #[test]
    fn test_digit_keys_jump_past_ninth_question() {
        let config = QuizConfig::default();
        let repo = QuestionRepository::from_sets([("historia", vec![question(0); 11])]);
        let store = ProgressStore::open(MemoryBackend::new(), DEFAULT_USER, config.module_ids());
        let mut app = App::new(config, repo, store);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);

        press(&mut app, KeyCode::Char('1'));
        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.session().unwrap().current_index(), 10);

        press(&mut app, KeyCode::Char('h'));
        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.session().unwrap().current_index(), 0);
    }

    #[test]
    fn test_shutdown_signal_saves_running_session() {
        let mut app = app();
        let shutdown = terminal::ShutdownSignal::default();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);
        assert!(!handle_shutdown(&mut app, &shutdown));

        shutdown.request();
        assert!(handle_shutdown(&mut app, &shutdown));
        assert!(app.should_quit());
        assert_eq!(app.pending_module(), Some("historia"));
    }

    #[test]
    fn test_ctrl_c_exits_from_any_screen() {
        let mut app = app();
        handle_input(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(app.should_quit());
    }
}
