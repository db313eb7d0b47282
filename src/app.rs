use std::time::Duration;

use crate::config::QuizConfig;
use crate::data::QuestionRepository;
use crate::models::{Module, Screen};
use crate::progress::{DEFAULT_USER, JsonFileBackend, ProgressBackend, ProgressStore};
use crate::session::{IntervalTicker, QuizMachine, Review, Session, ShuffleSettings};

const MAX_NAME_LENGTH: usize = 24;
const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Front-end controller: owns the core pieces and the screen-local cursor
/// state, and turns user intents into state machine transitions.
pub struct App<B: ProgressBackend = JsonFileBackend> {
    pub screen: Screen,
    config: QuizConfig,
    repo: QuestionRepository,
    machine: QuizMachine,
    store: ProgressStore<B>,
    ticker: Option<IntervalTicker>,
    name_input: String,
    selected_module: usize,
    selected_option: usize,
    jump_number: usize,
    review_scroll: usize,
    confirm_quit: bool,
    status: Option<String>,
    should_quit: bool,
}

impl<B: ProgressBackend> App<B> {
    pub fn new(config: QuizConfig, repo: QuestionRepository, store: ProgressStore<B>) -> Self {
        let name_input = if store.user() == DEFAULT_USER {
            String::new()
        } else {
            store.user().to_string()
        };
        let machine = QuizMachine::with_shuffle(ShuffleSettings::from_config(&config));

        Self {
            screen: Screen::Login,
            config,
            repo,
            machine,
            store,
            ticker: None,
            name_input,
            selected_module: 0,
            selected_option: 0,
            jump_number: 0,
            review_scroll: 0,
            confirm_quit: false,
            status: None,
            should_quit: false,
        }
    }

    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    pub fn store(&self) -> &ProgressStore<B> {
        &self.store
    }

    pub fn machine(&self) -> &QuizMachine {
        &self.machine
    }

    pub fn session(&self) -> Option<&Session> {
        self.machine.session()
    }

    pub fn review(&self) -> Option<&Review> {
        self.machine.review()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn is_confirming_quit(&self) -> bool {
        self.confirm_quit
    }

    pub fn is_timer_running(&self) -> bool {
        self.ticker.is_some()
    }

    // Login

    pub fn name_input(&self) -> &str {
        &self.name_input
    }

    pub fn name_input_push(&mut self, c: char) {
        if self.name_input.chars().count() < MAX_NAME_LENGTH && !c.is_control() {
            self.name_input.push(c);
        }
    }

    pub fn name_input_pop(&mut self) {
        self.name_input.pop();
    }

    pub fn submit_login(&mut self) {
        let name = self.name_input.trim();
        let user = if name.is_empty() { DEFAULT_USER } else { name };
        self.store.set_user(user);
        tracing::info!(user = %user, "logged in");
        self.status = None;
        self.screen = Screen::ModuleSelection;
    }

    pub fn logout(&mut self) {
        tracing::info!(user = %self.store.user(), "logged out");
        self.store.set_user(DEFAULT_USER);
        self.name_input.clear();
        self.status = None;
        self.screen = Screen::Login;
    }

    // Module selection

    pub fn selected_module(&self) -> usize {
        self.selected_module
    }

    pub fn select_next_module(&mut self) {
        let count = self.config.modules.len();
        self.selected_module = (self.selected_module + 1) % count;
    }

    pub fn select_previous_module(&mut self) {
        let count = self.config.modules.len();
        self.selected_module = (self.selected_module + count - 1) % count;
    }

    pub fn module_progress(&self, module_id: &str) -> u8 {
        self.store.get(module_id)
    }

    pub fn overall_progress(&self) -> u8 {
        self.store.overall()
    }

    /// Display name of the module that owns `id`, falling back to the id.
    pub fn module_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.config
            .module(id)
            .map(|m| m.name.as_str())
            .unwrap_or(id)
    }

    /// Module of the unfinished session saved on a previous exit, if any.
    pub fn pending_module(&self) -> Option<&str> {
        self.store.pending_session().map(|s| s.module.as_str())
    }

    pub fn start_selected_module(&mut self) {
        let Some(module) = self.config.modules.get(self.selected_module) else {
            return;
        };
        let module_id = module.id.clone();
        self.start_module(&module_id);
    }

    pub fn start_module(&mut self, module_id: &str) {
        let started = self.machine.start(&self.repo, module_id).map(|_| ());
        match started {
            Ok(()) => self.enter_quiz(),
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    pub fn resume_pending(&mut self) {
        let Some(snapshot) = self.store.pending_session().cloned() else {
            return;
        };
        let resumed = self.machine.resume(snapshot).map(|_| ());
        match resumed {
            Ok(()) => {
                self.store.clear_pending();
                self.enter_quiz();
            }
            Err(e) => {
                self.store.clear_pending();
                self.status = Some(e.to_string());
            }
        }
    }

    fn enter_quiz(&mut self) {
        self.ticker = Some(IntervalTicker::new());
        self.confirm_quit = false;
        self.jump_number = 0;
        self.status = None;
        self.sync_selected_option();
        self.screen = Screen::Quiz;
    }

    // Quiz

    pub fn selected_option(&self) -> usize {
        self.selected_option
    }

    pub fn select_next_option(&mut self) {
        if let Some(count) = self.option_count() {
            self.selected_option = (self.selected_option + 1) % count;
        }
    }

    pub fn select_previous_option(&mut self) {
        if let Some(count) = self.option_count() {
            self.selected_option = (self.selected_option + count - 1) % count;
        }
    }

    pub fn submit_answer(&mut self) {
        if self.machine.is_active() {
            self.machine.answer(self.selected_option);
        }
    }

    pub fn next_question(&mut self) {
        if self.machine.is_active() {
            self.machine.next();
            self.sync_selected_option();
        }
    }

    pub fn previous_question(&mut self) {
        if self.machine.is_active() {
            self.machine.previous();
            self.sync_selected_option();
        }
    }

    /// Jumps to a 0-based question index; indices past the end are ignored.
    pub fn jump_to_question(&mut self, index: usize) {
        let in_range = self.session().is_some_and(|s| index < s.len());
        if in_range {
            self.machine.navigate_to(index);
            self.sync_selected_option();
        }
    }

    /// Question number typed so far, 0 when none.
    pub fn jump_number(&self) -> usize {
        self.jump_number
    }

    /// Extends the typed question number with `digit` and jumps to it, so
    /// `1` then `2` reaches question 12. A digit that would overshoot the
    /// last question starts a new number instead.
    pub fn push_jump_digit(&mut self, digit: usize) {
        let Some(len) = self.session().map(|s| s.len()) else {
            return;
        };
        let extended = self.jump_number * 10 + digit;
        let number = if (1..=len).contains(&extended) {
            extended
        } else {
            digit
        };
        if (1..=len).contains(&number) {
            self.jump_number = number;
            self.jump_to_question(number - 1);
        } else {
            self.jump_number = 0;
        }
    }

    pub fn clear_jump_number(&mut self) {
        self.jump_number = 0;
    }

    pub fn finish_quiz(&mut self) {
        if !self.machine.is_active() {
            return;
        }
        self.ticker = None;
        self.machine.finish(&mut self.store);
        self.review_scroll = 0;
        self.screen = Screen::Review;
    }

    pub fn request_quit(&mut self) {
        if self.machine.is_active() {
            self.confirm_quit = true;
        }
    }

    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    /// The user confirmed abandoning the quiz.
    pub fn confirm_quit(&mut self) {
        if !self.confirm_quit {
            return;
        }
        self.confirm_quit = false;
        self.ticker = None;
        self.machine.quit();
        self.screen = Screen::ModuleSelection;
    }

    /// Feeds elapsed whole seconds into the state machine.
    pub fn pump_clock(&mut self) {
        if let Some(ticker) = &mut self.ticker {
            for _ in 0..ticker.take_ticks() {
                self.machine.tick();
            }
        }
    }

    /// How long the event loop may block waiting for input.
    pub fn poll_timeout(&self) -> Duration {
        self.ticker
            .as_ref()
            .map(|t| t.until_next_tick())
            .unwrap_or(IDLE_POLL_INTERVAL)
    }

    fn option_count(&self) -> Option<usize> {
        self.session().map(|s| s.current_question().options.len())
    }

    fn sync_selected_option(&mut self) {
        self.selected_option = self
            .session()
            .and_then(|s| s.answer_for(s.current_index()))
            .unwrap_or(0);
    }

    // Review

    pub fn review_scroll(&self) -> usize {
        self.review_scroll
    }

    pub fn scroll_review_down(&mut self) {
        let max_scroll = self
            .review()
            .map(|r| r.items.len().saturating_sub(1))
            .unwrap_or(0);
        self.review_scroll = (self.review_scroll + 1).min(max_scroll);
    }

    pub fn scroll_review_up(&mut self) {
        self.review_scroll = self.review_scroll.saturating_sub(1);
    }

    pub fn retry(&mut self) {
        let Some(module_id) = self.review().map(|r| r.module.clone()) else {
            return;
        };
        let restarted = self.machine.retry(&self.repo, &module_id).map(|_| ());
        match restarted {
            Ok(()) => self.enter_quiz(),
            Err(e) => {
                self.machine.return_to_modules();
                self.status = Some(e.to_string());
                self.screen = Screen::ModuleSelection;
            }
        }
    }

    pub fn return_to_modules(&mut self) {
        if self.review().is_some() {
            self.machine.return_to_modules();
        }
        self.screen = Screen::ModuleSelection;
    }

    /// Leaves the application, saving a running session for later.
    pub fn exit(&mut self) {
        self.ticker = None;
        self.machine.save_on_exit(&mut self.store);
        self.should_quit = true;
    }

    pub fn modules(&self) -> &[Module] {
        &self.config.modules
    }
}
