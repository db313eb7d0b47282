//! The quiz session state machine.
//!
//! `Idle -> Active -> Reviewing -> Idle | Active`. Every transition runs
//! to completion synchronously. Calling a transition from the wrong phase
//! or with an out-of-range index is a caller bug and panics.

use rand::Rng;

use crate::data::QuestionRepository;
use crate::error::NoQuestionsError;
use crate::progress::{ProgressBackend, ProgressStore};

use super::scoring::Review;
use super::session::{Session, SessionSnapshot};
use super::shuffle::ShuffleSettings;

#[derive(Debug, Clone, Default)]
pub enum Phase {
    /// No session.
    #[default]
    Idle,
    /// A session is running.
    Active(Session),
    /// A session finished and its results are on display.
    Reviewing(Review),
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Active(_) => "active",
            Phase::Reviewing(_) => "reviewing",
        }
    }
}

#[derive(Debug, Default)]
pub struct QuizMachine {
    phase: Phase,
    shuffle: ShuffleSettings,
}

impl QuizMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shuffle(shuffle: ShuffleSettings) -> Self {
        Self {
            phase: Phase::Idle,
            shuffle,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.phase, Phase::Idle)
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, Phase::Active(_))
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.phase {
            Phase::Active(session) => Some(session),
            _ => None,
        }
    }

    pub fn review(&self) -> Option<&Review> {
        match &self.phase {
            Phase::Reviewing(review) => Some(review),
            _ => None,
        }
    }

    /// Starts a session on `module_id`, shuffling with the thread RNG if enabled.
    pub fn start(
        &mut self,
        repo: &QuestionRepository,
        module_id: &str,
    ) -> Result<&Session, NoQuestionsError> {
        self.start_with_rng(repo, module_id, &mut rand::rng())
    }

    pub fn start_with_rng<R: Rng + ?Sized>(
        &mut self,
        repo: &QuestionRepository,
        module_id: &str,
        rng: &mut R,
    ) -> Result<&Session, NoQuestionsError> {
        assert!(
            !self.is_active(),
            "start called while a session is already active"
        );

        let mut questions = repo.questions_for(module_id).to_vec();
        if questions.is_empty() {
            tracing::warn!(module = %module_id, "no questions for module");
            return Err(NoQuestionsError {
                module: module_id.to_string(),
            });
        }
        self.shuffle.apply(&mut questions, rng);

        tracing::info!(
            module = %module_id,
            questions = questions.len(),
            shuffled = self.shuffle.is_enabled(),
            "session started"
        );
        Ok(self.activate(Session::new(module_id.to_string(), questions)))
    }

    /// Continues a session saved by [`save_on_exit`](Self::save_on_exit).
    pub fn resume(&mut self, snapshot: SessionSnapshot) -> Result<&Session, NoQuestionsError> {
        assert!(
            !self.is_active(),
            "resume called while a session is already active"
        );
        if snapshot.questions.is_empty() {
            return Err(NoQuestionsError {
                module: snapshot.module,
            });
        }

        let session = Session::restore(snapshot);
        tracing::info!(
            module = %session.module(),
            answered = session.answered_count(),
            elapsed = session.elapsed_seconds(),
            "session resumed"
        );
        Ok(self.activate(session))
    }

    /// Same as [`start`](Self::start), named for the review screen's retry action.
    pub fn retry(
        &mut self,
        repo: &QuestionRepository,
        module_id: &str,
    ) -> Result<&Session, NoQuestionsError> {
        assert!(
            matches!(self.phase, Phase::Reviewing(_)),
            "retry called outside the review phase"
        );
        self.start(repo, module_id)
    }

    /// Records or replaces the answer for the current question.
    pub fn answer(&mut self, option_index: usize) {
        let session = self.active_mut("answer");
        session.answer(option_index);
        tracing::debug!(
            question = session.current_index(),
            option = option_index,
            "answer recorded"
        );
    }

    /// Moves to any question, answered or not.
    pub fn navigate_to(&mut self, index: usize) {
        let session = self.active_mut("navigate_to");
        session.navigate_to(index);
        tracing::trace!(question = index, "navigated");
    }

    /// Moves forward one question; does nothing on the last one.
    pub fn next(&mut self) {
        let session = self.active_mut("next");
        if !session.is_last() {
            let index = session.current_index() + 1;
            session.navigate_to(index);
        }
    }

    /// Moves back one question; does nothing on the first one.
    pub fn previous(&mut self) {
        let session = self.active_mut("previous");
        if let Some(index) = session.current_index().checked_sub(1) {
            session.navigate_to(index);
        }
    }

    /// One second of wall-clock time passed. Ignored unless a session is running.
    pub fn tick(&mut self) -> bool {
        match &mut self.phase {
            Phase::Active(session) => {
                session.tick();
                true
            }
            _ => false,
        }
    }

    /// Scores the session, stores the percentage and moves to review.
    ///
    /// A saved unfinished session is left alone; it may belong to another
    /// module and is only discarded when it is resumed.
    pub fn finish<B: ProgressBackend>(&mut self, store: &mut ProgressStore<B>) -> &Review {
        let session = match std::mem::take(&mut self.phase) {
            Phase::Active(session) => session,
            other => {
                let name = other.name();
                self.phase = other;
                panic!("finish called in the {} phase", name);
            }
        };

        let review = Review::from_session(&session);
        tracing::info!(
            module = %review.module,
            correct = review.summary.correct,
            incorrect = review.summary.incorrect,
            unanswered = review.summary.unanswered,
            percentage = review.summary.percentage,
            elapsed = review.elapsed_seconds,
            "session finished"
        );
        store.set(&review.module, review.summary.percentage);

        self.phase = Phase::Reviewing(review);
        let Phase::Reviewing(review) = &self.phase else {
            unreachable!()
        };
        review
    }

    /// Abandons the running session without scoring it. The caller is
    /// responsible for having asked the user first.
    pub fn quit(&mut self) {
        let session = self.active_mut("quit");
        tracing::info!(
            module = %session.module(),
            answered = session.answered_count(),
            "session abandoned"
        );
        self.phase = Phase::Idle;
    }

    /// Leaves the review screen.
    pub fn return_to_modules(&mut self) {
        assert!(
            matches!(self.phase, Phase::Reviewing(_)),
            "return_to_modules called outside the review phase"
        );
        self.phase = Phase::Idle;
    }

    /// Best-effort save of a running session when the program is going away.
    /// Returns whether anything was written.
    pub fn save_on_exit<B: ProgressBackend>(&self, store: &mut ProgressStore<B>) -> bool {
        match &self.phase {
            Phase::Active(session) => {
                store.save_pending(session.snapshot());
                true
            }
            _ => false,
        }
    }

    fn activate(&mut self, session: Session) -> &Session {
        self.phase = Phase::Active(session);
        let Phase::Active(session) = &self.phase else {
            unreachable!()
        };
        session
    }

    fn active_mut(&mut self, operation: &str) -> &mut Session {
        match &mut self.phase {
            Phase::Active(session) => session,
            other => panic!("{} called in the {} phase", operation, other.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::MemoryBackend;
    use crate::session::test_support::questions;
    use crate::session::{Outcome, PerformanceLevel, QuestionState};

    fn repo() -> QuestionRepository {
        QuestionRepository::from_sets([
            ("three", questions(&[1, 0, 2])),
            ("four", questions(&[0, 1, 2, 3])),
        ])
    }

    fn store() -> ProgressStore<MemoryBackend> {
        ProgressStore::open(
            MemoryBackend::new(),
            "ana",
            vec!["three".to_string(), "four".to_string()],
        )
    }

    fn assert_states_consistent(machine: &QuizMachine) {
        let session = machine.session().unwrap();
        let answered = session
            .question_states()
            .iter()
            .filter(|s| **s == QuestionState::Answered)
            .count();
        assert_eq!(answered, session.answers().len());
    }

    #[test]
    fn test_start_initializes_session() {
        let mut machine = QuizMachine::new();
        let session = machine.start(&repo(), "three").unwrap();
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.question_state(0), QuestionState::Current);
        assert_eq!(session.question_state(1), QuestionState::Unvisited);
        assert!(machine.is_active());
    }

    #[test]
    fn test_start_unknown_module() {
        let mut machine = QuizMachine::new();
        let mut store = store();
        let err = machine.start(&repo(), "unknown-module").unwrap_err();
        assert_eq!(err.module, "unknown-module");
        assert!(machine.is_idle());
        assert_eq!(store.backend().writes(), 0);
        assert!(!machine.save_on_exit(&mut store));
        assert_eq!(store.backend().writes(), 0);
    }

    #[test]
    fn test_scenario_two_correct_one_incorrect() {
        let mut machine = QuizMachine::new();
        let mut store = store();
        machine.start(&repo(), "three").unwrap();

        for (index, option) in [1, 1, 2].into_iter().enumerate() {
            machine.navigate_to(index);
            machine.answer(option);
            assert_states_consistent(&machine);
        }

        let review = machine.finish(&mut store);
        assert_eq!(review.summary.correct, 2);
        assert_eq!(review.summary.incorrect, 1);
        assert_eq!(review.summary.unanswered, 0);
        assert_eq!(review.summary.percentage, 67);
        assert_eq!(review.level(), PerformanceLevel::Fair);
        assert_eq!(review.level().label(), "Fair");
        assert_eq!(store.get("three"), 67);
    }

    #[test]
    fn test_scenario_partial_answers() {
        let mut machine = QuizMachine::new();
        let mut store = store();
        machine.start(&repo(), "four").unwrap();

        machine.answer(0);
        machine.navigate_to(2);
        machine.answer(2);

        let review = machine.finish(&mut store);
        assert_eq!(review.summary.correct, 2);
        assert_eq!(review.summary.incorrect, 0);
        assert_eq!(review.summary.percentage, 100);
        assert_eq!(review.unanswered_indices(), vec![1, 3]);
        assert_eq!(review.items[1].outcome, Outcome::Unanswered);
        assert_eq!(review.items[3].selected, None);
    }

    #[test]
    fn test_finish_without_answers_scores_zero() {
        let mut machine = QuizMachine::new();
        let mut store = store();
        machine.start(&repo(), "three").unwrap();

        let review = machine.finish(&mut store);
        assert_eq!(review.summary.percentage, 0);
        assert_eq!(review.summary.unanswered, 3);
        assert_eq!(store.backend().writes(), 1);
    }

    #[test]
    fn test_reanswer_replaces() {
        let mut machine = QuizMachine::new();
        machine.start(&repo(), "three").unwrap();
        machine.answer(0);
        machine.answer(2);
        machine.answer(2);

        let session = machine.session().unwrap();
        assert_eq!(session.answers().len(), 1);
        assert_eq!(session.answer_for(0), Some(2));
        assert_states_consistent(&machine);
    }

    #[test]
    fn test_navigate_to_same_index_is_idempotent() {
        let mut machine = QuizMachine::new();
        machine.start(&repo(), "four").unwrap();
        machine.answer(0);
        machine.navigate_to(2);
        let before = machine.session().unwrap().question_states();

        machine.navigate_to(2);
        machine.navigate_to(2);
        assert_eq!(machine.session().unwrap().question_states(), before);
        assert_states_consistent(&machine);
    }

    #[test]
    fn test_free_navigation_backwards() {
        let mut machine = QuizMachine::new();
        machine.start(&repo(), "four").unwrap();
        machine.navigate_to(3);
        machine.navigate_to(1);

        let session = machine.session().unwrap();
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.question_state(3), QuestionState::Unvisited);
        assert_eq!(session.question_state(1), QuestionState::Current);
    }

    #[test]
    fn test_next_and_previous_stop_at_edges() {
        let mut machine = QuizMachine::new();
        machine.start(&repo(), "three").unwrap();

        machine.previous();
        assert_eq!(machine.session().unwrap().current_index(), 0);

        machine.next();
        machine.next();
        machine.next();
        assert_eq!(machine.session().unwrap().current_index(), 2);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_navigate_out_of_range_panics() {
        let mut machine = QuizMachine::new();
        machine.start(&repo(), "three").unwrap();
        machine.navigate_to(3);
    }

    #[test]
    #[should_panic(expected = "answer called in the idle phase")]
    fn test_answer_while_idle_panics() {
        QuizMachine::new().answer(0);
    }

    #[test]
    fn test_ticks_stop_after_finish() {
        let mut machine = QuizMachine::new();
        let mut store = store();
        machine.start(&repo(), "three").unwrap();
        for _ in 0..5 {
            assert!(machine.tick());
        }
        let review = machine.finish(&mut store);
        assert_eq!(review.elapsed_seconds, 5);

        assert!(!machine.tick());
        assert_eq!(machine.review().unwrap().elapsed_seconds, 5);
    }

    #[test]
    fn test_quit_discards_without_scoring() {
        let mut machine = QuizMachine::new();
        let mut store = store();
        machine.start(&repo(), "three").unwrap();
        machine.answer(1);
        machine.quit();

        assert!(machine.is_idle());
        assert!(!machine.tick());
        assert_eq!(store.get("three"), 0);
        assert_eq!(store.backend().writes(), 0);
    }

    #[test]
    fn test_retry_and_return_from_review() {
        let mut machine = QuizMachine::new();
        let mut store = store();
        machine.start(&repo(), "three").unwrap();
        machine.answer(1);
        machine.finish(&mut store);

        let session = machine.retry(&repo(), "three").unwrap();
        assert!(session.answers().is_empty());
        assert_eq!(session.elapsed_seconds(), 0);

        machine.finish(&mut store);
        assert_eq!(store.get("three"), 0);
        machine.return_to_modules();
        assert!(machine.is_idle());
    }

    #[test]
    fn test_save_on_exit_and_resume() {
        let mut machine = QuizMachine::new();
        let mut store = store();
        machine.start(&repo(), "four").unwrap();
        machine.answer(0);
        machine.navigate_to(2);
        machine.tick();
        assert!(machine.save_on_exit(&mut store));

        let snapshot = store.pending_session().cloned().unwrap();
        let mut restarted = QuizMachine::new();
        let session = restarted.resume(snapshot).unwrap();
        assert_eq!(session.current_index(), 2);
        assert_eq!(session.answer_for(0), Some(0));
        assert_eq!(session.elapsed_seconds(), 1);

        restarted.finish(&mut store);
        assert_eq!(store.get("four"), 100);
        assert_eq!(
            store.pending_session().map(|s| s.module.as_str()),
            Some("four")
        );
    }

    #[test]
    fn test_shuffled_start_keeps_scoring_correct() {
        use rand::SeedableRng;
        use rand::rngs::StdRng;

        let mut machine = QuizMachine::with_shuffle(ShuffleSettings {
            questions: true,
            options: true,
        });
        let mut store = store();
        let session = machine
            .start_with_rng(&repo(), "four", &mut StdRng::seed_from_u64(5))
            .unwrap();
        let correct: Vec<usize> = session.questions().iter().map(|q| q.correct_index).collect();

        for (index, option) in correct.into_iter().enumerate() {
            machine.navigate_to(index);
            machine.answer(option);
        }
        assert_eq!(machine.finish(&mut store).summary.percentage, 100);
    }
}
