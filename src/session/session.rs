use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::Question;

/// How a question shows up in the navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionState {
    Unvisited,
    Current,
    Answered,
}

/// One run through a module's questions.
///
/// Question states are derived from `answers` and `current_index` rather
/// than stored, so an answered question always reports `Answered` and
/// only an unanswered current question reports `Current`.
#[derive(Debug, Clone)]
pub struct Session {
    module: String,
    questions: Vec<Question>,
    current_index: usize,
    answers: BTreeMap<usize, usize>,
    elapsed_seconds: u64,
}

impl Session {
    pub(crate) fn new(module: String, questions: Vec<Question>) -> Self {
        assert!(!questions.is_empty(), "a session needs at least one question");
        Self {
            module,
            questions,
            current_index: 0,
            answers: BTreeMap::new(),
            elapsed_seconds: 0,
        }
    }

    /// Rebuilds a running session from a saved snapshot. Answers that do
    /// not fit the saved questions are dropped and the index is clamped.
    pub(crate) fn restore(snapshot: SessionSnapshot) -> Self {
        let SessionSnapshot {
            module,
            questions,
            current_index,
            answers,
            elapsed_seconds,
        } = snapshot;
        assert!(!questions.is_empty(), "a session needs at least one question");

        let answers: BTreeMap<usize, usize> = answers
            .into_iter()
            .filter(|(q, o)| questions.get(*q).is_some_and(|question| *o < question.options.len()))
            .collect();
        let current_index = current_index.min(questions.len() - 1);

        Self {
            module,
            questions,
            current_index,
            answers,
            elapsed_seconds,
        }
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.current_index]
    }

    pub fn is_last(&self) -> bool {
        self.current_index + 1 == self.questions.len()
    }

    pub fn answers(&self) -> &BTreeMap<usize, usize> {
        &self.answers
    }

    pub fn answer_for(&self, index: usize) -> Option<usize> {
        self.answers.get(&index).copied()
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    pub fn question_state(&self, index: usize) -> QuestionState {
        if self.answers.contains_key(&index) {
            QuestionState::Answered
        } else if index == self.current_index {
            QuestionState::Current
        } else {
            QuestionState::Unvisited
        }
    }

    pub fn question_states(&self) -> Vec<QuestionState> {
        (0..self.questions.len())
            .map(|i| self.question_state(i))
            .collect()
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    pub(crate) fn answer(&mut self, option_index: usize) {
        let options = self.current_question().options.len();
        assert!(
            option_index < options,
            "option {} out of range for question with {} options",
            option_index,
            options
        );
        self.answers.insert(self.current_index, option_index);
    }

    pub(crate) fn navigate_to(&mut self, index: usize) {
        assert!(
            index < self.questions.len(),
            "question {} out of range for {} questions",
            index,
            self.questions.len()
        );
        self.current_index = index;
    }

    /// Only reached while the owning machine is active.
    pub(crate) fn tick(&mut self) {
        self.elapsed_seconds += 1;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            module: self.module.clone(),
            questions: self.questions.clone(),
            current_index: self.current_index,
            answers: self.answers.clone(),
            elapsed_seconds: self.elapsed_seconds,
        }
    }
}

/// Serializable copy of a running session, saved when the program exits
/// mid-quiz. Questions are kept in presentation order so shuffled
/// sessions resume exactly as they were.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub module: String,
    pub questions: Vec<Question>,
    pub current_index: usize,
    pub answers: BTreeMap<usize, usize>,
    pub elapsed_seconds: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::test_support::questions;

    fn answered_states(session: &Session) -> usize {
        session
            .question_states()
            .iter()
            .filter(|s| **s == QuestionState::Answered)
            .count()
    }

    #[test]
    fn test_new_session() {
        let session = Session::new("m".to_string(), questions(&[1, 0, 2]));
        assert_eq!(session.current_index(), 0);
        assert_eq!(
            session.question_states(),
            vec![
                QuestionState::Current,
                QuestionState::Unvisited,
                QuestionState::Unvisited
            ]
        );
        assert!(session.answers().is_empty());
        assert_eq!(session.elapsed_seconds(), 0);
    }

    #[test]
    fn test_answer_then_navigate_keeps_counts_consistent() {
        let mut session = Session::new("m".to_string(), questions(&[1, 0, 2, 3]));
        session.answer(1);
        assert_eq!(session.question_state(0), QuestionState::Answered);
        assert_eq!(answered_states(&session), session.answers().len());

        session.navigate_to(2);
        assert_eq!(session.question_state(0), QuestionState::Answered);
        assert_eq!(session.question_state(2), QuestionState::Current);
        assert_eq!(answered_states(&session), session.answers().len());

        session.navigate_to(0);
        assert_eq!(session.question_state(0), QuestionState::Answered);
        assert_eq!(session.question_state(2), QuestionState::Unvisited);
        assert_eq!(answered_states(&session), session.answers().len());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_answer_out_of_range_panics() {
        let mut session = Session::new("m".to_string(), questions(&[0]));
        session.answer(9);
    }

    #[test]
    fn test_restore_drops_invalid_answers() {
        let snapshot = SessionSnapshot {
            module: "m".to_string(),
            questions: questions(&[0, 1]),
            current_index: 7,
            answers: BTreeMap::from([(0, 1), (1, 9), (5, 0)]),
            elapsed_seconds: 30,
        };
        let session = Session::restore(snapshot);
        assert_eq!(session.answers(), &BTreeMap::from([(0, 1)]));
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.elapsed_seconds(), 30);
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let mut session = Session::new("m".to_string(), questions(&[0, 1]));
        session.answer(1);
        let json = serde_json::to_string(&session.snapshot()).unwrap();
        assert!(json.contains("\"currentIndex\":0"));
        assert!(json.contains("\"elapsedSeconds\":0"));

        let back: SessionSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.answers, BTreeMap::from([(0, 1)]));
    }
}
