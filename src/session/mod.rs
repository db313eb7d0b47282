//! Quiz session core: state machine, scoring, clock and shuffling.
//!
//! Nothing in here renders or reads input; the terminal front end reads
//! [`Session`] and [`Review`] snapshots and calls [`QuizMachine`] transitions.

mod clock;
mod machine;
mod scoring;
mod session;
mod shuffle;

pub use clock::{IntervalTicker, format_time};
pub use machine::{Phase, QuizMachine};
pub use scoring::{Outcome, PerformanceLevel, Review, ReviewItem, ScoreSummary, rounded_ratio};
pub use session::{QuestionState, Session, SessionSnapshot};
pub use shuffle::ShuffleSettings;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::models::{Question, QuestionType};

    /// Four-option questions whose correct answers are `correct`.
    pub fn questions(correct: &[usize]) -> Vec<Question> {
        correct
            .iter()
            .enumerate()
            .map(|(i, &correct_index)| Question {
                text: format!("Question {}", i + 1),
                options: ["A", "B", "C", "D"]
                    .iter()
                    .map(|label| format!("{}{}", label, i + 1))
                    .collect(),
                correct_index,
                explanation: format!("Explanation {}", i + 1),
                kind: QuestionType::Reasoning,
            })
            .collect()
    }
}
