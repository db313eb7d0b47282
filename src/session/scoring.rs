//! Scoring and review construction for finished sessions.

use std::fmt;

use crate::models::Question;

use super::session::Session;

/// `numerator / denominator` rounded half-up, 0 for a zero denominator.
pub fn rounded_ratio(numerator: u64, denominator: u64) -> u8 {
    if denominator == 0 {
        return 0;
    }
    let rounded = (2 * numerator + denominator) / (2 * denominator);
    u8::try_from(rounded).unwrap_or(u8::MAX)
}

/// Label for a score percentage. Each band includes its lower bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerformanceLevel {
    Excellent,
    VeryGood,
    Good,
    Fair,
    NeedsImprovement,
}

impl PerformanceLevel {
    pub fn from_percentage(percentage: u8) -> Self {
        match percentage {
            90.. => PerformanceLevel::Excellent,
            80..=89 => PerformanceLevel::VeryGood,
            70..=79 => PerformanceLevel::Good,
            60..=69 => PerformanceLevel::Fair,
            _ => PerformanceLevel::NeedsImprovement,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PerformanceLevel::Excellent => "Excellent",
            PerformanceLevel::VeryGood => "Very Good",
            PerformanceLevel::Good => "Good",
            PerformanceLevel::Fair => "Fair",
            PerformanceLevel::NeedsImprovement => "Needs Improvement",
        }
    }
}

impl fmt::Display for PerformanceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
    Unanswered,
}

impl Outcome {
    pub fn label(self) -> &'static str {
        match self {
            Outcome::Correct => "Correct",
            Outcome::Incorrect => "Incorrect",
            Outcome::Unanswered => "Unanswered",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreSummary {
    pub correct: usize,
    pub incorrect: usize,
    pub unanswered: usize,
    /// Correct over answered only; unanswered questions count for nothing.
    pub percentage: u8,
}

impl ScoreSummary {
    pub fn level(&self) -> PerformanceLevel {
        PerformanceLevel::from_percentage(self.percentage)
    }
}

/// One question as it appears on the review screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewItem {
    pub index: usize,
    pub question: Question,
    pub selected: Option<usize>,
    pub outcome: Outcome,
}

/// Everything the review screen shows after a session finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub module: String,
    pub items: Vec<ReviewItem>,
    pub summary: ScoreSummary,
    pub elapsed_seconds: u64,
}

impl Review {
    pub(crate) fn from_session(session: &Session) -> Self {
        let items: Vec<ReviewItem> = session
            .questions()
            .iter()
            .enumerate()
            .map(|(index, question)| {
                let selected = session.answer_for(index);
                let outcome = match selected {
                    Some(option) if question.is_correct(option) => Outcome::Correct,
                    Some(_) => Outcome::Incorrect,
                    None => Outcome::Unanswered,
                };
                ReviewItem {
                    index,
                    question: question.clone(),
                    selected,
                    outcome,
                }
            })
            .collect();

        let count = |outcome: Outcome| items.iter().filter(|i| i.outcome == outcome).count();
        let correct = count(Outcome::Correct);
        let incorrect = count(Outcome::Incorrect);
        let unanswered = count(Outcome::Unanswered);
        let percentage = rounded_ratio(100 * correct as u64, (correct + incorrect) as u64);

        Self {
            module: session.module().to_string(),
            items,
            summary: ScoreSummary {
                correct,
                incorrect,
                unanswered,
                percentage,
            },
            elapsed_seconds: session.elapsed_seconds(),
        }
    }

    pub fn level(&self) -> PerformanceLevel {
        self.summary.level()
    }

    pub fn unanswered_indices(&self) -> Vec<usize> {
        self.items
            .iter()
            .filter(|i| i.outcome == Outcome::Unanswered)
            .map(|i| i.index)
            .collect()
    }
}
