use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Minimum number of options a question must offer.
pub const MIN_OPTIONS: usize = 2;

/// Display category of a question. Has no effect on scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionType {
    #[serde(rename = "content-recall", alias = "conteudista")]
    ContentRecall,
    #[serde(rename = "reasoning", alias = "raciocinio")]
    Reasoning,
}

impl QuestionType {
    pub fn label(self) -> &'static str {
        match self {
            QuestionType::ContentRecall => "Content recall",
            QuestionType::Reasoning => "Reasoning",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(rename = "question")]
    pub text: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    pub explanation: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
}

impl Question {
    /// Checks the structural rules a loaded question must satisfy.
    pub fn validate(&self) -> Result<(), String> {
        if self.text.trim().is_empty() {
            return Err("question text is empty".to_string());
        }
        if self.options.len() < MIN_OPTIONS {
            return Err(format!(
                "needs at least {} options, found {}",
                MIN_OPTIONS,
                self.options.len()
            ));
        }
        if self.correct_index >= self.options.len() {
            return Err(format!(
                "correctIndex {} is out of range for {} options",
                self.correct_index,
                self.options.len()
            ));
        }
        Ok(())
    }

    pub fn is_correct(&self, option_index: usize) -> bool {
        option_index == self.correct_index
    }

    /// Shuffles the options in place, keeping `correct_index` on the same answer.
    pub fn shuffle_options<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let correct = self.options[self.correct_index].clone();
        let mut order: Vec<usize> = (0..self.options.len()).collect();
        order.shuffle(rng);

        let options: Vec<String> = order.iter().map(|&i| self.options[i].clone()).collect();
        self.correct_index = order
            .iter()
            .position(|&i| i == self.correct_index)
            .unwrap_or(self.correct_index);
        self.options = options;
        debug_assert_eq!(self.options[self.correct_index], correct);
    }
}
