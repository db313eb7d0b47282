use rand::Rng;
use rand::seq::SliceRandom;

use crate::config::QuizConfig;
use crate::models::Question;

/// Which parts of a question set get randomized when a session starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShuffleSettings {
    pub questions: bool,
    pub options: bool,
}

impl ShuffleSettings {
    pub fn from_config(config: &QuizConfig) -> Self {
        Self {
            questions: config.shuffle_questions,
            options: config.shuffle_options,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.questions || self.options
    }

    /// Applies the enabled shuffles in place.
    pub fn apply<R: Rng + ?Sized>(&self, questions: &mut [Question], rng: &mut R) {
        if self.questions {
            questions.shuffle(rng);
        }
        if self.options {
            for question in questions.iter_mut() {
                question.shuffle_options(rng);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::test_support::questions;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_disabled_keeps_order() {
        let original = questions(&[0, 1, 2, 3, 0, 1]);
        let mut shuffled = original.clone();
        ShuffleSettings::default().apply(&mut shuffled, &mut StdRng::seed_from_u64(1));
        assert_eq!(shuffled, original);
    }

    #[test]
    fn test_question_shuffle_is_a_permutation() {
        let original = questions(&[0, 1, 2, 3, 0, 1, 2, 3]);
        let mut shuffled = original.clone();
        let settings = ShuffleSettings {
            questions: true,
            options: false,
        };
        settings.apply(&mut shuffled, &mut StdRng::seed_from_u64(3));

        let mut a: Vec<_> = original.iter().map(|q| q.text.clone()).collect();
        let mut b: Vec<_> = shuffled.iter().map(|q| q.text.clone()).collect();
        a.sort();
        b.sort();
        assert_eq!(a, b);
    }

    #[test]
    fn test_option_shuffle_preserves_answers() {
        let original = questions(&[0, 1, 2, 3]);
        let mut shuffled = original.clone();
        let settings = ShuffleSettings {
            questions: false,
            options: true,
        };
        settings.apply(&mut shuffled, &mut StdRng::seed_from_u64(11));

        for (before, after) in original.iter().zip(&shuffled) {
            assert_eq!(
                before.options[before.correct_index],
                after.options[after.correct_index]
            );
        }
    }
}
