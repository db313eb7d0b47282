use std::collections::HashMap;

use crate::config::QuizConfig;
use crate::error::LoadError;
use crate::models::Question;

use super::loader::load_questions_from_json;

/// Question sets for every configured module, loaded once at start-up.
#[derive(Debug, Clone, Default)]
pub struct QuestionRepository {
    sets: HashMap<String, Vec<Question>>,
}

impl QuestionRepository {
    /// Loads every module named in `config`. The first failing file aborts the load.
    pub fn load(config: &QuizConfig) -> Result<Self, LoadError> {
        let mut sets = HashMap::with_capacity(config.modules.len());

        for module in &config.modules {
            let path = config.question_path(module);
            let questions = load_questions_from_json(&path)?;
            tracing::info!(
                module = %module.id,
                count = questions.len(),
                path = %path.display(),
                "loaded questions"
            );
            sets.insert(module.id.clone(), questions);
        }

        Ok(Self { sets })
    }

    /// Builds a repository from in-memory sets.
    pub fn from_sets<I, K>(sets: I) -> Self
    where
        I: IntoIterator<Item = (K, Vec<Question>)>,
        K: Into<String>,
    {
        Self {
            sets: sets.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Questions for `module_id` in file order; empty for an unknown id.
    pub fn questions_for(&self, module_id: &str) -> &[Question] {
        self.sets.get(module_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn total_questions(&self) -> usize {
        self.sets.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Module, QuestionType};
    use std::fs;

    fn question_json(text: &str) -> String {
        format!(
            r#"{{"question":"{}","options":["a","b"],"correctIndex":0,"explanation":"","type":"content-recall"}}"#,
            text
        )
    }

    fn config_in(dir: &std::path::Path) -> QuizConfig {
        QuizConfig {
            questions_dir: dir.to_path_buf(),
            modules: vec![
                Module::new("one", "One", "one"),
                Module::new("two", "Two", "Two"),
            ],
            ..QuizConfig::default()
        }
    }

    #[test]
    fn test_load_all_modules() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("one.json"), format!("[{}]", question_json("A"))).unwrap();
        fs::write(
            dir.path().join("Two.json"),
            format!("[{},{}]", question_json("B"), question_json("C")),
        )
        .unwrap();

        let repo = QuestionRepository::load(&config_in(dir.path())).unwrap();
        assert_eq!(repo.questions_for("one").len(), 1);
        assert_eq!(repo.questions_for("two")[1].text, "C");
        assert_eq!(repo.total_questions(), 3);
        assert_eq!(repo.questions_for("two")[0].kind, QuestionType::ContentRecall);
    }

    #[test]
    fn test_missing_module_file_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("one.json"), format!("[{}]", question_json("A"))).unwrap();

        let result = QuestionRepository::load(&config_in(dir.path()));
        assert!(matches!(result, Err(LoadError::Io { .. })));
    }

    #[test]
    fn test_unknown_module_is_empty() {
        let repo = QuestionRepository::from_sets(Vec::<(String, Vec<Question>)>::new());
        assert!(repo.questions_for("unknown-module").is_empty());
    }
}
