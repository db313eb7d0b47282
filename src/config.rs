//! Configuration loader with multi-source merging.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::models::Module;

/// Project-level config file picked up from the working directory.
pub const PROJECT_CONFIG_FILE: &str = "health-quiz.toml";

/// Prefix for environment overrides, e.g. `HEALTH_QUIZ_TITLE`.
pub const ENV_PREFIX: &str = "HEALTH_QUIZ_";

/// Main application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizConfig {
    /// Title shown on the login screen.
    pub title: String,
    /// Namespace for persisted progress; names the progress file.
    pub storage_key: String,
    /// Directory holding `<module.file>.json` question files.
    pub questions_dir: PathBuf,
    /// Randomize question order at session start.
    pub shuffle_questions: bool,
    /// Randomize option order at session start.
    pub shuffle_options: bool,
    pub modules: Vec<Module>,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            title: "Health Journey Quiz".to_string(),
            storage_key: "healthJourneyQuizData".to_string(),
            questions_dir: PathBuf::from("questions"),
            shuffle_questions: false,
            shuffle_options: false,
            modules: vec![
                Module::new("historia", "History", "historia"),
                Module::new("desacusias", "Hearing Loss", "Desacusias"),
                Module::new("lombalgia", "Low Back Pain", "lombalgia"),
                Module::new("dislipidemias", "Dyslipidemias", "dislipidemias"),
            ],
        }
    }
}

impl QuizConfig {
    pub fn module(&self, id: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.id == id)
    }

    pub fn module_ids(&self) -> Vec<String> {
        self.modules.iter().map(|m| m.id.clone()).collect()
    }

    /// Path of the question file for `module`.
    pub fn question_path(&self, module: &Module) -> PathBuf {
        self.questions_dir.join(format!("{}.json", module.file))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.modules.is_empty() {
            return Err(ConfigError::NoModules);
        }
        let mut seen = HashSet::new();
        for module in &self.modules {
            if !seen.insert(module.id.as_str()) {
                return Err(ConfigError::DuplicateModule(module.id.clone()));
            }
        }
        Ok(())
    }
}

/// Configuration loader that merges multiple sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources.
    ///
    /// Priority (highest to lowest):
    /// 1. `HEALTH_QUIZ_*` environment variables
    /// 2. Explicit config path (if provided), else `./health-quiz.toml`
    /// 3. Default values
    pub fn load(config_path: Option<&Path>) -> Result<QuizConfig, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(QuizConfig::default()));

        match config_path {
            Some(path) => figment = figment.merge(Toml::file(path)),
            None => {
                let path = PathBuf::from(PROJECT_CONFIG_FILE);
                if path.exists() {
                    figment = figment.merge(Toml::file(path));
                }
            }
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX));

        Self::finish(figment)
    }

    /// Load from defaults and a TOML string only.
    pub fn from_toml_str(toml: &str) -> Result<QuizConfig, ConfigError> {
        let figment = Figment::new()
            .merge(Serialized::defaults(QuizConfig::default()))
            .merge(Toml::string(toml));
        Self::finish(figment)
    }

    fn finish(figment: Figment) -> Result<QuizConfig, ConfigError> {
        let config: QuizConfig = figment.extract()?;
        config.validate()?;
        tracing::debug!(
            modules = config.modules.len(),
            questions_dir = %config.questions_dir.display(),
            "configuration loaded"
        );
        Ok(config)
    }
}
