use serde::{Deserialize, Serialize};

/// A named topic grouping a fixed set of questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    /// Unique key, also used to namespace stored progress.
    pub id: String,
    /// Display label.
    pub name: String,
    /// Stem of the question file, resolved as `<questions_dir>/<file>.json`.
    pub file: String,
}

impl Module {
    pub fn new(id: impl Into<String>, name: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            file: file.into(),
        }
    }
}
