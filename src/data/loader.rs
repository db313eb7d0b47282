use std::fs;
use std::path::Path;

use crate::error::LoadError;
use crate::models::Question;

/// Reads and validates one module's question file.
///
/// A missing file, malformed JSON, an empty list or any structurally
/// invalid question fails the whole file.
pub fn load_questions_from_json<P: AsRef<Path>>(path: P) -> Result<Vec<Question>, LoadError> {
    let path = path.as_ref();

    let json_content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let questions: Vec<Question> =
        serde_json::from_str(&json_content).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    if questions.is_empty() {
        return Err(LoadError::Empty {
            path: path.to_path_buf(),
        });
    }

    for (index, question) in questions.iter().enumerate() {
        question
            .validate()
            .map_err(|reason| LoadError::InvalidQuestion {
                path: path.to_path_buf(),
                index,
                reason,
            })?;
    }

    Ok(questions)
}
