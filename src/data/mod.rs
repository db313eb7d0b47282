mod loader;
mod repository;

pub use loader::load_questions_from_json;
pub use repository::QuestionRepository;
