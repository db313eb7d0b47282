mod module;
mod question;

pub use module::Module;
pub use question::{Question, QuestionType};

/// Which screen the terminal front end is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Login,
    ModuleSelection,
    Quiz,
    Review,
}
