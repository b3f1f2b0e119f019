pub mod compose;
pub mod persist;
pub mod shell;
