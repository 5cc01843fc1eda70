mod generate;
mod inspect;
mod list;
mod validate;

pub use generate::{GenerateOptions, generate_command};
pub use inspect::inspect_command;
pub use list::list_command;
pub use validate::validate_command;
