mod validator;
mod violation;


pub use validator::{Validator, Verdict};
pub use violation::{Violation, ViolationKind};

pub(crate) use violation::value_type_name;
