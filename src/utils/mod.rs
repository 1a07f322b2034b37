//! Stateless helpers shared by the wrappers.

pub mod stringify;
pub mod timer;
pub mod token;

pub use stringify::{short_type_name, stringify, stringify_error};
pub use timer::{TimerHandle, defer, schedule};
pub use token::{DEFAULT_TOKEN_LENGTH, generate_random_token, generate_token_with};
