mod fields;
mod passwords;
mod tokens;

pub use fields::{min_length, optional_min_length, required, FieldError};
pub use passwords::{hash_password, verify_password, PasswordError};
pub use tokens::{new_reset_token, RESET_TOKEN_LIFETIME};
