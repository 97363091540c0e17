//! Primitives shared by every crate in the marketplace workspace.
mod kobo;

pub mod helpers;
pub mod op;
mod secret;

pub use kobo::{Kobo, KoboConversionError, NAIRA_CURRENCY_CODE};
pub use secret::Secret;
