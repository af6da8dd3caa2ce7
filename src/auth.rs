//! Token model and the identifiers used to persist tokens.

pub mod id;
pub mod token;

pub use id::*;
pub use token::{record::*, secret::*};
