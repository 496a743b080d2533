//! Handling of user secrets (passwords, PINs).

mod secret;

pub use secret::SecretString;
