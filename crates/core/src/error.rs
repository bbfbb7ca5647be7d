//! Errors raised by the domain helpers in this crate.

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A stored hash is not a PHC string Argon2 can parse.
    #[error("Malformed password hash: {0}")]
    MalformedHash(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),
}
