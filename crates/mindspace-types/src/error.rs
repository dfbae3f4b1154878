use thiserror::Error;

/// Errors related to authentication and account management.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid or expired token")]
    InvalidToken,

    #[error("token subject does not resolve to a known user")]
    UnknownSubject,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("email '{0}' is already registered")]
    EmailTaken(String),

    #[error("username '{0}' is already taken")]
    UsernameTaken(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("token error: {0}")]
    Token(String),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Errors related to conversations and messages.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("conversation not found")]
    ConversationNotFound,

    #[error("user is not a participant of this conversation")]
    NotParticipant,

    #[error("storage error: {0}")]
    Storage(String),
}

/// Errors related to session bookings.
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("booking not found")]
    NotFound,

    #[error("psychologist not found")]
    PsychologistNotFound,

    #[error("storage error: {0}")]
    Storage(String),
}

/// Errors related to the materials library.
#[derive(Debug, Error)]
pub enum MaterialError {
    #[error("material not found")]
    NotFound,

    #[error("category '{0}' already exists")]
    CategoryConflict(String),

    #[error("only psychologists may publish materials")]
    Forbidden,

    #[error("storage error: {0}")]
    Storage(String),
}

/// Errors from repository operations (used by trait definitions in mindspace-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

impl From<RepositoryError> for AuthError {
    fn from(e: RepositoryError) -> Self {
        AuthError::Storage(e.to_string())
    }
}

impl From<RepositoryError> for ChatError {
    fn from(e: RepositoryError) -> Self {
        ChatError::Storage(e.to_string())
    }
}

impl From<RepositoryError> for BookingError {
    fn from(e: RepositoryError) -> Self {
        BookingError::Storage(e.to_string())
    }
}

impl From<RepositoryError> for MaterialError {
    fn from(e: RepositoryError) -> Self {
        MaterialError::Storage(e.to_string())
    }
}
