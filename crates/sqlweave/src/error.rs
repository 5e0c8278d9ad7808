use thiserror::Error;

#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("Syntax error near '{0}'")]
    Syntax(String),

    #[error("Unbalanced parentheses or quotes in template")]
    Unbalanced,

    #[error("Slot name '{0}' must be an identifier")]
    InvalidSlotName(String),

    #[error("Unknown slot '{0}' in value mapping")]
    UnknownSlot(String),

    #[error("'{value}' is not a valid {kind}")]
    InvalidIdentifier { value: String, kind: &'static str },

    #[error("Placeholders are not permitted in the '{clause}' clause")]
    PlaceholderNotAllowed { clause: String },
}

pub type Result<T> = std::result::Result<T, RewriteError>;
