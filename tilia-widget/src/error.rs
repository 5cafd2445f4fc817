/// Reasons a browser message is not a widget result.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WidgetError {
    /// The navigated URL has no fragment.
    #[error("url has no fragment")]
    NoFragment,

    /// The message is not a JSON object.
    #[error("malformed widget message: {0}")]
    Malformed(String),

    /// The message has no `result` field.
    #[error("widget message has no result")]
    MissingResult,
}

pub type Result<T> = std::result::Result<T, WidgetError>;
