use thiserror::Error;

/// Errors produced while capturing, resolving, or acting on a page
#[derive(Debug, Error)]
pub enum FleroviumError {
    /// The browser driver was used before a session or tab existed
    #[error("Browser session not initialized: {0}")]
    NotInitialized(String),

    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    #[error("Failed to connect to browser: {0}")]
    ConnectionFailed(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    /// Mouse or keyboard input could not be delivered
    #[error("Interaction failed: {0}")]
    InteractionFailed(String),

    #[error("Script evaluation failed: {0}")]
    EvaluationFailed(String),

    #[error("Screenshot failed: {0}")]
    ScreenshotFailed(String),

    /// Transport error or non-2xx status from the inference service
    #[error("Inference service request failed: {0}")]
    NetworkFailure(String),

    /// The inference service answered with JSON of an unexpected shape
    #[error("Malformed inference response: {0}")]
    MalformedResponse(String),

    #[error("No predictions found")]
    NoPredictions,

    /// Neither detection classes nor classification summaries matched the label
    #[error("No matching class found for: {0}")]
    NoMatchingClass(String),

    #[error("No table found at ({x}, {y})")]
    NoTableFound { x: f64, y: f64 },

    /// A resolution path produced nothing that can be acted on
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Tool '{tool}' failed: {reason}")]
    ToolExecutionFailed { tool: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, FleroviumError>;
