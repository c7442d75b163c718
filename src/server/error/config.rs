use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Required environment variable is not set or is empty.
    ///
    /// The application requires this environment variable to be defined. Check the
    /// documentation or `.env.example` file for required configuration variables.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// Optional environment variable is set but cannot be parsed.
    ///
    /// Unlike a missing optional variable, which falls back to its default, a malformed
    /// value is rejected so that a typo never silently changes behaviour.
    #[error("Invalid value '{value}' for environment variable {name}: {reason}")]
    InvalidEnvVar {
        /// Name of the offending variable
        name: String,
        /// The raw value that failed to parse
        value: String,
        /// Parser error message
        reason: String,
    },

    /// The session secret could not be turned into a cookie signing key.
    #[error("Failed to derive session signing key: {0}")]
    InvalidSessionKey(String),
}
