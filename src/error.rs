//! Error types and handling for addresser.

/// Result type alias for addresser operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for address parsing and reference data loading.
///
/// Every parse failure carries the offending input so callers can log or
/// report it without keeping their own copy around.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input string was empty
    #[error("Argument must be a non-empty string")]
    EmptyInput,

    /// No state could be resolved after the ZIP code was removed
    #[error("Can not parse address. State not found. Input string: {input}")]
    StateNotFound {
        /// The address that was being parsed
        input: String,
    },

    /// More than two address lines remained after carving off place data
    #[error("Can not parse address. Too many address lines. Input string: {input}")]
    TooManyAddressLines {
        /// The address that was being parsed
        input: String,
    },

    /// None of the street grammars matched the street line
    #[error("Can not parse address. Invalid street address data. Input string: {input}")]
    InvalidStreetData {
        /// The address that was being parsed
        input: String,
    },

    /// Reference data could not be loaded or failed verification
    #[error("Data error: {message}")]
    DataError {
        /// Error message
        message: String,
    },

    /// I/O errors while reading reference data from disk
    #[error("I/O error: {source}")]
    IoError {
        /// Source error
        #[from]
        source: std::io::Error,
    },
}

impl Error {
    /// Create a new state-not-found error
    pub fn state_not_found(input: impl Into<String>) -> Self {
        Self::StateNotFound {
            input: input.into(),
        }
    }

    /// Create a new too-many-address-lines error
    pub fn too_many_address_lines(input: impl Into<String>) -> Self {
        Self::TooManyAddressLines {
            input: input.into(),
        }
    }

    /// Create a new invalid-street-data error
    pub fn invalid_street_data(input: impl Into<String>) -> Self {
        Self::InvalidStreetData {
            input: input.into(),
        }
    }

    /// Create a new data error
    pub fn data_error(message: impl Into<String>) -> Self {
        Self::DataError {
            message: message.into(),
        }
    }

    /// Whether this error was produced by a single parse call, as opposed to
    /// reference data initialisation.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyInput
                | Self::StateNotFound { .. }
                | Self::TooManyAddressLines { .. }
                | Self::InvalidStreetData { .. }
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::data_error(format!("Failed to deserialize reference table: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_input() {
        let err = Error::state_not_found("1 Two Three Four");
        assert_eq!(
            err.to_string(),
            "Can not parse address. State not found. Input string: 1 Two Three Four"
        );
        assert!(err.is_parse_error());
    }

    #[test]
    fn test_data_errors_are_not_parse_errors() {
        assert!(!Error::data_error("bad table").is_parse_error());

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "states.json");
        let err: Error = io.into();
        assert!(!err.is_parse_error());
    }
}
