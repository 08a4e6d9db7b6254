use thiserror::Error;

/// Fatal problems with the season input files.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("required data file not found: {path}")]
    MissingFile { path: String },

    #[error("season table {path} contains no data")]
    EmptyData { path: String },

    #[error("season table {path} is missing required columns: {}", .missing.join(", "))]
    Schema { path: String, missing: Vec<String> },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid CSV in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("{path} row {row}: invalid `{field}`: {reason}")]
    Field {
        path: String,
        row: usize,
        field: &'static str,
        reason: String,
    },
}

/// Failure talking to the FPL API.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    /// Errors that no other gameweek can recover from: a rejected credential
    /// or a malformed base url.
    pub fn is_fatal(&self) -> bool {
        match self {
            FetchError::InvalidUrl { .. } => true,
            FetchError::Status { status, .. } => matches!(status, 401 | 403),
            _ => false,
        }
    }

    /// Errors worth repeating the same request for.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Transport { .. } => true,
            FetchError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown chip '{0}'")]
pub struct UnknownChip(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    fn status(status: u16) -> FetchError {
        FetchError::Status {
            url: "https://example.test".to_string(),
            status,
        }
    }

    #[test]
    fn test_credential_rejection_is_fatal() {
        assert!(status(401).is_fatal());
        assert!(status(403).is_fatal());
        assert!(!status(404).is_fatal());
        assert!(!status(503).is_fatal());
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(status(429).is_retryable());
        assert!(status(500).is_retryable());
        assert!(!status(404).is_retryable());
        assert!(!status(401).is_retryable());
    }

    #[test]
    fn test_schema_error_lists_columns() {
        let err = LoadError::Schema {
            path: "season.csv".to_string(),
            missing: vec!["bench".to_string(), "chip".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "season table season.csv is missing required columns: bench, chip"
        );
    }
}
