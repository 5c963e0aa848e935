// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::fmt;
use thiserror::Error;

/// The error type for storsign operations
#[derive(Error, Debug)]
#[error("{kind}{}: {message}", stage_suffix(.stage))]
pub struct Error {
    kind: ErrorKind,
    message: String,
    stage: Option<Stage>,
    #[source]
    source: Option<anyhow::Error>,
}

/// The kind of error that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Payload is none of the recognized shapes.
    PayloadUnsupported,

    /// Signing requires a secret key that is absent.
    CredentialMissing,

    /// The bucket region could not be resolved.
    RegionUnresolved,

    /// The underlying transport failed to send the request.
    Transport,

    /// Request cannot be built or signed (invalid header, uri, etc.)
    RequestInvalid,

    /// Configuration error (missing fields, invalid values)
    ConfigInvalid,

    /// Unexpected errors
    Unexpected,
}

/// The pipeline stage an error was raised from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Endpoint and region resolution.
    Resolve,
    /// Request assembly.
    Assemble,
    /// Request signing.
    Sign,
    /// Body materialization.
    Materialize,
    /// Transport send.
    Send,
}

impl Error {
    /// Create a new error with the given kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            stage: None,
            source: None,
        }
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Tag the error with the stage it happened in.
    ///
    /// An already tagged error keeps its original stage.
    pub fn with_stage(mut self, stage: Stage) -> Self {
        self.stage.get_or_insert(stage);
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Get the stage this error happened in, if known.
    pub fn stage(&self) -> Option<Stage> {
        self.stage
    }

    /// Get the error message without the kind and stage prefix.
    pub fn message(&self) -> &str {
        &self.message
    }
}

fn stage_suffix(stage: &Option<Stage>) -> String {
    match stage {
        Some(stage) => format!(" ({stage})"),
        None => String::new(),
    }
}

// Convenience constructors
impl Error {
    /// Create a payload unsupported error
    pub fn payload_unsupported(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PayloadUnsupported, message)
    }

    /// Create a credential missing error
    pub fn credential_missing(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CredentialMissing, message)
    }

    /// Create a region unresolved error
    pub fn region_unresolved(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RegionUnresolved, message)
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    /// Create a request invalid error
    pub fn request_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RequestInvalid, message)
    }

    /// Create a config invalid error
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    /// Create an unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::PayloadUnsupported => write!(f, "unsupported payload type"),
            ErrorKind::CredentialMissing => write!(f, "missing credentials"),
            ErrorKind::RegionUnresolved => write!(f, "region resolution failure"),
            ErrorKind::Transport => write!(f, "transport failure"),
            ErrorKind::RequestInvalid => write!(f, "invalid request"),
            ErrorKind::ConfigInvalid => write!(f, "invalid configuration"),
            ErrorKind::Unexpected => write!(f, "unexpected error"),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Resolve => write!(f, "resolve"),
            Stage::Assemble => write!(f, "assemble"),
            Stage::Sign => write!(f, "sign"),
            Stage::Materialize => write!(f, "materialize"),
            Stage::Send => write!(f, "send"),
        }
    }
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(err)
    }
}

impl From<std::fmt::Error> for Error {
    fn from(err: std::fmt::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::Error> for Error {
    fn from(err: http::Error) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::InvalidHeaderName> for Error {
    fn from(err: http::header::InvalidHeaderName) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::ToStrError> for Error {
    fn from(err: http::header::ToStrError) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::uri::InvalidUri> for Error {
    fn from(err: http::uri::InvalidUri) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::uri::InvalidUriParts> for Error {
    fn from(err: http::uri::InvalidUriParts) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_stage() {
        let err = Error::credential_missing("secret key is empty").with_stage(Stage::Sign);
        assert_eq!(
            err.to_string(),
            "missing credentials (sign): secret key is empty"
        );
        assert_eq!(err.kind(), ErrorKind::CredentialMissing);
        assert_eq!(err.stage(), Some(Stage::Sign));
    }

    #[test]
    fn test_first_stage_wins() {
        let err = Error::transport("connection reset")
            .with_stage(Stage::Send)
            .with_stage(Stage::Resolve);
        assert_eq!(err.stage(), Some(Stage::Send));
        assert_eq!(err.to_string(), "transport failure (send): connection reset");
    }

    #[test]
    fn test_display_without_stage() {
        let err = Error::config_invalid("port is not a number");
        assert_eq!(
            err.to_string(),
            "invalid configuration: port is not a number"
        );
        assert!(err.stage().is_none());
    }
}
