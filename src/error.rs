// Copyright (c) 2022 Espresso Systems (espressosys.com)
// This file is part of the Zenodo Deposit library.

// This program is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// This program is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
// You should have received a copy of the GNU General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.

use snafu::{IntoError, Snafu};
use std::path::PathBuf;
use surf::StatusCode;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T, E = DepositError> = std::result::Result<T, E>;

/// Errors returned by deposition operations.
///
/// [MissingToken](DepositError::MissingToken), [ReadFile](DepositError::ReadFile) and
/// [InvalidUrl](DepositError::InvalidUrl) are raised before any request is sent. Every other
/// variant describes a request which reached the network.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum DepositError {
    #[snafu(display("access token not set, use Config::set_access_token"))]
    MissingToken,

    #[snafu(display("invalid configuration: {}", message))]
    Config { message: String },

    #[snafu(display("invalid request URL {}: {}", url, source))]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    #[snafu(display("failed to read {}: {}", path.display(), source))]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("failed to encode request body: {}", source))]
    Encode { source: serde_json::Error },

    /// The request could not be completed. The source is the transport error, unchanged.
    #[snafu(display("request failed: {}", source))]
    Transport { source: BoxError },

    #[snafu(display("couldn't read response from zenodo: {}", source))]
    ReadBody { source: BoxError },

    /// The response had the expected status but its body did not match the expected structure.
    #[snafu(display("couldn't decode response from zenodo: {}", source))]
    Decode { source: serde_json::Error },

    /// The service answered with a status other than the one the operation expects.
    ///
    /// `body` is the response body verbatim; the service describes the failure there.
    #[snafu(display("couldn't {} ({}): {}", operation, status, body))]
    Rejected {
        operation: &'static str,
        status: StatusCode,
        body: String,
    },
}

impl DepositError {
    /// The HTTP status of a rejected request.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            DepositError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The raw response body of a rejected request.
    pub fn body(&self) -> Option<&str> {
        match self {
            DepositError::Rejected { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Whether the request was refused by the service, as opposed to failing locally or in
    /// transit.
    pub fn is_rejected(&self) -> bool {
        matches!(self, DepositError::Rejected { .. })
    }
}

/// Context for embedding network client errors into [DepositError].
///
/// This type implements the [IntoError] trait from SNAFU, so it can be used with
/// [ResultExt::context](snafu::ResultExt::context) just like automatically generated SNAFU
/// contexts. `surf::Error` does not implement [std::error::Error] itself, so the error it wraps
/// is unpacked and kept as the source of a [Transport](DepositError::Transport) error.
pub struct ClientError;

impl IntoError<DepositError> for ClientError {
    type Source = surf::Error;

    fn into_error(self, source: Self::Source) -> DepositError {
        TransportSnafu.into_error(source.into_inner().into())
    }
}

/// Same as [ClientError], for failures while reading a response body.
pub struct BodyError;

impl IntoError<DepositError> for BodyError {
    type Source = surf::Error;

    fn into_error(self, source: Self::Source) -> DepositError {
        ReadBodySnafu.into_error(source.into_inner().into())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rejected_carries_status_and_body() {
        let err = RejectedSnafu {
            operation: "get deposition",
            status: StatusCode::NotFound,
            body: r#"{"message": "PID does not exist.", "status": 404}"#,
        }
        .build();
        assert_eq!(err.status(), Some(StatusCode::NotFound));
        assert!(err.is_rejected());
        assert_eq!(
            err.body(),
            Some(r#"{"message": "PID does not exist.", "status": 404}"#)
        );
        let msg = err.to_string();
        assert!(msg.starts_with("couldn't get deposition (404"));
        assert!(msg.contains("PID does not exist."));
    }

    #[test]
    fn transport_keeps_source() {
        let source = surf::Error::from_str(StatusCode::BadGateway, "connection reset");
        let err = ClientError.into_error(source);
        assert!(matches!(err, DepositError::Transport { .. }));
        assert!(err.to_string().contains("connection reset"));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn precondition_errors_have_no_status() {
        let err = MissingTokenSnafu.build();
        assert_eq!(err.status(), None);
        assert!(!err.is_rejected());
        assert!(err.to_string().contains("access token"));
    }
}
