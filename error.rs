/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

/// Why a visit's request failed.
///
/// Only surfaced to the host through
/// [`SessionDelegate::session_did_fail_request`](crate::SessionDelegate::session_did_fail_request);
/// the session itself recovers by moving the visit to `Failed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisitError {
    /// The server answered with a status outside the accepted range.
    HttpFailure { status: u16 },
    /// The request never produced an HTTP response.
    NetworkFailure { message: String },
}

impl VisitError {
    /// Map a status reported by the in-page adapter. The adapter reports `0`
    /// when the request did not reach the server.
    pub(crate) fn from_adapter_status(status: u16) -> Self {
        if status == 0 {
            Self::NetworkFailure {
                message: "request did not reach the server".to_string(),
            }
        } else {
            Self::HttpFailure { status }
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpFailure { status } => Some(*status),
            Self::NetworkFailure { .. } => None,
        }
    }
}

impl std::fmt::Display for VisitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HttpFailure { status } => write!(f, "HTTP request failed with status {status}"),
            Self::NetworkFailure { message } => write!(f, "network failure: {message}"),
        }
    }
}

impl std::error::Error for VisitError {}

/// Errors from loading a [`SessionConfig`](crate::SessionConfig).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Io(String),
    Parse(String),
    InvalidStatusRange { min: u16, max: u16 },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {e}"),
            Self::Parse(e) => write!(f, "Parse error: {e}"),
            Self::InvalidStatusRange { min, max } => {
                write!(f, "success status range {min}..={max} is empty")
            },
        }
    }
}

impl std::error::Error for ConfigError {}
