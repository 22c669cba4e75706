use std::fmt;

use thiserror::Error;

/// A device capability the app depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Geolocation,
    Orientation,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Geolocation => "Geolocation",
            Self::Orientation => "Compass",
        })
    }
}

/// Generic label shown when a request fails without giving a reason
const GENERIC_FAILURE: &str = "Failed";

/// Errors that get shown to the user inline. None of these are fatal, and they never
/// clobber whatever was already displayed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserFacingError {
    /// This device / platform doesn't have the capability at all
    #[error("{0} not supported")]
    Unsupported(Capability),
    /// The user declined to grant access
    #[error("{0} permission denied")]
    PermissionDenied(Capability),
    /// A remote call failed, with the reason if the server gave one
    #[error("{}", .0.as_deref().unwrap_or(GENERIC_FAILURE))]
    Request(Option<String>),
}

impl UserFacingError {
    pub fn request(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        if msg.trim().is_empty() {
            Self::Request(None)
        } else {
            Self::Request(Some(msg))
        }
    }

    /// Text to put in the status line for this error
    pub fn status_line(&self) -> String {
        format!("Error: {self}")
    }
}

impl From<anyhow::Error> for UserFacingError {
    fn from(value: anyhow::Error) -> Self {
        Self::request(format!("{value:#}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            UserFacingError::Unsupported(Capability::Geolocation).to_string(),
            "Geolocation not supported"
        );
        assert_eq!(
            UserFacingError::PermissionDenied(Capability::Orientation).to_string(),
            "Compass permission denied"
        );
        assert_eq!(
            UserFacingError::request("No mosques found nearby").status_line(),
            "Error: No mosques found nearby"
        );
        assert_eq!(UserFacingError::request("  ").status_line(), "Error: Failed");
    }
}
