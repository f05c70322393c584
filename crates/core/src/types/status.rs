//! Status vocabulary for inquiries.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when parsing an unknown status string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid inquiry status: {0}")]
pub struct InvalidStatus(pub String);

/// Lifecycle status of a customer inquiry.
///
/// Inquiries are stored with a free-text status column so the back office can
/// record values outside this set; these are the values the dashboard offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InquiryStatus {
    /// Freshly submitted, nobody has replied yet.
    #[default]
    New,
    /// The atelier has reached out to the customer.
    Contacted,
    /// Nothing left to do.
    Closed,
}

impl InquiryStatus {
    /// The stored text form of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Contacted => "contacted",
            Self::Closed => "closed",
        }
    }

    /// Whether a stored status string is one of the known values.
    #[must_use]
    pub fn is_known(value: &str) -> bool {
        value.parse::<Self>().is_ok()
    }
}

impl std::fmt::Display for InquiryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for InquiryStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "contacted" => Ok(Self::Contacted),
            "closed" => Ok(Self::Closed),
            _ => Err(InvalidStatus(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for status in [
            InquiryStatus::New,
            InquiryStatus::Contacted,
            InquiryStatus::Closed,
        ] {
            assert_eq!(status.as_str().parse::<InquiryStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_unknown_status() {
        assert!(!InquiryStatus::is_known("archived"));
        assert!(!InquiryStatus::is_known("NEW"));
        assert!(InquiryStatus::is_known("contacted"));
    }

    #[test]
    fn test_default_is_new() {
        assert_eq!(InquiryStatus::default().to_string(), "new");
    }
}
