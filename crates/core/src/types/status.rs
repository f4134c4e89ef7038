//! Account lifecycle status and the administrator actions it permits.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a registrant's account.
///
/// Accounts are created `pending` (or `approved` for the bootstrap
/// administrator) and move between `approved` and `rejected` only through
/// explicit administrator action. No transition leads back to `pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl AccountStatus {
    /// Whether an administrator may move an account from `self` to `next`.
    ///
    /// Encodes the full transition table: a pending account can be approved
    /// or rejected, an approved account can be revoked, a rejected account
    /// can be reactivated. Self-transitions and any return to `Pending` are
    /// illegal.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Approved)
                | (Self::Pending, Self::Rejected)
                | (Self::Approved, Self::Rejected)
                | (Self::Rejected, Self::Approved)
        )
    }

    /// The administrator actions offered for an account in this status.
    #[must_use]
    pub const fn available_actions(self) -> &'static [AdminAction] {
        match self {
            Self::Pending => &[AdminAction::Approve, AdminAction::Reject],
            Self::Approved => &[AdminAction::Revoke],
            Self::Rejected => &[AdminAction::Reactivate],
        }
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

/// Error parsing an [`AccountStatus`] from a string.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid account status: {0}")]
pub struct StatusParseError(pub String);

impl std::str::FromStr for AccountStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(StatusParseError(other.to_owned())),
        }
    }
}

/// An action an administrator can issue against an account.
///
/// Four labels map onto two target statuses; which label is shown depends on
/// the account's current status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminAction {
    /// Grant access to a pending account.
    Approve,
    /// Deny access to a pending account.
    Reject,
    /// Withdraw access from an approved account.
    Revoke,
    /// Restore access to a rejected account.
    Reactivate,
}

impl AdminAction {
    /// The status this action moves the account into.
    #[must_use]
    pub const fn target(self) -> AccountStatus {
        match self {
            Self::Approve | Self::Reactivate => AccountStatus::Approved,
            Self::Reject | Self::Revoke => AccountStatus::Rejected,
        }
    }
}
