//! Status and role enums for PostKasir entities.
//!
//! These are stored as TEXT in the database; repositories convert through
//! `Display`/`FromStr`, treating unknown values as data corruption.

use serde::{Deserialize, Serialize};

/// A user's role within their store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Owns the store: can approve/reject staff and manage everything.
    Owner,
    /// Day-to-day cashier/inventory access within the store.
    Staff,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Owner => write!(f, "owner"),
            Self::Staff => write!(f, "staff"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Self::Owner),
            "staff" => Ok(Self::Staff),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

/// Approval state for newly registered users.
///
/// New registrations start as [`Pending`](Self::Pending) and are moved to a
/// terminal state by a store owner. There is no self-service path out of
/// [`Rejected`](Self::Rejected).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    /// Awaiting an owner's decision. May log in to view status only.
    #[default]
    Pending,
    /// Full access, subject to store assignment.
    Approved,
    /// Denied. Terminal without manual data correction.
    Rejected,
}

impl ApprovalStatus {
    /// Whether this status is terminal (no further transitions allowed).
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }

    /// Whether a transition to `next` is allowed.
    ///
    /// Only `pending -> approved` and `pending -> rejected` are legal.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Approved) | (Self::Pending, Self::Rejected)
        )
    }
}

impl std::fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

impl std::str::FromStr for ApprovalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(format!("invalid approval status: {s}")),
        }
    }
}

/// Currency a store prices its inventory in (ISO 4217 code).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Indonesian rupiah.
    #[default]
    Idr,
    /// United States dollar.
    Usd,
    /// Singapore dollar.
    Sgd,
    /// Euro.
    Eur,
}

impl Currency {
    /// The ISO 4217 code for this currency.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Idr => "IDR",
            Self::Usd => "USD",
            Self::Sgd => "SGD",
            Self::Eur => "EUR",
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "IDR" => Ok(Self::Idr),
            "USD" => Ok(Self::Usd),
            "SGD" => Ok(Self::Sgd),
            "EUR" => Ok(Self::Eur),
            _ => Err(format!("invalid currency code: {s}")),
        }
    }
}
