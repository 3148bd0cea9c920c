// ABOUTME: User roles and client categories that shape which forms and tour steps apply

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Visit permissions granted to the signed-in representative
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Medical visits only (doctors)
    Medical,
    /// Commercial visits only (pharmacies, wholesalers)
    Commercial,
    /// Both visit types
    #[default]
    Hybrid,
}

impl Role {
    pub const fn can_medical(self) -> bool {
        matches!(self, Self::Medical | Self::Hybrid)
    }

    pub const fn can_commercial(self) -> bool {
        matches!(self, Self::Commercial | Self::Hybrid)
    }

    pub const fn all() -> &'static [Role] {
        &[Self::Medical, Self::Commercial, Self::Hybrid]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Medical => "Medical",
            Self::Commercial => "Commercial",
            Self::Hybrid => "Medical + Commercial",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Kind of commercial client an order or commercial visit targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientType {
    Pharmacy,
    Wholesaler,
    Clinic,
}

impl ClientType {
    pub const fn all() -> &'static [ClientType] {
        &[Self::Pharmacy, Self::Wholesaler, Self::Clinic]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Pharmacy => "Pharmacy",
            Self::Wholesaler => "Wholesaler",
            Self::Clinic => "Clinic",
        }
    }

    /// Next type in the selector, wrapping around; `None` selects the first
    pub fn cycle(current: Option<Self>) -> Self {
        let all = Self::all();
        current
            .and_then(|c| all.iter().position(|t| *t == c))
            .map_or(all[0], |idx| all[(idx + 1) % all.len()])
    }
}

impl fmt::Display for ClientType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_permissions() {
        assert!(Role::Medical.can_medical());
        assert!(!Role::Medical.can_commercial());
        assert!(Role::Commercial.can_commercial());
        assert!(!Role::Commercial.can_medical());
        assert!(Role::Hybrid.can_medical() && Role::Hybrid.can_commercial());
    }

    #[test]
    fn test_client_type_cycle_wraps() {
        assert_eq!(ClientType::cycle(None), ClientType::Pharmacy);
        assert_eq!(ClientType::cycle(Some(ClientType::Pharmacy)), ClientType::Wholesaler);
        assert_eq!(ClientType::cycle(Some(ClientType::Clinic)), ClientType::Pharmacy);
    }
}
