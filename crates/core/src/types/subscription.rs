//! Subscription and account enums.
//!
//! Wire spellings are `SCREAMING_SNAKE_CASE`, matching what mobile clients
//! already consume from the login and dairy endpoints.

use serde::{Deserialize, Serialize};

/// Subscription plan tier.
///
/// The plan determines `max_customers_allowed` on the owner record; the two
/// must never disagree (see [`Plan::max_customers`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Plan {
    #[default]
    Free,
    Basic,
    Premium,
}

impl Plan {
    /// Customer limit for this plan tier.
    #[must_use]
    pub const fn max_customers(self) -> i32 {
        match self {
            Self::Free => 10,
            Self::Basic => 50,
            Self::Premium => 100,
        }
    }
}

/// Payment status of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[default]
    Trial,
    Active,
    Expired,
    Cancelled,
}

/// Third-party identity provider that verified the owner's email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthProvider {
    Google,
    Apple,
}

/// Device type reported by a client at login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceType {
    Android,
    Ios,
    Web,
}

/// Account role.
///
/// Only owners exist today; the field is kept first-class because clients
/// read it from the login response and staff roles are a planned tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OwnerRole {
    #[default]
    Owner,
}

macro_rules! impl_text_conversions {
    ($ty:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $text)),+
                }
            }
        }

        impl std::str::FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(format!(concat!("invalid ", stringify!($ty), ": {}"), s)),
                }
            }
        }
    };
}

impl_text_conversions!(Plan {
    Free => "FREE",
    Basic => "BASIC",
    Premium => "PREMIUM",
});

impl_text_conversions!(PaymentStatus {
    Trial => "TRIAL",
    Active => "ACTIVE",
    Expired => "EXPIRED",
    Cancelled => "CANCELLED",
});

impl_text_conversions!(AuthProvider {
    Google => "GOOGLE",
    Apple => "APPLE",
});

impl_text_conversions!(DeviceType {
    Android => "ANDROID",
    Ios => "IOS",
    Web => "WEB",
});

impl_text_conversions!(OwnerRole {
    Owner => "OWNER",
});
