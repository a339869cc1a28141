//! Common type definitions for GoDairy.
//!
//! These types enforce invariants at the boundary: every value that reaches
//! business logic has already been validated.

pub mod code;
pub mod email;
pub mod id;
pub mod subscription;

pub use code::{DairyCode, DairyCodeError};
pub use email::{Email, EmailError};
pub use id::{DairyId, OwnerId};
pub use subscription::{AuthProvider, DeviceType, OwnerRole, PaymentStatus, Plan};
