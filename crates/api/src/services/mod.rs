//! Business logic, generic over the store traits.

pub mod auth;
pub mod dairy;
