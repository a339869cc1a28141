//! Domain types for owners and dairies.
//!
//! These are validated domain objects, separate from database row shapes.
//! Anything deserialized from the store goes through the typed parsers in
//! `godairy-core` first.

pub mod dairy;
pub mod owner;

pub use dairy::Dairy;
pub use owner::Owner;
