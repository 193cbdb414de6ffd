//! Pure domain logic for subscription matching.

pub mod filter;
