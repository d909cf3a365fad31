//! # IO Module
//!
//! Interface layer between the presentation layer and the domain logic.
//!
//! The presentation layer only ever sees `TimeBankApi` and the DTOs of the
//! `shared` crate. Mappers translate in both directions so domain models,
//! with their credentials and persistence shape, never leak outward.

pub mod api;
pub mod mappers;

pub use api::TimeBankApi;
