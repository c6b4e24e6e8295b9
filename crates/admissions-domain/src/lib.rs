//! Domain types shared across the admissions portal.
//!
//! Value types and validation rules with no I/O: phone normalization,
//! wire enums, document limits, pagination and application numbers.
//! No web or database framework is a dependency.

pub mod application;
pub mod document;
pub mod id;
pub mod pagination;
pub mod phone;
