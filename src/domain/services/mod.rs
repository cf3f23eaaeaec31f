//! # Domain Services
//!
//! Domain services encapsulate business rules that don't naturally belong
//! to a single entity.
//!
//! - **AccessPolicy**: who may view, create, edit, comment and follow

mod access_policy;

pub use access_policy::*;
