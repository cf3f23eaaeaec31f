//! HTTP Layer
//!
//! Routes, handlers, extractors and the HTML views they render.

pub mod extractors;
pub mod forms;
pub mod handlers;
pub mod routes;
pub mod views;
