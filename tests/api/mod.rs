//! HTTP route tests

mod access_tests;
mod auth_tests;
mod cache_tests;
mod comment_tests;
mod feed_tests;
mod follow_tests;
mod health_tests;
mod post_tests;
