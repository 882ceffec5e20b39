//! Doxify: anonymous text publishing behind a slug registry

pub mod api;
pub mod config;
pub mod db;
pub mod page;
pub mod supervisor;
pub mod validation;

pub mod test_helpers;
