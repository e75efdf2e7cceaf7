//! HTTP registry services over a relational database.
//!
//! One binary serves either the employee registry or the transit registry,
//! chosen by configuration. See `api::router` for the route table.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod model;
