//! # chainstay
//!
//! HTTP/JSON service for tracking bicycle repair-shop orders.
//!
//! Clients submit a bicycle, its condition breakdown, and the services they
//! want; staff list, inspect, update, comment on, and delete orders. A
//! minimal registration/login flow issues one-hour bearer tokens that gate
//! every write.
//!
//! ## Layout
//!
//! - [`config`]: environment-sourced process configuration
//! - [`core`]: domain types, auth, typed errors, order validation, and the
//!   store traits handlers are written against
//! - [`storage`]: MongoDB backend plus an in-memory backend used by the
//!   HTTP test suite
//! - [`server`]: shared state, route table, and request handlers
//!
//! Orders embed resolved `{id, name}` pairs for their brand and services,
//! captured from the reference collections at write time. Validation is
//! two reference reads followed by one write, with no atomicity across the
//! three operations.

pub mod config;
pub mod core;
pub mod server;
pub mod storage;
