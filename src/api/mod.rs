//! API Module
//!
//! HTTP handlers and routing for the cache server REST API.
//!
//! # Endpoints
//! - `PUT /set` - Store a value
//! - `POST /add` - Store a value only if absent
//! - `GET /get/*key` - Retrieve a value by key
//! - `GET /has/*key` - Check for a live entry
//! - `DELETE /del/*key` - Delete a key
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
