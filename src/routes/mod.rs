//! Router Module Index
//!
//! Splits the routing table by audience. Neither module applies authentication;
//! this backend exposes a bare CRUD surface.

/// Operational endpoints (liveness).
pub mod public;

/// The `/api/{Resource}` collections, one per entity.
pub mod api;
