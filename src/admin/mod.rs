//! Admin-only surface: stats, user management, config editing, data
//! export.

pub mod routes;

pub use routes::admin_routes;
