//! Domain services used by the gate and HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own backend access, session cookies and payload
//! interpretation so route handlers can stay focused on HTTP translation.

pub mod api_client;
pub mod backend;
pub mod logout;
pub mod mock;
pub mod records;
pub mod session;
pub mod statistics;
