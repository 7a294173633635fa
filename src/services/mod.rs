//! Domain services used by the websocket and HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own business logic — event dispatch and topic fan-out —
//! so route handlers can stay focused on protocol translation.

pub mod broadcast;
pub mod events;
