//! Client editing surface: an owned draft of one CV, per-section editing
//! state, and the HTTP client that loads and saves it.

pub mod client;
pub mod item;
pub mod sections;
pub mod session;
