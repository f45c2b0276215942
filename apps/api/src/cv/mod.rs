// CV API: schema validation, persistence gateway, endpoint operations, handlers.

pub mod handlers;
pub mod service;
pub mod store;
pub mod store_memory;
pub mod store_pg;
pub mod validation;
