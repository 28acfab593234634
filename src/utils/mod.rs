//! Project-specific utilities live here.

pub mod schema;
