pub mod controller;
pub mod model;
pub mod router;
pub mod service;
pub mod workflow;

pub use model::*;
pub use router::init_sessions_router;
