pub mod config;
pub mod logging;
pub mod seed;
pub mod service;
pub mod store;

pub use service::{PathwayService, PlannedPath, ServiceError};
