pub mod error;
pub mod handlers;
pub mod server;

use std::sync::Arc;

use crate::db::DiningStore;

/// Router state: the store shared by every handler
pub type SharedStore = Arc<dyn DiningStore>;

pub use error::{ApiError, ApiResult};
pub use server::{create_app, create_router, run_server};
