pub mod user_service;
pub use user_service::{UserError, UserLifecycle};

pub mod user_service_impl;
pub use user_service_impl::SeaOrmUserService;
