pub mod error;
pub mod handlers;
pub mod models;
pub mod price_calculator;
pub mod refund_policy;
pub mod repository;
pub mod service;
pub mod status_machine;
pub mod sweeper;

pub use error::*;
pub use handlers::*;
pub use models::*;
pub use price_calculator::*;
pub use refund_policy::*;
pub use repository::*;
pub use service::*;
pub use status_machine::*;
