pub mod availability;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;

pub use availability::*;
pub use error::*;
pub use handlers::*;
pub use models::*;
pub use repository::*;
