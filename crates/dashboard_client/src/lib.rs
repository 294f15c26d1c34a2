pub mod api;
pub mod config;
pub mod error;
pub mod generation;
pub mod session;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use session::Credentials;
pub use session::Session;
