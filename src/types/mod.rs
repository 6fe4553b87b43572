mod error;
mod request;
mod response;

pub use error::ErrorResponse;
pub use request::{Identity, ResolvePath};
pub use response::{ResolutionResult, CDN_CACHE_CONTROL};
