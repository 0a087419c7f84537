pub mod config;
pub mod error;
pub mod types;

pub use config::InkwellConfig;
pub use error::{InkwellError, Result};
pub use types::{AspectRatio, MediaType, PostData, PostType, PublishResult, ResponseType};
