pub mod config;
pub mod error;
pub mod location;

pub use config::load_dotenv;
pub use error::*;
pub use location::S3Location;
