mod codec_errors;
mod config_errors;
mod query_errors;
mod schema_errors;
mod validation_errors;

pub use codec_errors::*;
pub use config_errors::*;
pub use query_errors::*;
pub use schema_errors::*;
pub use validation_errors::*;
