pub mod connection_role;
pub use connection_role::*;

pub mod connection_settings;
pub use connection_settings::*;

pub mod query_executor;
pub use query_executor::*;

pub mod metadata_loader;
pub use metadata_loader::*;
