pub mod export_error;
pub use export_error::*;

pub mod page_source;
pub use page_source::*;

pub mod export_job;
pub use export_job::*;
