pub mod query_error;
pub use query_error::*;

pub mod date_normalizer;
pub use date_normalizer::*;

pub mod bound;
pub use bound::*;

pub mod operator;
pub use operator::*;

pub mod filter;
pub use filter::*;

pub mod sql_builder;
pub use sql_builder::*;

pub mod sql_generator;
pub use sql_generator::*;
