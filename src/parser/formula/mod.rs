pub mod argument;
pub use argument::*;

pub mod string_parser;
pub use string_parser::*;

pub mod args_parser;
pub use args_parser::*;

pub mod formula_call;
pub use formula_call::*;

pub mod filter_arg;
pub use filter_arg::*;
