pub mod formula_parser;
pub use formula_parser::*;

pub mod parse_error;
pub use parse_error::*;

pub mod word_comparer;
pub use word_comparer::*;

pub mod formula_comparers;
pub use formula_comparers::*;

pub mod formula;

pub mod dialect;
pub use dialect::*;

pub mod merge_policy;
pub use merge_policy::*;

pub mod parsed_formula;
pub use parsed_formula::*;
