pub mod sheet_position;
pub use sheet_position::*;

pub mod cell_value;
pub use cell_value::*;

pub mod cell_io;
pub use cell_io::*;

pub mod param_ref;
pub use param_ref::*;

pub mod formula_call;
pub use formula_call::*;

pub mod placeholder;
pub use placeholder::*;

pub mod resolution_cache;
pub use resolution_cache::*;

pub mod cell_resolver;
pub use cell_resolver::*;

pub mod report_pass;
pub use report_pass::*;
