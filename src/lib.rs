pub mod schema;
pub use schema::{Node, SchemaCatalog, SchemaProvider, TableSchema, TypeTag};

pub mod query;
pub use query::{Filter, Operator, ProcessingMode, QueryError, QueryResult, SqlBuilder};

pub mod connection;
pub use connection::{ConnectionResolver, ConnectionRole, ConnectionSettings, QueryExecutor};

pub mod parser;
pub use parser::{Dialect, MergePolicy, ParsedFormula};

pub mod resolver;
pub use resolver::{CellIo, CellValue, FormulaCall, ReportPass, Resolver, SheetPosition};

pub mod export;

pub mod config;
pub use config::ResolverConfig;
