use std::fmt;

use chrono::{Local, NaiveDate};
use tracing::{debug, warn};

use crate::{
    config::ResolverConfig,
    connection::{ConnectionResolver, QueryExecutor},
    parser::ParsedFormula,
    query::{QueryError, QueryResult, SqlBuilder},
    resolver::{CellError, CellIo, CellValue, FormulaCall, Placeholders, ResolutionCache},
    schema::SchemaProvider,
};

/// Steps of one cell resolution, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionStage {
    ParameterExtraction,
    Substitution,
    Parse,
    ConnectionResolution,
    Execute,
    WriteBack,
}

impl fmt::Display for ResolutionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResolutionStage::ParameterExtraction => "parameter-extraction",
            ResolutionStage::Substitution => "substitution",
            ResolutionStage::Parse => "parse",
            ResolutionStage::ConnectionResolution => "connection-resolution",
            ResolutionStage::Execute => "execute",
            ResolutionStage::WriteBack => "write-back",
        };
        write!(f, "{}", name)
    }
}

/// Outcome of [`Resolver::resolve_cell`].
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Evaluated in this call; may hold an error value.
    Computed(CellValue),
    /// Served from the pass cache; nothing was executed or written.
    Cached(CellValue),
}

impl Resolution {
    pub fn value(&self) -> &CellValue {
        match self {
            Resolution::Computed(value) | Resolution::Cached(value) => value,
        }
    }

    pub fn is_cached(&self) -> bool {
        matches!(self, Resolution::Cached(_))
    }
}

/// Where a failed evaluation stopped, with the text the audit comment shows.
struct Failure {
    stage: ResolutionStage,
    formula: String,
    error: QueryError,
}

impl Failure {
    fn at(stage: ResolutionStage, formula: &str) -> impl FnOnce(QueryError) -> Failure + use<> {
        let formula = formula.to_string();
        move |error| Failure { stage, formula, error }
    }
}

/// Evaluates report formula cells. Errors never escape: they become error
/// values in the destination cell with the message kept in its comment.
pub struct Resolver<'a> {
    schema: &'a dyn SchemaProvider,
    connections: &'a dyn ConnectionResolver,
    executor: &'a dyn QueryExecutor,
    config: ResolverConfig,
    today: Option<NaiveDate>,
}

impl<'a> Resolver<'a> {
    pub fn new(
        schema: &'a dyn SchemaProvider,
        connections: &'a dyn ConnectionResolver,
        executor: &'a dyn QueryExecutor,
    ) -> Self {
        Self { schema, connections, executor, config: ResolverConfig::default(), today: None }
    }

    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Pins the date relative filter values (`C`, `C-1`, ...) are taken from.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn resolve_cell(
        &self,
        call: &FormulaCall,
        cells: &mut dyn CellIo,
        cache: &mut ResolutionCache,
        ambient: Option<&SqlBuilder>,
    ) -> Resolution {
        if let Some(value) = cache.get(&call.position) {
            debug!(position = %call.position, "cache hit");
            return Resolution::Cached(value.clone());
        }

        let value = match self.evaluate(call, cells, ambient) {
            Ok((formula, value)) => {
                cells.write_cell(call.destination, value.clone());
                cells.write_comment(call.destination, &formula);
                debug!(position = %call.position, stage = %ResolutionStage::WriteBack, formula = %formula, "cell resolved");
                value
            },
            Err(failure) => {
                let value = CellValue::Error(CellError::from(&failure.error));
                warn!(
                    position = %call.position,
                    stage = %failure.stage,
                    formula = %failure.formula,
                    error = %failure.error,
                    "cell resolution failed"
                );
                cells.write_cell(call.destination, value.clone());
                cells.write_comment(call.destination, &format!("{}\n{}", failure.formula, failure.error));
                value
            },
        };

        if !value.is_error() || self.config.cache_failures {
            cache.insert(call.position, value.clone());
        }
        Resolution::Computed(value)
    }

    fn evaluate(
        &self,
        call: &FormulaCall,
        cells: &dyn CellIo,
        ambient: Option<&SqlBuilder>,
    ) -> Result<(String, CellValue), Failure> {
        let params = call.params.iter()
            .map(|param| param.extract(cells).map(|value| value.to_string()))
            .collect::<QueryResult<Vec<String>>>()
            .map_err(Failure::at(ResolutionStage::ParameterExtraction, &call.text))?;

        let formula = Placeholders::substitute(&call.text, &params)
            .map_err(Failure::at(ResolutionStage::Substitution, &call.text))?;

        let mut builder = ParsedFormula::parse_detected(&formula, self.schema)
            .map(|parsed| parsed.into_builder(ambient))
            .map_err(Failure::at(ResolutionStage::Parse, &formula))?;

        let sql = builder.build_at(self.schema, self.today())
            .map_err(Failure::at(ResolutionStage::Parse, &formula))?;

        let connection_string = builder
            .resolve_connection_or(self.schema, self.connections, self.config.application_connection_key.as_deref())
            .map_err(Failure::at(ResolutionStage::ConnectionResolution, &formula))?;

        debug!(position = %call.position, sql = %sql, "executing formula query");
        let value = self.executor.execute_scalar(&sql, &connection_string)
            .map_err(|e| QueryError::execution(e.to_string()))
            .map_err(Failure::at(ResolutionStage::Execute, &formula))?;

        Ok((formula, CellValue::from_json(&value)))
    }
}
