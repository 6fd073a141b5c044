use crate::{
    query::{QueryError, QueryResult},
    resolver::{CellIo, CellRef, CellValue},
};

/// Source of one positional `{P}i` parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamRef {
    Cell(CellRef),
    /// Only single-cell ranges resolve.
    Range(CellRef, CellRef),
    Literal(CellValue),
}

impl ParamRef {
    /// Read the parameter's current value. Referenced cells are read as
    /// literals and never re-resolved.
    pub fn extract(&self, cells: &dyn CellIo) -> QueryResult<CellValue> {
        let position = match self {
            ParamRef::Literal(value) => return Ok(value.clone()),
            ParamRef::Cell(position) => *position,
            ParamRef::Range(start, end) if start == end => *start,
            ParamRef::Range(start, end) => {
                return QueryError::parameter(format!("range {start}:{end} is not a single cell")).err();
            },
        };

        let bounds = cells.bounds(position.sheet)
            .ok_or_else(|| QueryError::parameter(format!("sheet {} does not exist", position.sheet)))?;
        if !bounds.contains(&position) {
            return QueryError::parameter(format!("cell {position} is out of range")).err();
        }

        match cells.read_cell(position) {
            value if value.is_empty() => QueryError::parameter(format!("cell {position} is empty")).err(),
            CellValue::Error(error) => QueryError::parameter(format!("cell {position} holds {error}")).err(),
            value => Ok(value),
        }
    }
}
