use crate::resolver::{CellRef, CellValue, ParamRef, SheetPosition};

/// One formula cell to resolve: where it lives, where its result goes, its
/// text and the sources of its `{P}i` placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct FormulaCall {
    pub position: SheetPosition,
    pub destination: SheetPosition,
    pub text: String,
    pub params: Vec<ParamRef>,
}

impl FormulaCall {
    pub fn new(position: SheetPosition, text: &str) -> Self {
        Self {
            position,
            destination: position,
            text: text.to_string(),
            params: vec![],
        }
    }

    pub fn with_destination(mut self, destination: SheetPosition) -> Self {
        self.destination = destination;
        self
    }

    pub fn with_param(mut self, param: ParamRef) -> Self {
        self.params.push(param);
        self
    }

    pub fn with_cell_param(self, cell: CellRef) -> Self {
        self.with_param(ParamRef::Cell(cell))
    }

    pub fn with_literal_param(self, value: CellValue) -> Self {
        self.with_param(ParamRef::Literal(value))
    }
}
