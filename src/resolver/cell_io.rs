use crate::resolver::{CellValue, SheetBounds, SheetPosition};

/// Spreadsheet collaborator the resolver reads parameters from and writes
/// results into.
pub trait CellIo {
    fn read_cell(&self, position: SheetPosition) -> CellValue;

    fn write_cell(&mut self, position: SheetPosition, value: CellValue);

    fn write_comment(&mut self, position: SheetPosition, text: &str);

    /// `None` when the sheet does not exist.
    fn bounds(&self, sheet: usize) -> Option<SheetBounds>;
}
