use indexmap::IndexMap;

use crate::resolver::{CellValue, SheetPosition};

/// Values resolved during one report pass, by formula position.
#[derive(Debug, Clone, Default)]
pub struct ResolutionCache {
    entries: IndexMap<SheetPosition, CellValue>,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, position: &SheetPosition) -> Option<&CellValue> {
        self.entries.get(position)
    }

    pub fn insert(&mut self, position: SheetPosition, value: CellValue) {
        self.entries.insert(position, value);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
