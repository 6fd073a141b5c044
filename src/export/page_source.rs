use crate::export::ExportError;

/// Produces the rendered pages of a report, in order.
pub trait PageSource: Send + 'static {
    fn page_count(&self) -> usize;

    fn render_page(&mut self, index: usize) -> Result<Vec<u8>, ExportError>;
}

/// Pages already rendered in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryPages {
    pages: Vec<Vec<u8>>,
}

impl MemoryPages {
    pub fn new(pages: Vec<Vec<u8>>) -> Self {
        Self { pages }
    }
}

impl PageSource for MemoryPages {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn render_page(&mut self, index: usize) -> Result<Vec<u8>, ExportError> {
        self.pages.get(index)
            .cloned()
            .ok_or_else(|| ExportError::page(index, "no such page"))
    }
}
