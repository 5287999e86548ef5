use serde::{Deserialize, Serialize};

/// A contiguous slice of the input text, analysed as one unit.
///
/// Sections borrow from the input and carry their absolute start offset,
/// so detectors can report positions without knowing about neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Section<'a> {
    pub index: usize,
    pub text: &'a str,
    pub start_offset: usize,
}

impl<'a> Section<'a> {
    /// Absolute byte offset for a position local to this section.
    pub fn absolute(&self, local: usize) -> usize {
        self.start_offset + local
    }

    pub fn end_offset(&self) -> usize {
        self.start_offset + self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn span(&self) -> SectionSpan {
        SectionSpan {
            index: self.index,
            start_offset: self.start_offset,
            len: self.text.len(),
        }
    }
}

/// Owned summary of a section, kept in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSpan {
    pub index: usize,
    pub start_offset: usize,
    pub len: usize,
}
