//! The reply grammar shared by the prompt and the parser
//!
//! A task block is six bold field markers in this exact order, each followed
//! by its value. The prompt template teaches the model this layout and the
//! parser reads it back, so both sides take the markers from here.

/// Bumped whenever a marker is renamed, added or reordered
pub const GRAMMAR_VERSION: u32 = 1;

/// Fields of a task block, in reply order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Heading,
    Priority,
    Timeline,
    Dependencies,
    DueDate,
    Matter,
}

impl Field {
    /// All fields in the order they must appear
    pub const ORDER: [Field; 6] = [
        Field::Heading,
        Field::Priority,
        Field::Timeline,
        Field::Dependencies,
        Field::DueDate,
        Field::Matter,
    ];

    /// The literal marker introducing this field
    pub fn marker(self) -> &'static str {
        match self {
            Field::Heading => "**Heading:**",
            Field::Priority => "**Priority:**",
            Field::Timeline => "**Timeline:**",
            Field::Dependencies => "**Dependencies:**",
            Field::DueDate => "**Due Date:**",
            Field::Matter => "**Matter:**",
        }
    }
}

/// Marker literals in reply order
pub fn markers() -> impl Iterator<Item = &'static str> {
    Field::ORDER.iter().map(|f| f.marker())
}

/// True if every marker appears in `text`, each after the previous one
pub fn contains_markers_in_order(text: &str) -> bool {
    let mut cursor = 0;
    for marker in markers() {
        match text[cursor..].find(marker) {
            Some(offset) => cursor += offset + marker.len(),
            None => return false,
        }
    }
    true
}
