//! Field name mapping.

/// Pure transform applied to every output field name before it is inserted
/// into document content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldNameMapper {
    /// Emit field names unchanged.
    #[default]
    NoOp,
    /// Emit field names in uppercase.
    Uppercase,
}

impl FieldNameMapper {
    /// Map a field name to its output form.
    pub fn map(&self, name: &str) -> String {
        match self {
            Self::NoOp => name.to_string(),
            Self::Uppercase => name.to_uppercase(),
        }
    }
}
