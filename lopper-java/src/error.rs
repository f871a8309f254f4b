use facet::Facet;
use lopper::DiffError;

/// Errors raised by the Java front end.
#[derive(Facet, Debug, Clone, PartialEq, Eq)]
#[facet(derive(Error))]
#[repr(u8)]
pub enum JavaError {
    /// the Java grammar is incompatible with the linked tree-sitter runtime
    LanguageUnavailable,

    /// parser returned no syntax tree
    NoTree,

    /// diff failed: {cause}
    Diff { cause: DiffError },
}

impl From<DiffError> for JavaError {
    fn from(cause: DiffError) -> Self {
        JavaError::Diff { cause }
    }
}
