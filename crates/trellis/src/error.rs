//! Error types for the Trellis engines.

/// Result type alias for view-tree operations.
pub type ViewResult<T> = std::result::Result<T, ViewError>;

/// Errors raised while assembling or materializing a view tree.
///
/// Both variants are configuration errors: they indicate a malformed view
/// template, not a runtime condition, and are raised immediately. An
/// `Include` that simply fails to resolve is *not* an error — it is dropped
/// from the materialized tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewError {
    /// The same element id was registered twice.
    #[error("duplicate view element id '{id}'")]
    DuplicateId { id: String },

    /// An include chain referred back to an id already being expanded.
    #[error("include cycle detected through id '{id}'")]
    IncludeCycle { id: String },
}

impl ViewError {
    /// Create a duplicate-id error.
    pub fn duplicate_id(id: impl Into<String>) -> Self {
        Self::DuplicateId { id: id.into() }
    }

    /// Create an include-cycle error.
    pub fn include_cycle(id: impl Into<String>) -> Self {
        Self::IncludeCycle { id: id.into() }
    }
}

/// Errors from the predicate expression language.
///
/// Callers inside the engines map these to `false` and log them; they are
/// surfaced as a typed error so hosts that validate templates ahead of time
/// can report them properly.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PredicateError {
    /// The expression could not be parsed.
    #[error("parse error in '{expression}' at offset {position}: {message}")]
    Parse {
        expression: String,
        position: usize,
        message: String,
    },

    /// The expression parsed but could not be evaluated against the scope.
    #[error("cannot evaluate '{expression}': {message}")]
    Eval {
        expression: String,
        message: String,
    },
}

impl PredicateError {
    /// Create a parse error.
    pub fn parse(
        expression: impl Into<String>,
        position: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::Parse {
            expression: expression.into(),
            position,
            message: message.into(),
        }
    }

    /// Create an evaluation error.
    pub fn eval(expression: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Eval {
            expression: expression.into(),
            message: message.into(),
        }
    }
}

/// Errors from committing an edited value back into the model.
///
/// These are the only user-code failures that cross the engine boundary:
/// a coercion handler that rejects the input propagates its error through
/// `set_text` to the widget layer, which reverts the edit and flags the
/// input visually. The engines never catch these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommitError {
    /// The value could not be coerced to the column's type.
    #[error("value '{value}' is not valid for column '{column}': {message}")]
    Invalid {
        column: String,
        value: String,
        message: String,
    },

    /// The column does not accept edits.
    #[error("column '{column}' is read-only")]
    ReadOnly { column: String },

    /// The row index does not exist in the source.
    #[error("row {row} is out of range")]
    OutOfRange { row: usize },

    /// The row source does not implement this operation.
    #[error("operation '{operation}' is not supported by this row source")]
    Unsupported { operation: String },
}

impl CommitError {
    /// Create an invalid-value error.
    pub fn invalid(
        column: impl Into<String>,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Invalid {
            column: column.into(),
            value: value.into(),
            message: message.into(),
        }
    }

    /// Create a read-only error.
    pub fn read_only(column: impl Into<String>) -> Self {
        Self::ReadOnly {
            column: column.into(),
        }
    }

    /// Create an out-of-range error.
    pub fn out_of_range(row: usize) -> Self {
        Self::OutOfRange { row }
    }

    /// Create an unsupported-operation error.
    pub fn unsupported(operation: impl Into<String>) -> Self {
        Self::Unsupported {
            operation: operation.into(),
        }
    }
}
