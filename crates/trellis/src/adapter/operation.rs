//! The closed set of adapter operations.
//!
//! Every question a widget can ask about a cell is one of these operations.
//! Resolution, caching, and handler registration are all keyed on this enum,
//! never on strings; [`Operation::suffix`] exists only for diagnostics and
//! logging.

/// One named capability of a tabular or list adapter.
///
/// Operations split into queries (everything except [`SetText`]) and the
/// single commit operation [`SetText`], which writes an edited value back
/// into the model and is the only operation that can fail.
///
/// [`SetText`]: Operation::SetText
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// The text displayed in a cell.
    Text,
    /// An image token shown alongside the text.
    Image,
    /// The cell background color.
    BgColor,
    /// The cell text color.
    TextColor,
    /// Tooltip text shown on hover.
    ToolTip,
    /// A font token for the cell text.
    Font,
    /// Horizontal alignment of the cell content.
    Alignment,
    /// The requested column width (fixed pixels or proportional weight).
    Width,
    /// Whether the cell accepts in-place editing.
    CanEdit,
    /// A menu descriptor for the cell's context menu.
    Menu,
    /// Commit edited text back into the model.
    SetText,
    /// The value supplied when the cell is dragged.
    Drag,
    /// Whether a dragged value may be dropped on this cell.
    CanDrop,
    /// The value to store when a drag is dropped on this cell.
    Dropped,
}

impl Operation {
    /// Every operation, in declaration order.
    pub const ALL: [Operation; 14] = [
        Operation::Text,
        Operation::Image,
        Operation::BgColor,
        Operation::TextColor,
        Operation::ToolTip,
        Operation::Font,
        Operation::Alignment,
        Operation::Width,
        Operation::CanEdit,
        Operation::Menu,
        Operation::SetText,
        Operation::Drag,
        Operation::CanDrop,
        Operation::Dropped,
    ];

    /// The stable lookup name of this operation.
    ///
    /// Used in log output and error messages; dispatch itself is on the enum.
    pub fn suffix(&self) -> &'static str {
        match self {
            Operation::Text => "text",
            Operation::Image => "image",
            Operation::BgColor => "bg_color",
            Operation::TextColor => "text_color",
            Operation::ToolTip => "tooltip",
            Operation::Font => "font",
            Operation::Alignment => "alignment",
            Operation::Width => "width",
            Operation::CanEdit => "can_edit",
            Operation::Menu => "menu",
            Operation::SetText => "set_text",
            Operation::Drag => "drag",
            Operation::CanDrop => "can_drop",
            Operation::Dropped => "dropped",
        }
    }

    /// Returns `true` for the commit operation.
    pub fn is_commit(&self) -> bool {
        matches!(self, Operation::SetText)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffixes_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for op in Operation::ALL {
            assert!(seen.insert(op.suffix()), "duplicate suffix {}", op.suffix());
        }
    }

    #[test]
    fn test_only_set_text_commits() {
        for op in Operation::ALL {
            assert_eq!(op.is_commit(), op == Operation::SetText);
        }
    }
}
