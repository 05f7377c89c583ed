//! End-to-end tests for the adapter resolution engine: priority ordering,
//! cache behavior, invalidation, and the width allocation law.

use std::any::Any;
use std::sync::Arc;

use parking_lot::Mutex;
use trellis::adapter::{
    allocate_widths, CellValue, Color, Column, DelegateBase, Operation, RowItem, TabularAdapter,
    MIN_COLUMN_WIDTH,
};
use trellis::CommitError;

// A two-level row hierarchy: Expense is the base, Refund the derived kind.

struct Expense {
    label: String,
    amount: i64,
}

impl RowItem for Expense {
    fn type_tags(&self) -> &'static [&'static str] {
        &["Expense"]
    }

    fn cell(&self, column_id: &str) -> CellValue {
        match column_id {
            "label" => CellValue::from(self.label.as_str()),
            "amount" => CellValue::from(self.amount),
            _ => CellValue::None,
        }
    }

    fn set_cell(&mut self, column_id: &str, value: &CellValue) -> Result<(), CommitError> {
        match column_id {
            "label" => {
                self.label = value.display();
                Ok(())
            }
            "amount" => {
                self.amount = value.display().parse().map_err(|_| {
                    CommitError::invalid(column_id, value.display(), "expected an integer")
                })?;
                Ok(())
            }
            _ => Err(CommitError::read_only(column_id)),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct Refund {
    inner: Expense,
}

impl RowItem for Refund {
    fn type_tags(&self) -> &'static [&'static str] {
        &["Refund", "Expense"]
    }

    fn cell(&self, column_id: &str) -> CellValue {
        self.inner.cell(column_id)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn columns() -> Vec<Column> {
    vec![Column::new("Label", "label"), Column::new("Amount", "amount")]
}

#[test]
fn delegate_order_beats_registration_specificity() {
    let mut adapter = TabularAdapter::new(columns());

    // The most specific convention possible on the adapter itself…
    adapter.on_type_column("Expense", "label", Operation::Text, |_| {
        CellValue::from("convention")
    });

    // …still loses to the first matching delegate, and delegate A (attached
    // first) wins over delegate B.
    let a = Arc::new(DelegateBase::new());
    a.on_column("label", Operation::Text, |_| CellValue::from("delegate-a"));
    let b = Arc::new(DelegateBase::new());
    b.on_column("label", Operation::Text, |_| CellValue::from("delegate-b"));
    adapter.add_delegate(a.clone());
    adapter.add_delegate(b);

    let rows = vec![Expense { label: "taxi".into(), amount: 12 }];
    assert_eq!(adapter.get_text(Some(&rows), 0, 0), "delegate-a");

    // When A stops accepting, B is next in line.
    a.set_accepts(false);
    assert_eq!(adapter.get_text(Some(&rows), 0, 0), "delegate-b");
}

#[test]
fn derived_type_tag_wins_over_base_and_column() {
    let mut adapter = TabularAdapter::new(columns());
    adapter.on_column("label", Operation::Text, |_| CellValue::from("column"));
    adapter.on_type_column("Expense", "label", Operation::Text, |_| {
        CellValue::from("base")
    });
    adapter.on_type_column("Refund", "label", Operation::Text, |_| {
        CellValue::from("derived")
    });

    let refunds = vec![Refund {
        inner: Expense { label: "return".into(), amount: -5 },
    }];
    assert_eq!(adapter.get_text(Some(&refunds), 0, 0), "derived");

    // A plain Expense has no "Refund" tag, so the base convention applies.
    let expenses = vec![Expense { label: "taxi".into(), amount: 12 }];
    assert_eq!(adapter.get_text(Some(&expenses), 0, 0), "base");
}

#[test]
fn repeat_queries_resolve_once_until_flushed() {
    let mut adapter = TabularAdapter::new(columns());

    let delegate = Arc::new(DelegateBase::new());
    delegate.on_column("amount", Operation::BgColor, |_| {
        CellValue::Color(Color::rgb(230, 230, 240))
    });
    adapter.add_delegate(delegate);

    let invocations = Arc::new(Mutex::new(0));
    let counting = invocations.clone();
    adapter.on_column("label", Operation::ToolTip, move |_| {
        *counting.lock() += 1;
        CellValue::from("spent on travel")
    });

    let rows = vec![
        Expense { label: "taxi".into(), amount: 12 },
        Expense { label: "rail".into(), amount: 48 },
    ];

    // Same triple, three queries: the handler runs three times (it is the
    // resolved handler), but resolution happened once — observable because
    // flushing and re-querying does not change the answer, while the
    // notification fires exactly once per flush.
    for _ in 0..3 {
        assert_eq!(adapter.get_tooltip(Some(&rows), 0, 0), "spent on travel");
    }
    assert_eq!(*invocations.lock(), 3);

    let notifications = Arc::new(Mutex::new(0));
    let n = notifications.clone();
    adapter.cache_flushed().connect(move |_| *n.lock() += 1);

    adapter.set_columns(vec![Column::new("Label", "label")]);
    assert_eq!(*notifications.lock(), 1);
    assert_eq!(adapter.get_tooltip(Some(&rows), 0, 0), "spent on travel");
}

#[test]
fn equal_results_before_and_after_cache_hit() {
    let mut adapter = TabularAdapter::new(columns());
    adapter.on_column("amount", Operation::Alignment, |_| {
        CellValue::Alignment(trellis::adapter::Alignment::Right)
    });

    let rows = vec![Expense { label: "taxi".into(), amount: 12 }];
    let first = adapter.get_alignment(Some(&rows), 0, 1);
    let second = adapter.get_alignment(Some(&rows), 0, 1);
    assert_eq!(first, second);
}

#[test]
fn width_allocation_law() {
    // Fixed 120 px, then a 2:1 weighted split of the remaining 380.
    let widths = allocate_widths(500.0, &[120.0, 0.5, 0.25], &[], &[]);
    assert_eq!(widths[0], 120.0);
    assert!((widths[1] - 253.33).abs() < 0.5);
    assert!((widths[2] - 126.67).abs() < 0.5);
    assert!(widths.iter().all(|w| *w >= MIN_COLUMN_WIDTH));

    // A 10 px viewport cannot push weighted columns below the floor.
    let floored = allocate_widths(10.0, &[0.1, 0.1], &[], &[]);
    assert_eq!(floored, vec![MIN_COLUMN_WIDTH, MIN_COLUMN_WIDTH]);
}

#[test]
fn adapter_gathers_widths_for_allocation() {
    let mut adapter = TabularAdapter::new(columns());
    adapter.on_column("label", Operation::Width, |_| CellValue::Float(120.0));
    // "amount" keeps the default width request (-1.0 → weight 0.1).

    let rows = vec![Expense { label: "taxi".into(), amount: 12 }];
    let widths = adapter.allocate(Some(&rows), 400.0, &[]);
    assert_eq!(widths, vec![120.0, 280.0]);

    // A user-resized column overrides its request outright.
    let widths = adapter.allocate(Some(&rows), 400.0, &[Some(50.0), None]);
    assert_eq!(widths, vec![50.0, 350.0]);
}

#[test]
fn set_text_commits_and_propagates_coercion_errors() {
    let adapter = TabularAdapter::new(columns());
    let mut rows = vec![Expense { label: "taxi".into(), amount: 12 }];

    adapter.set_text(&mut rows, 0, 1, "99").unwrap();
    assert_eq!(rows[0].amount, 99);

    // The coercion failure reaches the caller and the model is untouched.
    let err = adapter.set_text(&mut rows, 0, 1, "ninety-nine").unwrap_err();
    assert!(matches!(err, CommitError::Invalid { .. }));
    assert_eq!(rows[0].amount, 99);
}

#[test]
fn torn_down_source_answers_neutrally() {
    let adapter = TabularAdapter::new(columns());
    assert_eq!(adapter.len(None), 0);
    assert_eq!(adapter.get_text(None, 0, 0), "");
    assert_eq!(adapter.get_bg_color(None, 3, 1), None);
    assert_eq!(adapter.get_width(None, 0), -1.0);
}
