//! The declarative view-composition engine.
//!
//! View templates are trees of [`Group`]s, leaf [`Item`]s, and named
//! [`Include`] placeholders. Templates are static data — built once, often
//! at startup — and materialized per rendering session into
//! [`ShadowGroup`] trees with every placeholder resolved, every
//! `defined_when` gate evaluated, and children regrouped so a layout engine
//! never mixes bare items and panels in one container pass.
//!
//! # Core Types
//!
//! - [`Group`] / [`Item`] / [`Include`]: the template node family
//! - [`ViewElements`]: the id → element registry includes resolve against
//! - [`ShadowGroup`]: the materialized, placeholder-free form
//! - [`EvalContext`]: the name→value scope predicate strings run against
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use trellis::view::{EvalContext, Group, Item, ResolveContext, ViewElements};
//!
//! // A base template extracts its includable parts…
//! let mut base = Group::new()
//!     .child(Item::new("name"))
//!     .child(Group::new().with_id("details").child(Item::new("age")));
//! let mut registry = ViewElements::new();
//! base.replace_include(&mut registry).unwrap();
//!
//! // …and materializes against a session scope.
//! let scope = EvalContext::new();
//! let mut ctx = ResolveContext::new(&registry, &scope);
//! let shadow = Arc::new(base).get_shadow(&mut ctx).unwrap();
//! assert_eq!(shadow.content().len(), 2);
//! ```

pub mod element;
pub mod group;
pub mod item;
mod parse;
pub mod predicate;
pub mod registry;
pub mod shadow;

pub use element::{Include, ViewElement};
pub use group::{Group, GroupLayout, Orientation};
pub use item::{EditorStyle, Item};
pub use predicate::{evaluate, passes, EvalContext, ScopeValue};
pub use registry::ViewElements;
pub use shadow::{ResolveContext, ShadowElement, ShadowGroup};
