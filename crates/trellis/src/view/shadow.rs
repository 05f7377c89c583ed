//! Shadow materialization of view templates.
//!
//! A [`Group`] is static template data; a [`ShadowGroup`] is its
//! per-session, placeholder-free materialization. [`Group::get_shadow`]
//! walks the template once per rendering session:
//!
//! 1. includes are resolved against the session's [`ViewElements`] registry
//!    (misses are dropped, cycles are a configuration error),
//! 2. each child's `defined_when` predicate is evaluated against the
//!    session scope — failing children simply do not materialize,
//! 3. surviving groups recurse; surviving items are aliased as-is.
//!
//! The resulting shadow tree is cheap and disposable: every presentation
//! field reads through to the originating group, only the resolved content
//! is new. [`ShadowGroup::get_content`] then hands the layout engine either
//! a fully flattened item list or a regrouped sequence in which bare items
//! and sub-panels are never mixed at the same level.

use std::sync::Arc;

use trellis_core::logging::targets;

use crate::error::{ViewError, ViewResult};

use super::element::ViewElement;
use super::group::{Group, GroupLayout, Orientation};
use super::item::Item;
use super::predicate::{passes, EvalContext};
use super::registry::ViewElements;

/// State carried through one materialization pass.
///
/// Bundles the session registry and predicate scope with the bookkeeping the
/// pass needs: the group path (for diagnostics) and the set of include ids
/// currently being expanded (for cycle detection).
pub struct ResolveContext<'a> {
    registry: &'a ViewElements,
    scope: &'a EvalContext,
    /// Include ids on the active expansion path.
    resolving: Vec<String>,
    /// Group identifiers entered so far, outermost first.
    path: Vec<String>,
}

impl<'a> ResolveContext<'a> {
    /// Create a context over a registry and predicate scope.
    pub fn new(registry: &'a ViewElements, scope: &'a EvalContext) -> Self {
        Self {
            registry,
            scope,
            resolving: Vec::new(),
            path: Vec::new(),
        }
    }

    /// The predicate scope.
    pub fn scope(&self) -> &EvalContext {
        self.scope
    }

    /// The current group path, for diagnostics.
    pub fn scope_path(&self) -> String {
        self.path.join("/")
    }

    fn is_resolving(&self, id: &str) -> bool {
        self.resolving.iter().any(|active| active == id)
    }
}

impl Group {
    /// Materialize this template into a [`ShadowGroup`].
    ///
    /// Include placeholders are resolved against the context's registry; an
    /// id with no registration is dropped (logged, not an error), while an
    /// include chain that revisits an id being expanded fails with
    /// [`ViewError::IncludeCycle`]. Children whose `defined_when` predicate
    /// fails against the context's scope are omitted.
    pub fn get_shadow(self: &Arc<Self>, ctx: &mut ResolveContext<'_>) -> ViewResult<ShadowGroup> {
        ctx.path.push(self.get_id().to_string());
        let result = self.build_shadow(ctx);
        ctx.path.pop();
        result
    }

    fn build_shadow(self: &Arc<Self>, ctx: &mut ResolveContext<'_>) -> ViewResult<ShadowGroup> {
        let mut content = Vec::new();
        let mut groups = 0;

        for child in &self.content {
            let mut current = child.clone();
            let mut followed: Vec<String> = Vec::new();
            let mut dropped = false;

            // Chase include chains down to a concrete element.
            loop {
                let id = match &current {
                    ViewElement::Include(include) => include.id().to_string(),
                    _ => break,
                };
                if ctx.is_resolving(&id) || followed.contains(&id) {
                    return Err(ViewError::include_cycle(id));
                }
                match ctx.registry.find(&id) {
                    Some(target) => {
                        current = target.clone();
                        followed.push(id);
                    }
                    None => {
                        tracing::debug!(
                            target: targets::VIEW,
                            id = %id,
                            path = %ctx.scope_path(),
                            "include not found, dropping"
                        );
                        dropped = true;
                        break;
                    }
                }
            }
            if dropped {
                continue;
            }

            match current {
                ViewElement::Group(group) => {
                    if passes(group.defined_when(), ctx.scope) {
                        for id in &followed {
                            ctx.resolving.push(id.clone());
                        }
                        let result = group.get_shadow(ctx);
                        for _ in &followed {
                            ctx.resolving.pop();
                        }
                        content.push(ShadowElement::Group(result?));
                        groups += 1;
                    }
                }
                ViewElement::Item(item) => {
                    if passes(item.defined_when(), ctx.scope) {
                        content.push(ShadowElement::Item(item));
                    }
                }
                ViewElement::Include(_) => unreachable!("includes resolved above"),
            }
        }

        Ok(ShadowGroup {
            shadow: self.clone(),
            content,
            groups,
        })
    }

    /// The identifier used for group paths and persisted UI state: the id,
    /// else the label, else `"group"`.
    pub fn get_id(&self) -> &str {
        if !self.id().is_empty() {
            self.id()
        } else if !self.label().is_empty() {
            self.label()
        } else {
            "group"
        }
    }
}

/// One child of a materialized group.
#[derive(Debug, Clone)]
pub enum ShadowElement {
    /// A leaf entry, aliased from the template.
    Item(Arc<Item>),
    /// A materialized sub-group.
    Group(ShadowGroup),
}

impl ShadowElement {
    /// Check if this element is an item.
    pub fn is_item(&self) -> bool {
        matches!(self, Self::Item(_))
    }

    /// Check if this element is a group.
    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group(_))
    }

    /// Get the item if this is an item element.
    pub fn as_item(&self) -> Option<&Arc<Item>> {
        match self {
            Self::Item(item) => Some(item),
            _ => None,
        }
    }

    /// Get the group if this is a group element.
    pub fn as_group(&self) -> Option<&ShadowGroup> {
        match self {
            Self::Group(group) => Some(group),
            _ => None,
        }
    }
}

/// The materialized, placeholder-free form of a [`Group`].
///
/// Presentation fields read through to the shadowed template group; only
/// `content` (the resolved children) and `groups` (how many of them are
/// themselves groups) are new. Shadow trees are created fresh per rendering
/// session and thrown away with it.
#[derive(Debug, Clone)]
pub struct ShadowGroup {
    /// The originating template group, aliased.
    shadow: Arc<Group>,
    /// The resolved children.
    content: Vec<ShadowElement>,
    /// How many children are themselves shadow groups.
    groups: usize,
}

impl ShadowGroup {
    /// The originating template group.
    pub fn shadow(&self) -> &Arc<Group> {
        &self.shadow
    }

    /// The resolved children.
    pub fn content(&self) -> &[ShadowElement] {
        &self.content
    }

    /// How many children are themselves groups.
    pub fn groups(&self) -> usize {
        self.groups
    }

    /// The identifier for persisted UI state (splitter positions, selected
    /// tabs): the template id, else its label, else `"group"`.
    pub fn get_id(&self) -> &str {
        self.shadow.get_id()
    }

    /// The border label (read-through).
    pub fn label(&self) -> &str {
        self.shadow.label()
    }

    /// Orientation of the children (read-through).
    pub fn orientation(&self) -> Orientation {
        self.shadow.orientation()
    }

    /// Layout mode (read-through).
    pub fn layout(&self) -> GroupLayout {
        self.shadow.layout()
    }

    /// Whether a border is drawn (read-through).
    pub fn show_border(&self) -> bool {
        self.shadow.show_border()
    }

    /// Whether child items show their labels (read-through).
    pub fn show_labels(&self) -> bool {
        self.shadow.show_labels()
    }

    /// Whether child labels sit on the left (read-through).
    pub fn show_left(&self) -> bool {
        self.shadow.show_left()
    }

    /// Whether the group stretches (read-through).
    pub fn springy(&self) -> bool {
        self.shadow.springy()
    }

    /// Whether the group scrolls (read-through).
    pub fn scrollable(&self) -> bool {
        self.shadow.scrollable()
    }

    /// Whether this group is the initially selected tab (read-through).
    pub fn selected(&self) -> bool {
        self.shadow.selected()
    }

    /// Children per row (read-through).
    pub fn columns(&self) -> usize {
        self.shadow.columns()
    }

    /// Padding around each child (read-through).
    pub fn padding(&self) -> f32 {
        self.shadow.padding()
    }

    /// Evaluate the template's visible-when gate against a scope.
    pub fn is_visible(&self, ctx: &EvalContext) -> bool {
        self.shadow.is_visible(ctx)
    }

    /// Evaluate the template's enabled-when gate against a scope.
    pub fn is_enabled(&self, ctx: &EvalContext) -> bool {
        self.shadow.is_enabled(ctx)
    }

    /// The renderable children for the layout engine.
    ///
    /// With `allow_groups` false, nested groups are recursively replaced by
    /// their own content, spliced in place — a flat item list.
    ///
    /// With `allow_groups` true, a `Normal`-layout group that mixes bare
    /// items with sub-groups is repartitioned: each run of consecutive
    /// items is bundled into a synthetic anonymous sub-group (inheriting
    /// label policy, springiness, and orientation from this group, with no
    /// border), so the returned sequence never mixes bare items and panels.
    pub fn get_content(&self, allow_groups: bool) -> Vec<ShadowElement> {
        if !allow_groups {
            return self.flattened();
        }
        let mixed = self.groups > 0 && self.groups < self.content.len();
        if self.layout() == GroupLayout::Normal && mixed {
            return self.regrouped();
        }
        self.content.clone()
    }

    fn flattened(&self) -> Vec<ShadowElement> {
        let mut out = Vec::new();
        for element in &self.content {
            match element {
                ShadowElement::Item(_) => out.push(element.clone()),
                ShadowElement::Group(group) => out.extend(group.flattened()),
            }
        }
        out
    }

    fn regrouped(&self) -> Vec<ShadowElement> {
        let mut out = Vec::new();
        let mut run: Vec<ShadowElement> = Vec::new();
        for element in &self.content {
            match element {
                ShadowElement::Group(_) => {
                    if !run.is_empty() {
                        out.push(self.bundle(std::mem::take(&mut run)));
                    }
                    out.push(element.clone());
                }
                ShadowElement::Item(_) => run.push(element.clone()),
            }
        }
        if !run.is_empty() {
            out.push(self.bundle(run));
        }
        out
    }

    /// Wrap an item run in a synthetic anonymous sub-group.
    fn bundle(&self, content: Vec<ShadowElement>) -> ShadowElement {
        let synthetic = Group::new()
            .with_show_labels(self.show_labels())
            .with_show_left(self.show_left())
            .with_springy(self.springy())
            .with_orientation(self.orientation())
            .with_show_border(false);
        ShadowElement::Group(ShadowGroup {
            shadow: Arc::new(synthetic),
            content,
            groups: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn materialize(group: Group, registry: &ViewElements) -> ViewResult<ShadowGroup> {
        let scope = EvalContext::new();
        let mut ctx = ResolveContext::new(registry, &scope);
        Arc::new(group).get_shadow(&mut ctx)
    }

    #[test]
    fn test_include_round_trip() {
        let mut registry = ViewElements::new();
        registry
            .register(
                "extra",
                Group::new().child(Item::new("email")).child(Item::new("phone")),
            )
            .unwrap();

        let group = Group::new().child(Item::new("name")).child("<extra>");
        let shadow = materialize(group, &registry).unwrap();

        let flat = shadow.get_content(false);
        let names: Vec<_> = flat
            .iter()
            .map(|el| el.as_item().unwrap().name().to_string())
            .collect();
        assert_eq!(names, ["name", "email", "phone"]);
    }

    #[test]
    fn test_unresolved_include_is_dropped_silently() {
        let registry = ViewElements::new();
        let group = Group::new().child(Item::new("name")).child("<missing>");
        let shadow = materialize(group, &registry).unwrap();
        assert_eq!(shadow.content().len(), 1);
    }

    #[test]
    fn test_include_chain_resolves_through_aliases() {
        let mut registry = ViewElements::new();
        registry
            .register("alias", ViewElement::from("<target>"))
            .unwrap();
        registry
            .register("target", Item::new("payload").with_id("target"))
            .unwrap();

        let group = Group::new().child("<alias>");
        let shadow = materialize(group, &registry).unwrap();
        assert_eq!(shadow.content().len(), 1);
        assert_eq!(shadow.content()[0].as_item().unwrap().name(), "payload");
    }

    #[test]
    fn test_include_cycle_is_detected() {
        let mut registry = ViewElements::new();
        registry
            .register("a", Group::new().with_id("a").child("<b>"))
            .unwrap();
        registry
            .register("b", Group::new().with_id("b").child("<a>"))
            .unwrap();

        let group = Group::new().child("<a>");
        let err = materialize(group, &registry).unwrap_err();
        assert_eq!(err, ViewError::include_cycle("a"));
    }

    #[test]
    fn test_self_referential_include_is_detected() {
        let mut registry = ViewElements::new();
        registry
            .register("loop", ViewElement::from("<loop>"))
            .unwrap();

        let group = Group::new().child("<loop>");
        let err = materialize(group, &registry).unwrap_err();
        assert_eq!(err, ViewError::include_cycle("loop"));
    }

    #[test]
    fn test_defined_when_gates_children() {
        let registry = ViewElements::new();
        let scope = EvalContext::new().with("advanced", false);
        let mut ctx = ResolveContext::new(&registry, &scope);

        let group = Arc::new(
            Group::new()
                .child(Item::new("name"))
                .child(Item::new("debug_flags").with_defined_when("advanced"))
                .child(Group::new().with_defined_when("advanced").child(Item::new("x"))),
        );
        let shadow = group.get_shadow(&mut ctx).unwrap();
        assert_eq!(shadow.content().len(), 1);
        assert_eq!(shadow.groups(), 0);
    }

    #[test]
    fn test_broken_defined_when_fails_closed() {
        let registry = ViewElements::new();
        let scope = EvalContext::new();
        let mut ctx = ResolveContext::new(&registry, &scope);

        let group = Arc::new(
            Group::new()
                .child(Item::new("ok"))
                .child(Item::new("broken").with_defined_when("mode == ")),
        );
        let shadow = group.get_shadow(&mut ctx).unwrap();
        assert_eq!(shadow.content().len(), 1);
    }

    #[test]
    fn test_regrouping_invariant() {
        let registry = ViewElements::new();
        let group = Group::new()
            .child(Item::new("a"))
            .child(Item::new("b"))
            .child(Group::new().with_id("sub").child(Item::new("c")))
            .child(Item::new("d"));
        let shadow = materialize(group, &registry).unwrap();
        assert_eq!(shadow.groups(), 1);

        let content = shadow.get_content(true);
        assert_eq!(content.len(), 3);

        // [synthetic(a, b), sub, synthetic(d)] — no bare items at top level.
        assert!(content.iter().all(ShadowElement::is_group));

        let first = content[0].as_group().unwrap();
        assert_eq!(first.content().len(), 2);
        assert!(!first.show_border());
        assert_eq!(first.label(), "");

        assert_eq!(content[1].as_group().unwrap().get_id(), "sub");

        let last = content[2].as_group().unwrap();
        assert_eq!(last.content().len(), 1);
        assert_eq!(last.content()[0].as_item().unwrap().name(), "d");
    }

    #[test]
    fn test_synthetic_bundles_inherit_presentation() {
        let registry = ViewElements::new();
        let group = Group::new()
            .with_show_labels(false)
            .with_orientation(Orientation::Horizontal)
            .with_springy(true)
            .child(Item::new("a"))
            .child(Group::new().child(Item::new("b")));
        let shadow = materialize(group, &registry).unwrap();

        let content = shadow.get_content(true);
        let bundle = content[0].as_group().unwrap();
        assert!(!bundle.show_labels());
        assert!(bundle.springy());
        assert_eq!(bundle.orientation(), Orientation::Horizontal);
    }

    #[test]
    fn test_no_regrouping_when_uniform() {
        let registry = ViewElements::new();

        // All items: returned as-is.
        let items_only = Group::new().child(Item::new("a")).child(Item::new("b"));
        let shadow = materialize(items_only, &registry).unwrap();
        let content = shadow.get_content(true);
        assert_eq!(content.len(), 2);
        assert!(content.iter().all(ShadowElement::is_item));

        // All groups: returned as-is.
        let groups_only = Group::new()
            .child(Group::new().child(Item::new("a")))
            .child(Group::new().child(Item::new("b")));
        let shadow = materialize(groups_only, &registry).unwrap();
        assert_eq!(shadow.get_content(true).len(), 2);
    }

    #[test]
    fn test_no_regrouping_for_non_normal_layouts() {
        let registry = ViewElements::new();
        let group = Group::new()
            .with_layout(GroupLayout::Tabbed)
            .child(Item::new("a"))
            .child(Group::new().child(Item::new("b")));
        let shadow = materialize(group, &registry).unwrap();

        let content = shadow.get_content(true);
        assert!(content[0].is_item());
        assert!(content[1].is_group());
    }

    #[test]
    fn test_get_id_fallbacks() {
        let registry = ViewElements::new();
        let anonymous = materialize(Group::new(), &registry).unwrap();
        assert_eq!(anonymous.get_id(), "group");

        let labeled = materialize(Group::new().with_label("Tab"), &registry).unwrap();
        assert_eq!(labeled.get_id(), "Tab");

        let with_id = materialize(Group::new().with_id("main").with_label("Tab"), &registry)
            .unwrap();
        assert_eq!(with_id.get_id(), "main");
    }
}
