//! # The Validation Rule Contract
//!
//! A rule is identity plus classification plus two behaviours: a cheap
//! applicability check and the evaluation itself. Rules enter the engine as
//! declarative [`RuleDef`]s; the registry turns a def into a concrete rule
//! and forces its subtype selector from the scope it was registered into,
//! so a def can never claim a wider audience than its scope grants.
//!
//! Evaluation is pure with respect to the subject. A rule reads the
//! [`ValidationContext`] and returns a [`RuleEvaluation`]; it never mutates
//! the subject and never sees the registry.

use std::fmt;
use std::sync::Arc;

use mekforge_core::{RuleCategory, RuleEvaluation, RuleId, SubtypeSelector, ValidationContext};

/// Boxed evaluation body shared by declarative rules.
pub type EvalFn<E> =
    Arc<dyn Fn(&ValidationContext<'_, E>) -> RuleEvaluation + Send + Sync>;

/// Boxed applicability predicate shared by declarative rules.
pub type PredicateFn<E> = Arc<dyn Fn(&ValidationContext<'_, E>) -> bool + Send + Sync>;

// ---------------------------------------------------------------------------
// Contract
// ---------------------------------------------------------------------------

/// The contract every resolved rule satisfies.
///
/// Consumers only ever see rules through this trait. Identity accessors are
/// stable for the life of the rule; `is_applicable` must stay cheap because
/// the validator calls it for every rule on every pass.
pub trait ValidationRule<E>: Send + Sync + fmt::Debug {
    /// Stable identifier, unique within a registry.
    fn id(&self) -> &RuleId;

    /// Human-readable display name.
    fn name(&self) -> &str;

    /// What the rule checks, in a sentence.
    fn description(&self) -> &str;

    /// The concern the rule belongs to.
    fn category(&self) -> RuleCategory;

    /// Execution ordering hint. Lower runs first; ties keep registration
    /// order.
    fn priority(&self) -> u32;

    /// The subtypes the rule applies to, as forced by its registration
    /// scope.
    fn applies_to(&self) -> &SubtypeSelector;

    /// The rule this one fully replaces, if any.
    fn overrides(&self) -> Option<&RuleId> {
        None
    }

    /// The rule this one chains after, if any.
    fn extends(&self) -> Option<&RuleId> {
        None
    }

    /// Cheap pre-check. A rule returning `false` here is skipped without a
    /// result.
    fn is_applicable(&self, _ctx: &ValidationContext<'_, E>) -> bool {
        true
    }

    /// Runs the check against the subject in the context.
    fn evaluate(&self, ctx: &ValidationContext<'_, E>) -> RuleEvaluation;
}

// ---------------------------------------------------------------------------
// Declarative definitions
// ---------------------------------------------------------------------------

/// A declarative rule definition, the only doorway into a registry.
///
/// A def carries everything about a rule except its subtype selector; the
/// registry supplies that from the registration scope. Defs are cheap to
/// clone, the behaviours are shared by reference.
pub struct RuleDef<E> {
    pub(crate) id: RuleId,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) category: RuleCategory,
    pub(crate) priority: u32,
    pub(crate) overrides: Option<RuleId>,
    pub(crate) extends: Option<RuleId>,
    pub(crate) enabled: bool,
    pub(crate) predicate: Option<PredicateFn<E>>,
    pub(crate) eval: EvalFn<E>,
}

impl<E> RuleDef<E> {
    /// Starts a definition from the required parts.
    pub fn new(
        id: impl Into<RuleId>,
        name: impl Into<String>,
        category: RuleCategory,
        priority: u32,
        eval: impl Fn(&ValidationContext<'_, E>) -> RuleEvaluation + Send + Sync + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            category,
            priority,
            overrides: None,
            extends: None,
            enabled: true,
            predicate: None,
            eval: Arc::new(eval),
        }
    }

    /// Sets the one-sentence description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets an applicability predicate evaluated before the rule body.
    #[must_use]
    pub fn with_predicate(
        mut self,
        predicate: impl Fn(&ValidationContext<'_, E>) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.predicate = Some(Arc::new(predicate));
        self
    }

    /// Declares that this rule fully replaces another.
    #[must_use]
    pub fn overrides(mut self, target: impl Into<RuleId>) -> Self {
        self.overrides = Some(target.into());
        self
    }

    /// Declares that this rule chains after another.
    #[must_use]
    pub fn extends(mut self, target: impl Into<RuleId>) -> Self {
        self.extends = Some(target.into());
        self
    }

    /// Registers the rule in a disabled state.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// The definition's identifier.
    pub fn id(&self) -> &RuleId {
        &self.id
    }

    /// The definition's display name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<E> Clone for RuleDef<E> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            category: self.category,
            priority: self.priority,
            overrides: self.overrides.clone(),
            extends: self.extends.clone(),
            enabled: self.enabled,
            predicate: self.predicate.clone(),
            eval: Arc::clone(&self.eval),
        }
    }
}

impl<E> fmt::Debug for RuleDef<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleDef")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("category", &self.category)
            .field("priority", &self.priority)
            .field("overrides", &self.overrides)
            .field("extends", &self.extends)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Concrete rules
// ---------------------------------------------------------------------------

/// A rule materialised from a def, with the selector its scope forced.
pub(crate) struct EngineRule<E> {
    id: RuleId,
    name: String,
    description: String,
    category: RuleCategory,
    priority: u32,
    selector: SubtypeSelector,
    overrides: Option<RuleId>,
    extends: Option<RuleId>,
    predicate: Option<PredicateFn<E>>,
    eval: EvalFn<E>,
}

impl<E> EngineRule<E> {
    pub(crate) fn from_def(def: RuleDef<E>, selector: SubtypeSelector) -> Self {
        Self {
            id: def.id,
            name: def.name,
            description: def.description,
            category: def.category,
            priority: def.priority,
            selector,
            overrides: def.overrides,
            extends: def.extends,
            predicate: def.predicate,
            eval: def.eval,
        }
    }
}

impl<E> ValidationRule<E> for EngineRule<E> {
    fn id(&self) -> &RuleId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn category(&self) -> RuleCategory {
        self.category
    }

    fn priority(&self) -> u32 {
        self.priority
    }

    fn applies_to(&self) -> &SubtypeSelector {
        &self.selector
    }

    fn overrides(&self) -> Option<&RuleId> {
        self.overrides.as_ref()
    }

    fn extends(&self) -> Option<&RuleId> {
        self.extends.as_ref()
    }

    fn is_applicable(&self, ctx: &ValidationContext<'_, E>) -> bool {
        if !self.selector.matches(ctx.subtype(), ctx.category()) {
            return false;
        }
        match &self.predicate {
            Some(predicate) => predicate(ctx),
            None => true,
        }
    }

    fn evaluate(&self, ctx: &ValidationContext<'_, E>) -> RuleEvaluation {
        (self.eval)(ctx)
    }
}

impl<E> fmt::Debug for EngineRule<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineRule")
            .field("id", &self.id)
            .field("category", &self.category)
            .field("priority", &self.priority)
            .field("selector", &self.selector)
            .field("overrides", &self.overrides)
            .field("extends", &self.extends)
            .finish_non_exhaustive()
    }
}

/// An extension chain. Presents the parent's identity; runs parent then
/// child and merges.
pub(crate) struct ChainedRule<E> {
    parent: Arc<dyn ValidationRule<E>>,
    child: Arc<dyn ValidationRule<E>>,
}

impl<E> ChainedRule<E> {
    pub(crate) fn new(
        parent: Arc<dyn ValidationRule<E>>,
        child: Arc<dyn ValidationRule<E>>,
    ) -> Self {
        Self { parent, child }
    }
}

impl<E> ValidationRule<E> for ChainedRule<E> {
    fn id(&self) -> &RuleId {
        self.parent.id()
    }

    fn name(&self) -> &str {
        self.parent.name()
    }

    fn description(&self) -> &str {
        self.parent.description()
    }

    fn category(&self) -> RuleCategory {
        self.parent.category()
    }

    fn priority(&self) -> u32 {
        self.parent.priority()
    }

    fn applies_to(&self) -> &SubtypeSelector {
        self.parent.applies_to()
    }

    fn overrides(&self) -> Option<&RuleId> {
        self.parent.overrides()
    }

    fn extends(&self) -> Option<&RuleId> {
        self.parent.extends()
    }

    // Either link being applicable keeps the chain alive; the extender may
    // care about subjects the parent's own predicate would wave through.
    fn is_applicable(&self, ctx: &ValidationContext<'_, E>) -> bool {
        self.parent.is_applicable(ctx) || self.child.is_applicable(ctx)
    }

    fn evaluate(&self, ctx: &ValidationContext<'_, E>) -> RuleEvaluation {
        self.parent.evaluate(ctx).and(self.child.evaluate(ctx))
    }
}

impl<E> fmt::Debug for ChainedRule<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainedRule")
            .field("parent", &self.parent.id())
            .field("child", &self.child.id())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
