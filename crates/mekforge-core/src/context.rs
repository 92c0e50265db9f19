//! # Validation Context and Options
//!
//! A [`ValidationContext`] is assembled fresh for every validation pass and
//! dropped when the pass ends. It carries a borrowed view of the subject,
//! the subject's resolved taxonomy, the caller's options, and a scratch
//! cache that rules may use to share derived values within the pass.
//!
//! Nothing in here outlives a pass. Cross-pass caching belongs to the
//! registry, not the context.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde_json::Value;

use crate::category::RuleCategory;
use crate::identity::RuleId;
use crate::unit::{UnitCategory, UnitSubtype};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Caller-supplied knobs for a single validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Rule ids to skip outright.
    pub skip_rules: BTreeSet<RuleId>,
    /// When set, only rules in these categories run.
    pub categories: Option<BTreeSet<RuleCategory>>,
    /// Stop the pass once this many error findings have accumulated.
    pub max_errors: Option<usize>,
}

impl ValidationOptions {
    /// Options that run every rule with no ceiling.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule id to the skip list.
    #[must_use]
    pub fn skip_rule(mut self, id: impl Into<RuleId>) -> Self {
        self.skip_rules.insert(id.into());
        self
    }

    /// Restricts the pass to the given categories.
    #[must_use]
    pub fn with_categories(mut self, categories: impl IntoIterator<Item = RuleCategory>) -> Self {
        self.categories = Some(categories.into_iter().collect());
        self
    }

    /// Caps the number of error findings before the pass stops.
    #[must_use]
    pub fn with_max_errors(mut self, max_errors: usize) -> Self {
        self.max_errors = Some(max_errors);
        self
    }

    /// Whether the given rule id is on the skip list.
    pub fn skips(&self, id: &RuleId) -> bool {
        self.skip_rules.contains(id)
    }

    /// Whether rules in the given category should run this pass.
    pub fn wants_category(&self, category: RuleCategory) -> bool {
        match &self.categories {
            None => true,
            Some(set) => set.contains(&category),
        }
    }

    /// The effective error ceiling. A configured ceiling of zero means
    /// no ceiling at all.
    pub fn error_ceiling(&self) -> Option<usize> {
        self.max_errors.filter(|max| *max > 0)
    }
}

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// Per-pass view handed to every rule.
///
/// The context borrows the subject for the duration of the pass, so rules
/// can never mutate it. The scratch cache is shared across all rules in the
/// same pass; a later rule sees values cached by an earlier one.
pub struct ValidationContext<'a, E> {
    entity: &'a E,
    subtype: UnitSubtype,
    category: UnitCategory,
    options: &'a ValidationOptions,
    scratch: RefCell<HashMap<String, Value>>,
}

impl<'a, E> ValidationContext<'a, E> {
    /// Builds a context for one pass over one subject.
    pub fn new(
        entity: &'a E,
        subtype: UnitSubtype,
        category: UnitCategory,
        options: &'a ValidationOptions,
    ) -> Self {
        Self {
            entity,
            subtype,
            category,
            options,
            scratch: RefCell::new(HashMap::new()),
        }
    }

    /// The subject under validation.
    pub fn entity(&self) -> &'a E {
        self.entity
    }

    /// The subject's subtype.
    pub fn subtype(&self) -> UnitSubtype {
        self.subtype
    }

    /// The subject's resolved category.
    pub fn category(&self) -> UnitCategory {
        self.category
    }

    /// The options governing this pass.
    pub fn options(&self) -> &ValidationOptions {
        self.options
    }

    /// Returns a clone of a cached scratch value, if present.
    pub fn cached(&self, key: &str) -> Option<Value> {
        self.scratch.borrow().get(key).cloned()
    }

    /// Stores a scratch value under the given key, replacing any prior value.
    pub fn cache_put(&self, key: impl Into<String>, value: Value) {
        self.scratch.borrow_mut().insert(key.into(), value);
    }

    /// Returns the cached value for `key`, computing and caching it on a miss.
    ///
    /// The closure runs with no borrow of the cache held, so it may itself
    /// read or write other scratch keys.
    pub fn cached_or_compute<F>(&self, key: &str, compute: F) -> Value
    where
        F: FnOnce() -> Value,
    {
        if let Some(hit) = self.scratch.borrow().get(key).cloned() {
            return hit;
        }
        let value = compute();
        self.scratch
            .borrow_mut()
            .insert(key.to_owned(), value.clone());
        value
    }

    /// Number of scratch entries cached so far this pass.
    pub fn scratch_len(&self) -> usize {
        self.scratch.borrow().len()
    }
}

impl<E> fmt::Debug for ValidationContext<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The subject itself is deliberately not printed; it may be large
        // and is not required to implement Debug.
        f.debug_struct("ValidationContext")
            .field("subtype", &self.subtype)
            .field("category", &self.category)
            .field("scratch_entries", &self.scratch.borrow().len())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
