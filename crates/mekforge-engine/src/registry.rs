//! # The Scoped Rule Registry
//!
//! Rules live in one of three scopes: universal, per unit category, or per
//! unit subtype. The registry owns registration, the enable switches, and
//! the resolution of a subtype's effective rule set.
//!
//! Resolution is where inheritance happens. The enabled rules of the three
//! applicable scopes are unioned, override declarations remove their
//! targets, extension declarations fold extenders into chains behind their
//! parents, and the survivors are sorted by priority. Resolved sets are
//! cached per subtype and shared by `Arc`, so repeated lookups between
//! mutations hand back the identical set. Every mutation drops the whole
//! cache; partial invalidation is not worth reasoning about for rule
//! counts this size.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

use mekforge_core::{
    CategoryMapper, RuleId, StandardCategoryMap, SubtypeSelector, UnitCategory, UnitSubtype,
};

use crate::rule::{ChainedRule, EngineRule, RuleDef, ValidationRule};

// ---------------------------------------------------------------------------
// Errors and scopes
// ---------------------------------------------------------------------------

/// Rejection reasons for a registration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The definition's id was empty or whitespace.
    #[error("rule id must not be empty")]
    EmptyRuleId,

    /// The definition overrides or extends itself.
    #[error("rule {id} cannot override or extend itself")]
    SelfReference {
        /// The offending rule id.
        id: RuleId,
    },

    /// Accepting the definition would close an override/extension cycle.
    #[error("rule {id} would form an inheritance cycle through {target}")]
    InheritanceCycle {
        /// The rule being registered.
        id: RuleId,
        /// The link target that reaches back to it.
        target: RuleId,
    },
}

/// Where a rule was registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleScope {
    /// Applies to every unit.
    Universal,
    /// Applies to every unit in one category.
    Category(UnitCategory),
    /// Applies to one subtype.
    Subtype(UnitSubtype),
}

impl fmt::Display for RuleScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Universal => f.write_str("universal"),
            Self::Category(category) => write!(f, "category:{category}"),
            Self::Subtype(subtype) => write!(f, "subtype:{subtype}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// A registered rule plus its enable switch.
///
/// The switch lives on the registry entry, not the rule, so toggling never
/// touches the shared rule object.
struct StoredRule<E> {
    rule: Arc<dyn ValidationRule<E>>,
    enabled: bool,
}

impl<E> Clone for StoredRule<E> {
    fn clone(&self) -> Self {
        Self {
            rule: Arc::clone(&self.rule),
            enabled: self.enabled,
        }
    }
}

impl<E> fmt::Debug for StoredRule<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredRule")
            .field("id", &self.rule.id())
            .field("enabled", &self.enabled)
            .finish()
    }
}

/// A subtype's effective rule set, in execution order.
///
/// Handed out behind an `Arc`; between registry mutations every caller sees
/// the identical instance.
pub struct ResolvedRules<E> {
    subtype: UnitSubtype,
    rules: Vec<Arc<dyn ValidationRule<E>>>,
}

impl<E> ResolvedRules<E> {
    fn new(subtype: UnitSubtype, rules: Vec<Arc<dyn ValidationRule<E>>>) -> Self {
        Self { subtype, rules }
    }

    /// The subtype this set was resolved for.
    pub fn subtype(&self) -> UnitSubtype {
        self.subtype
    }

    /// Number of effective rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterates the rules in execution order.
    pub fn iter(&self) -> std::slice::Iter<'_, Arc<dyn ValidationRule<E>>> {
        self.rules.iter()
    }

    /// Looks up an effective rule by id. Chains are found under the
    /// parent's id; consumed extender ids are absent.
    pub fn get(&self, id: &RuleId) -> Option<&Arc<dyn ValidationRule<E>>> {
        self.rules.iter().find(|rule| rule.id() == id)
    }

    /// Whether an effective rule with the given id exists.
    pub fn contains(&self, id: &RuleId) -> bool {
        self.get(id).is_some()
    }

    /// The effective rule ids in execution order.
    pub fn rule_ids(&self) -> Vec<RuleId> {
        self.rules.iter().map(|rule| rule.id().clone()).collect()
    }
}

impl<E> fmt::Debug for ResolvedRules<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedRules")
            .field("subtype", &self.subtype)
            .field("rules", &self.rule_ids())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// The scoped rule registry.
///
/// All mutation takes `&mut self`, so a mutation can never race a
/// resolution. The cache sits behind a lock only because resolution works
/// through `&self`.
pub struct RuleRegistry<E> {
    universal: Vec<StoredRule<E>>,
    by_category: BTreeMap<UnitCategory, Vec<StoredRule<E>>>,
    by_subtype: BTreeMap<UnitSubtype, Vec<StoredRule<E>>>,
    /// Id to scope, the uniqueness authority across all three scopes.
    index: HashMap<RuleId, RuleScope>,
    mapper: Arc<dyn CategoryMapper>,
    cache: RwLock<HashMap<UnitSubtype, Arc<ResolvedRules<E>>>>,
}

impl<E: 'static> RuleRegistry<E> {
    /// An empty registry using the standard subtype-to-category map.
    pub fn new() -> Self {
        Self::with_mapper(StandardCategoryMap)
    }

    /// An empty registry with a caller-supplied category map.
    pub fn with_mapper(mapper: impl CategoryMapper + 'static) -> Self {
        Self {
            universal: Vec::new(),
            by_category: BTreeMap::new(),
            by_subtype: BTreeMap::new(),
            index: HashMap::new(),
            mapper: Arc::new(mapper),
            cache: RwLock::new(HashMap::new()),
        }
    }

    // -- registration -------------------------------------------------------

    /// Registers a rule that applies to every unit.
    pub fn register_universal(&mut self, def: RuleDef<E>) -> Result<(), RegistryError> {
        self.register(def, RuleScope::Universal)
    }

    /// Registers a rule that applies to every unit in `category`.
    pub fn register_category(
        &mut self,
        category: UnitCategory,
        def: RuleDef<E>,
    ) -> Result<(), RegistryError> {
        self.register(def, RuleScope::Category(category))
    }

    /// Registers a rule that applies to `subtype` only.
    pub fn register_subtype(
        &mut self,
        subtype: UnitSubtype,
        def: RuleDef<E>,
    ) -> Result<(), RegistryError> {
        self.register(def, RuleScope::Subtype(subtype))
    }

    fn register(&mut self, def: RuleDef<E>, scope: RuleScope) -> Result<(), RegistryError> {
        self.validate_def(&def)?;

        let id = def.id.clone();
        let enabled = def.enabled;
        let selector = match scope {
            RuleScope::Universal => SubtypeSelector::all(),
            RuleScope::Category(category) => SubtypeSelector::category(category),
            RuleScope::Subtype(subtype) => SubtypeSelector::one(subtype),
        };
        let rule: Arc<dyn ValidationRule<E>> = Arc::new(EngineRule::from_def(def, selector));
        let stored = StoredRule { rule, enabled };

        match self.index.get(&id).copied() {
            // Same id, same scope: the newcomer takes the old order slot.
            Some(prior) if prior == scope => {
                let bucket = self.bucket_mut(scope);
                match bucket.iter_mut().find(|entry| entry.rule.id() == &id) {
                    Some(slot) => *slot = stored,
                    None => bucket.push(stored),
                }
            }
            // Same id, different scope: evict the old registration first.
            Some(prior) => {
                self.bucket_mut(prior).retain(|entry| entry.rule.id() != &id);
                self.bucket_mut(scope).push(stored);
            }
            None => self.bucket_mut(scope).push(stored),
        }
        self.index.insert(id, scope);
        self.invalidate_cache();
        Ok(())
    }

    fn validate_def(&self, def: &RuleDef<E>) -> Result<(), RegistryError> {
        if def.id.as_str().trim().is_empty() {
            return Err(RegistryError::EmptyRuleId);
        }
        for target in [def.overrides.as_ref(), def.extends.as_ref()]
            .into_iter()
            .flatten()
        {
            if *target == def.id {
                return Err(RegistryError::SelfReference {
                    id: def.id.clone(),
                });
            }
            if self.links_back_to(target, &def.id) {
                return Err(RegistryError::InheritanceCycle {
                    id: def.id.clone(),
                    target: target.clone(),
                });
            }
        }
        Ok(())
    }

    /// Walks override and extension links from `start` looking for
    /// `needle`. Dangling links simply end the walk; they are legal.
    fn links_back_to(&self, start: &RuleId, needle: &RuleId) -> bool {
        let mut stack = vec![start.clone()];
        let mut seen = HashSet::new();
        while let Some(current) = stack.pop() {
            if &current == needle {
                return true;
            }
            if !seen.insert(current.clone()) {
                continue;
            }
            if let Some(rule) = self.get_rule(&current) {
                if let Some(next) = rule.overrides() {
                    stack.push(next.clone());
                }
                if let Some(next) = rule.extends() {
                    stack.push(next.clone());
                }
            }
        }
        false
    }

    // -- removal and switches -----------------------------------------------

    /// Removes a rule wherever it is registered. Returns whether anything
    /// was removed.
    pub fn unregister(&mut self, id: &RuleId) -> bool {
        match self.index.remove(id) {
            Some(scope) => {
                self.bucket_mut(scope).retain(|entry| entry.rule.id() != id);
                self.invalidate_cache();
                true
            }
            None => false,
        }
    }

    /// Enables a rule. Returns whether the rule exists.
    pub fn enable_rule(&mut self, id: &RuleId) -> bool {
        self.set_enabled(id, true)
    }

    /// Disables a rule without removing it. Returns whether the rule
    /// exists.
    pub fn disable_rule(&mut self, id: &RuleId) -> bool {
        self.set_enabled(id, false)
    }

    fn set_enabled(&mut self, id: &RuleId, enabled: bool) -> bool {
        let Some(scope) = self.index.get(id).copied() else {
            return false;
        };
        let found = {
            let bucket = self.bucket_mut(scope);
            match bucket.iter_mut().find(|entry| entry.rule.id() == id) {
                Some(entry) => {
                    entry.enabled = enabled;
                    true
                }
                None => false,
            }
        };
        if found {
            self.invalidate_cache();
        }
        found
    }

    /// Removes every rule and cached set.
    pub fn clear(&mut self) {
        self.universal.clear();
        self.by_category.clear();
        self.by_subtype.clear();
        self.index.clear();
        self.invalidate_cache();
    }

    // -- lookups ------------------------------------------------------------

    /// Fetches a registered rule by id, in whatever scope it lives.
    pub fn get_rule(&self, id: &RuleId) -> Option<Arc<dyn ValidationRule<E>>> {
        let scope = *self.index.get(id)?;
        self.bucket(scope)
            .iter()
            .find(|entry| entry.rule.id() == id)
            .map(|entry| Arc::clone(&entry.rule))
    }

    /// The scope a rule is registered in, if any.
    pub fn scope_of(&self, id: &RuleId) -> Option<RuleScope> {
        self.index.get(id).copied()
    }

    /// Whether a rule is currently enabled. `None` when unknown.
    pub fn is_enabled(&self, id: &RuleId) -> Option<bool> {
        let scope = *self.index.get(id)?;
        self.bucket(scope)
            .iter()
            .find(|entry| entry.rule.id() == id)
            .map(|entry| entry.enabled)
    }

    /// Universal rules in registration order, disabled ones included.
    pub fn universal_rules(&self) -> Vec<Arc<dyn ValidationRule<E>>> {
        self.universal
            .iter()
            .map(|entry| Arc::clone(&entry.rule))
            .collect()
    }

    /// One category's rules in registration order, disabled ones included.
    pub fn category_rules(&self, category: UnitCategory) -> Vec<Arc<dyn ValidationRule<E>>> {
        self.bucket(RuleScope::Category(category))
            .iter()
            .map(|entry| Arc::clone(&entry.rule))
            .collect()
    }

    /// One subtype's own rules in registration order, disabled ones
    /// included. This is raw storage, not the resolved set.
    pub fn subtype_rules(&self, subtype: UnitSubtype) -> Vec<Arc<dyn ValidationRule<E>>> {
        self.bucket(RuleScope::Subtype(subtype))
            .iter()
            .map(|entry| Arc::clone(&entry.rule))
            .collect()
    }

    /// Total registered rules across all scopes.
    pub fn rule_count(&self) -> usize {
        self.index.len()
    }

    /// Whether the registry holds no rules.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// The category the registry's mapper assigns to a subtype.
    pub fn category_of(&self, subtype: UnitSubtype) -> UnitCategory {
        self.mapper.category_of(subtype)
    }

    // -- resolution ---------------------------------------------------------

    /// The effective rule set for a subtype.
    ///
    /// Served from the per-subtype cache when possible; between mutations
    /// every call returns the identical `Arc`.
    pub fn rules_for_subtype(&self, subtype: UnitSubtype) -> Arc<ResolvedRules<E>> {
        if let Some(hit) = self.cache.read().get(&subtype) {
            return Arc::clone(hit);
        }
        let resolved = Arc::new(self.resolve(subtype));
        let mut cache = self.cache.write();
        // Re-check under the write lock; a concurrent resolver may have
        // filled the slot, and its instance must win to keep identity
        // stable.
        Arc::clone(cache.entry(subtype).or_insert(resolved))
    }

    fn resolve(&self, subtype: UnitSubtype) -> ResolvedRules<E> {
        let category = self.mapper.category_of(subtype);

        // Union of enabled rules, scope-major: universal, then category,
        // then subtype, each in registration order.
        let mut union: Vec<Arc<dyn ValidationRule<E>>> = Vec::new();
        for bucket in [
            self.universal.as_slice(),
            self.bucket(RuleScope::Category(category)),
            self.bucket(RuleScope::Subtype(subtype)),
        ] {
            union.extend(
                bucket
                    .iter()
                    .filter(|entry| entry.enabled)
                    .map(|entry| Arc::clone(&entry.rule)),
            );
        }

        let mut working = union.clone();

        // Override pass. Every union member's declaration counts, even if
        // the member itself was removed by another override.
        for rule in &union {
            if let Some(target) = rule.overrides() {
                working.retain(|candidate| candidate.id() != target);
            }
        }

        // Extension pass. An extender folds into a chain at its parent's
        // position and loses its standalone entry; with no parent in the
        // working set it stays standalone. Parents already chained get
        // wrapped again, so several extenders nest in registration order.
        for rule in &union {
            let Some(target) = rule.extends() else {
                continue;
            };
            let Some(position) = working
                .iter()
                .position(|candidate| candidate.id() == target)
            else {
                continue;
            };
            let child_id = rule.id().clone();
            let parent = Arc::clone(&working[position]);
            working[position] = Arc::new(ChainedRule::new(parent, Arc::clone(rule)));
            working.retain(|candidate| candidate.id() != &child_id);
        }

        // Stable, so equal priorities keep their union order.
        working.sort_by_key(|rule| rule.priority());

        tracing::debug!(
            subtype = %subtype,
            rules = working.len(),
            "resolved effective rule set"
        );
        ResolvedRules::new(subtype, working)
    }

    fn invalidate_cache(&mut self) {
        self.cache.get_mut().clear();
    }

    fn bucket(&self, scope: RuleScope) -> &[StoredRule<E>] {
        match scope {
            RuleScope::Universal => &self.universal,
            RuleScope::Category(category) => self
                .by_category
                .get(&category)
                .map(Vec::as_slice)
                .unwrap_or(&[]),
            RuleScope::Subtype(subtype) => self
                .by_subtype
                .get(&subtype)
                .map(Vec::as_slice)
                .unwrap_or(&[]),
        }
    }

    fn bucket_mut(&mut self, scope: RuleScope) -> &mut Vec<StoredRule<E>> {
        match scope {
            RuleScope::Universal => &mut self.universal,
            RuleScope::Category(category) => self.by_category.entry(category).or_default(),
            RuleScope::Subtype(subtype) => self.by_subtype.entry(subtype).or_default(),
        }
    }
}

impl<E: 'static> Default for RuleRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for RuleRegistry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("universal", &self.universal.len())
            .field(
                "category",
                &self.by_category.values().map(Vec::len).sum::<usize>(),
            )
            .field(
                "subtype",
                &self.by_subtype.values().map(Vec::len).sum::<usize>(),
            )
            .field("cached_subtypes", &self.cache.read().len())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
