//! Computed style values.

use std::collections::BTreeMap;
use std::collections::btree_map;

/// Resolved value of one property.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "cli",
    derive(serde::Serialize),
    serde(tag = "type", rename_all = "lowercase")
)]
pub enum ComputedEntry {
    /// A value known without runtime state.
    Static {
        value: String,
        important: bool,
        inherited: bool,
    },
    /// Set by a rule that only applies in some runtime state (`:hover`,
    /// `@media`, ...). The value cannot be known statically.
    Dynamic { inherited: bool },
}

impl ComputedEntry {
    pub fn new_static(value: impl Into<String>, important: bool) -> Self {
        Self::Static {
            value: value.into(),
            important,
            inherited: false,
        }
    }

    pub fn new_dynamic() -> Self {
        Self::Dynamic { inherited: false }
    }

    /// The value, if static.
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Static { value, .. } => Some(value),
            Self::Dynamic { .. } => None,
        }
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::Dynamic { .. })
    }

    pub fn is_important(&self) -> bool {
        matches!(self, Self::Static { important: true, .. })
    }

    pub fn is_inherited(&self) -> bool {
        match self {
            Self::Static { inherited, .. } | Self::Dynamic { inherited } => *inherited,
        }
    }

    /// Copy of this entry as seen from a descendant.
    pub(crate) fn into_inherited(self) -> Self {
        match self {
            Self::Static {
                value, important, ..
            } => Self::Static {
                value,
                important,
                inherited: true,
            },
            Self::Dynamic { .. } => Self::Dynamic { inherited: true },
        }
    }
}

/// Property name to computed entry, iterated in name order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize), serde(transparent))]
pub struct ComputedStyleMap {
    entries: BTreeMap<String, ComputedEntry>,
}

impl ComputedStyleMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&ComputedEntry> {
        self.entries.get(name)
    }

    /// Static value of a property. `None` if unset or dynamic.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ComputedEntry::value)
    }

    pub fn is_dynamic(&self, name: &str) -> bool {
        self.get(name).is_some_and(ComputedEntry::is_dynamic)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, entry: ComputedEntry) {
        self.entries.insert(name.into(), entry);
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, ComputedEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a ComputedStyleMap {
    type Item = (&'a String, &'a ComputedEntry);
    type IntoIter = btree_map::Iter<'a, String, ComputedEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for ComputedStyleMap {
    type Item = (String, ComputedEntry);
    type IntoIter = btree_map::IntoIter<String, ComputedEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
