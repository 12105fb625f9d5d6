//! Static CSS cascade.
//!
//! Resolution happens in two layers. [`StyleResolver::resolve_own`] merges
//! what applies to an element directly: presentation attributes, then
//! matching rules in specificity order, then the `style` attribute.
//! [`StyleResolver::resolve`] adds inherited properties by repeating the
//! own-style pass for each ancestor, nearest first.

use super::computed::{ComputedEntry, ComputedStyleMap};
use super::vocabulary::Vocabulary;
use crate::css::{Declaration, RuleSet, SelectorEngine, ServoSelectorEngine};
use crate::dom::{ArenaDom, ArenaNodeId, ElementRef};

/// Computes styles for elements of one document against its rule set.
pub struct StyleResolver<'a, E: SelectorEngine = ServoSelectorEngine> {
    rules: &'a RuleSet<E>,
    vocabulary: Vocabulary,
}

impl<'a, E: SelectorEngine> StyleResolver<'a, E> {
    pub fn new(rules: &'a RuleSet<E>) -> Self {
        Self {
            rules,
            vocabulary: Vocabulary::svg(),
        }
    }

    pub fn with_vocabulary(mut self, vocabulary: Vocabulary) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn rules(&self) -> &RuleSet<E> {
        self.rules
    }

    /// Style set directly on an element, without inheritance.
    ///
    /// Non-element nodes have no style.
    pub fn resolve_own(&self, dom: &ArenaDom, id: ArenaNodeId) -> ComputedStyleMap {
        let mut style = ComputedStyleMap::new();
        if !dom.is_element(id) {
            return style;
        }

        for attr in dom.attributes(id) {
            if attr.is_plain() && self.vocabulary.is_presentation_attribute(&attr.name.local) {
                style.insert(
                    attr.name.local.to_string(),
                    ComputedEntry::new_static(attr.value.as_str(), false),
                );
            }
        }

        for rule in self.rules.matching(ElementRef::new(dom, id)) {
            for declaration in &rule.declarations {
                if style.is_dynamic(&declaration.name) {
                    continue;
                }
                if rule.dynamic {
                    style.insert(declaration.name.as_str(), ComputedEntry::new_dynamic());
                    continue;
                }
                apply_static(&mut style, declaration);
            }
        }

        for declaration in dom.inline_style(id) {
            // Dynamic entries block inline values too
            if style.is_dynamic(&declaration.name) {
                continue;
            }
            apply_static(&mut style, &declaration);
        }

        log::trace!("own style of {}: {} properties", dom.describe(id), style.len());
        style
    }

    /// Full computed style of an element: its own style plus whatever it
    /// inherits from its ancestors.
    ///
    /// Each ancestor's own style is matched again, so a query costs one
    /// [`resolve_own`](Self::resolve_own) per level of nesting.
    pub fn resolve(&self, dom: &ArenaDom, id: ArenaNodeId) -> ComputedStyleMap {
        let mut style = self.resolve_own(dom, id);

        for ancestor in dom.ancestors(id) {
            for (name, entry) in self.resolve_own(dom, ancestor) {
                if !style.contains(&name) && self.vocabulary.inherits(&name) {
                    log::trace!(
                        "{} inherits {name} from {}",
                        dom.describe(id),
                        dom.describe(ancestor)
                    );
                    style.insert(name, entry.into_inherited());
                }
            }
        }

        style
    }
}

/// Apply a declaration from a static source. Important values are only
/// replaced by important values.
fn apply_static(style: &mut ComputedStyleMap, declaration: &Declaration) {
    let replace = match style.get(&declaration.name) {
        None => true,
        Some(existing) => declaration.important || !existing.is_important(),
    };
    if replace {
        style.insert(
            declaration.name.as_str(),
            ComputedEntry::new_static(declaration.value.as_str(), declaration.important),
        );
    }
}
