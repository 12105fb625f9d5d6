//! Property tables that drive attribute collection and inheritance.

use std::collections::HashSet;

/// SVG presentation attributes. Only these attributes seed the cascade.
pub const PRESENTATION_ATTRIBUTES: &[&str] = &[
    "alignment-baseline",
    "baseline-shift",
    "clip",
    "clip-path",
    "clip-rule",
    "color",
    "color-interpolation",
    "color-interpolation-filters",
    "color-profile",
    "color-rendering",
    "cursor",
    "direction",
    "display",
    "dominant-baseline",
    "enable-background",
    "fill",
    "fill-opacity",
    "fill-rule",
    "filter",
    "flood-color",
    "flood-opacity",
    "font-family",
    "font-size",
    "font-size-adjust",
    "font-stretch",
    "font-style",
    "font-variant",
    "font-weight",
    "glyph-orientation-horizontal",
    "glyph-orientation-vertical",
    "image-rendering",
    "letter-spacing",
    "lighting-color",
    "marker-end",
    "marker-mid",
    "marker-start",
    "mask",
    "opacity",
    "overflow",
    "paint-order",
    "pointer-events",
    "shape-rendering",
    "stop-color",
    "stop-opacity",
    "stroke",
    "stroke-dasharray",
    "stroke-dashoffset",
    "stroke-linecap",
    "stroke-linejoin",
    "stroke-miterlimit",
    "stroke-opacity",
    "stroke-width",
    "text-anchor",
    "text-decoration",
    "text-overflow",
    "text-rendering",
    "transform",
    "transform-origin",
    "unicode-bidi",
    "vector-effect",
    "visibility",
    "white-space",
    "word-spacing",
    "writing-mode",
];

/// Properties that inherit from ancestors.
pub const INHERITABLE_PROPERTIES: &[&str] = &[
    "clip-rule",
    "color",
    "color-interpolation",
    "color-interpolation-filters",
    "color-profile",
    "color-rendering",
    "cursor",
    "direction",
    "dominant-baseline",
    "fill",
    "fill-opacity",
    "fill-rule",
    "font",
    "font-family",
    "font-size",
    "font-size-adjust",
    "font-stretch",
    "font-style",
    "font-variant",
    "font-weight",
    "glyph-orientation-horizontal",
    "glyph-orientation-vertical",
    "image-rendering",
    "letter-spacing",
    "marker",
    "marker-end",
    "marker-mid",
    "marker-start",
    "paint-order",
    "pointer-events",
    "shape-rendering",
    "stroke",
    "stroke-dasharray",
    "stroke-dashoffset",
    "stroke-linecap",
    "stroke-linejoin",
    "stroke-miterlimit",
    "stroke-opacity",
    "stroke-width",
    "text-anchor",
    "text-rendering",
    "transform",
    "visibility",
    "word-spacing",
    "writing-mode",
];

/// Presentation properties that apply to a group as a whole and never
/// reach its children, even where [`INHERITABLE_PROPERTIES`] lists them.
pub const NON_INHERITABLE_GROUP_PROPERTIES: &[&str] = &[
    "clip-path",
    "display",
    "filter",
    "mask",
    "opacity",
    "text-decoration",
    "transform",
    "unicode-bidi",
];

/// Property vocabulary used by the resolver.
///
/// [`Vocabulary::svg`] (also the default) carries the SVG tables above.
/// Any table can be replaced for documents with other conventions.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    presentation: HashSet<String>,
    inheritable: HashSet<String>,
    non_inheritable: HashSet<String>,
}

fn table(names: &[&str]) -> HashSet<String> {
    names.iter().map(|name| name.to_string()).collect()
}

impl Vocabulary {
    pub fn svg() -> Self {
        Self {
            presentation: table(PRESENTATION_ATTRIBUTES),
            inheritable: table(INHERITABLE_PROPERTIES),
            non_inheritable: table(NON_INHERITABLE_GROUP_PROPERTIES),
        }
    }

    pub fn with_presentation_attributes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.presentation = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_inheritable<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inheritable = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_non_inheritable<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.non_inheritable = names.into_iter().map(Into::into).collect();
        self
    }

    /// Whether an attribute of this name takes part in the cascade.
    pub fn is_presentation_attribute(&self, name: &str) -> bool {
        self.presentation.contains(name)
    }

    /// Whether a value set on an ancestor flows down to `name` on a
    /// descendant.
    pub fn inherits(&self, name: &str) -> bool {
        self.inheritable.contains(name) && !self.non_inheritable.contains(name)
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::svg()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_svg_tables() {
        let vocabulary = Vocabulary::svg();

        assert!(vocabulary.is_presentation_attribute("fill"));
        assert!(vocabulary.is_presentation_attribute("stroke-width"));
        assert!(!vocabulary.is_presentation_attribute("style"));
        assert!(!vocabulary.is_presentation_attribute("x"));
        assert!(!vocabulary.is_presentation_attribute("class"));
    }

    #[test]
    fn test_inherits() {
        let vocabulary = Vocabulary::default();

        assert!(vocabulary.inherits("fill"));
        assert!(vocabulary.inherits("font-size"));
        assert!(!vocabulary.inherits("opacity"));
        assert!(!vocabulary.inherits("stop-color"));
        // Listed as inheritable, but applies to the group only
        assert!(!vocabulary.inherits("transform"));
    }

    #[test]
    fn test_overrides() {
        let vocabulary = Vocabulary::svg()
            .with_presentation_attributes(["fill"])
            .with_inheritable(["fill", "opacity"])
            .with_non_inheritable(Vec::<String>::new());

        assert!(vocabulary.is_presentation_attribute("fill"));
        assert!(!vocabulary.is_presentation_attribute("stroke"));
        assert!(vocabulary.inherits("opacity"));
        assert!(!vocabulary.inherits("stroke"));
    }
}
