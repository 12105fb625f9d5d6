//! End-to-end tests on fixture documents.

use svgcascade::{ArenaDom, ComputedEntry, DocumentKind, RuleSet, StyleResolver, extract_stylesheets};

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixture_path(name: &str) -> String {
    format!("{}/{}", FIXTURES_DIR, name)
}

fn open(name: &str) -> ArenaDom {
    ArenaDom::open(fixture_path(name)).expect("Failed to load fixture")
}

// ============================================================================
// Standalone SVG
// ============================================================================

#[test]
fn test_icons_rule_set() {
    let dom = open("icons.svg");
    let rules = RuleSet::from_document(&dom).unwrap();

    assert_eq!(dom.kind(), DocumentKind::Xml);
    assert_eq!(extract_stylesheets(&dom).len(), 1);
    assert_eq!(rules.len(), 7);
    assert_eq!(rules.rules().iter().filter(|r| r.dynamic).count(), 3);
    assert_eq!(rules.rules().last().unwrap().selector, "#search .lens");
}

#[test]
fn test_icons_media_query_makes_color_dynamic_everywhere() {
    let dom = open("icons.svg");
    let rules = RuleSet::from_document(&dom).unwrap();
    let resolver = StyleResolver::new(&rules);

    for id in dom.elements() {
        let style = resolver.resolve(&dom, id);
        assert!(style.is_dynamic("color"), "{}", dom.describe(id));
    }
}

#[test]
fn test_icons_group_styles() {
    let dom = open("icons.svg");
    let rules = RuleSet::from_document(&dom).unwrap();
    let resolver = StyleResolver::new(&rules);
    let home = dom.get_by_id("home").unwrap();

    let style = resolver.resolve(&dom, home);

    // `.icon:hover` turns fill dynamic
    assert!(style.is_dynamic("fill"));
    assert_eq!(style.value("stroke"), Some("none"));
    assert_eq!(style.value("transform"), Some("translate(0 0)"));
}

#[test]
fn test_icons_lens_inherits_from_outlined_group() {
    let dom = open("icons.svg");
    let rules = RuleSet::from_document(&dom).unwrap();
    let resolver = StyleResolver::new(&rules);
    let search = dom.get_by_id("search").unwrap();
    let lens = dom
        .children(search)
        .find(|&c| dom.element_name(c).is_some_and(|n| n.as_ref() == "circle"))
        .unwrap();

    let style = resolver.resolve(&dom, lens);

    assert_eq!(
        style.get("stroke-width"),
        Some(&ComputedEntry::Static {
            value: "2".to_string(),
            important: true,
            inherited: false,
        })
    );
    assert_eq!(
        style.get("stroke"),
        Some(&ComputedEntry::Static {
            value: "currentColor".to_string(),
            important: false,
            inherited: true,
        })
    );
    assert_eq!(style.value("stroke-linecap"), Some("round"));
    assert_eq!(style.get("fill"), Some(&ComputedEntry::Dynamic { inherited: true }));
    assert!(!style.contains("transform"));
}

#[test]
fn test_icons_inline_important_fill() {
    let dom = open("icons.svg");
    let rules = RuleSet::from_document(&dom).unwrap();
    let resolver = StyleResolver::new(&rules);
    let mail = dom.get_by_id("mail").unwrap();
    let rect = dom
        .children(mail)
        .find(|&c| dom.element_name(c).is_some_and(|n| n.as_ref() == "rect"))
        .unwrap();

    let own = resolver.resolve_own(&dom, rect);
    let full = resolver.resolve(&dom, rect);

    assert_eq!(own.value("fill"), Some("white"));
    assert_eq!(full.value("fill"), Some("white"));
    assert_eq!(full.value("stroke"), Some("none"));
    // `a:focus .icon` applies to the group only
    assert!(resolver.resolve(&dom, mail).is_dynamic("opacity"));
    assert!(!full.contains("opacity"));
}

#[test]
fn test_icons_gradient_stops() {
    let dom = open("icons.svg");
    let rules = RuleSet::from_document(&dom).unwrap();
    let resolver = StyleResolver::new(&rules);
    let stops: Vec<_> = dom
        .elements()
        .filter(|&id| dom.element_name(id).is_some_and(|n| n.as_ref() == "stop"))
        .collect();

    assert_eq!(stops.len(), 2);
    let last = resolver.resolve(&dom, stops[1]);
    assert_eq!(last.value("stop-color"), Some("black"));
    assert_eq!(last.value("stop-opacity"), Some("0"));
    assert!(!last.contains("offset"));
}

// ============================================================================
// HTML with inline SVG
// ============================================================================

#[test]
fn test_inline_svg_in_html() {
    let dom = open("inline.html");
    let rules = RuleSet::from_document(&dom).unwrap();
    let resolver = StyleResolver::new(&rules);
    let dot = dom.get_by_id("dot").unwrap();

    let style = resolver.resolve(&dom, dot);

    assert_eq!(dom.kind(), DocumentKind::Html);
    assert_eq!(style.value("fill"), Some("green"));
    // `.badge:hover circle` wins over the inherited attribute
    assert_eq!(style.get("stroke"), Some(&ComputedEntry::Dynamic { inherited: false }));
    assert_eq!(style.value("stroke-width"), Some("2"));
    assert_eq!(
        style.get("color"),
        Some(&ComputedEntry::Static {
            value: "black".to_string(),
            important: false,
            inherited: true,
        })
    );
}

#[test]
fn test_html_inside_foreign_object() {
    let dom = open("inline.html");
    let rules = RuleSet::from_document(&dom).unwrap();
    let resolver = StyleResolver::new(&rules);
    let inner = dom.get_by_id("inner").unwrap();

    let style = resolver.resolve(&dom, inner);

    assert_eq!(style.value("stroke"), Some("purple"));
    assert_eq!(style.value("color"), Some("black"));
    assert!(!style.contains("fill"));
}
