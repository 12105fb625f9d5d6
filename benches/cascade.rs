//! Benchmarks for stylesheet parsing and style resolution.
//!
//! Run with: cargo bench

use criterion::{Criterion, criterion_group, criterion_main};

use svgcascade::{ArenaDom, RuleSet, StyleResolver, parse_stylesheet};

const ICONS_SVG: &str = include_str!("../tests/fixtures/icons.svg");

/// A wide, deep document: `depth` nested groups holding `width` shapes each.
fn generated_document(depth: usize, width: usize) -> String {
    let mut svg = String::from(
        r#"<svg xmlns="http://www.w3.org/2000/svg"><style>
            g { stroke: black } .even { fill: red } .odd:hover { fill: blue }
            g > rect { stroke-width: 2 } #deep { opacity: .5 !important }
            @media print { circle { fill: gray } }
        </style>"#,
    );
    for level in 0..depth {
        svg.push_str(&format!(r#"<g class="level-{level}" fill-opacity="0.{level}">"#));
        for i in 0..width {
            let class = if i % 2 == 0 { "even" } else { "odd" };
            svg.push_str(&format!(r#"<rect class="{class}" style="stroke-linecap: round"/>"#));
            svg.push_str(&format!(r#"<circle class="{class}" r="{i}"/>"#));
        }
    }
    svg.push_str(r#"<path id="deep" d="M0 0"/>"#);
    for _ in 0..depth {
        svg.push_str("</g>");
    }
    svg.push_str("</svg>");
    svg
}

fn bench_parse_stylesheet(c: &mut Criterion) {
    let dom = ArenaDom::parse_xml(ICONS_SVG).unwrap();
    let css = svgcascade::extract_stylesheets(&dom).join("\n");

    c.bench_function("parse_stylesheet", |b| {
        b.iter(|| parse_stylesheet(&css).unwrap());
    });
}

fn bench_resolve_all(c: &mut Criterion) {
    let dom = ArenaDom::parse_xml(ICONS_SVG).unwrap();
    let rules = RuleSet::from_document(&dom).unwrap();
    let resolver = StyleResolver::new(&rules);

    c.bench_function("resolve_all_icons", |b| {
        b.iter(|| {
            for id in dom.elements() {
                resolver.resolve(&dom, id);
            }
        });
    });
}

fn bench_resolve_deep(c: &mut Criterion) {
    let dom = ArenaDom::parse_xml(&generated_document(30, 20)).unwrap();
    let rules = RuleSet::from_document(&dom).unwrap();
    let resolver = StyleResolver::new(&rules);
    let deep = dom.get_by_id("deep").unwrap();

    // 31 own-style passes per query, each sharing one selector cache
    // across the rule set.
    c.bench_function("resolve_deep_node", |b| {
        b.iter(|| resolver.resolve(&dom, deep));
    });
}

criterion_group!(
    benches,
    bench_parse_stylesheet,
    bench_resolve_all,
    bench_resolve_deep
);
criterion_main!(benches);
