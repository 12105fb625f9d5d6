//! XML (standalone SVG) reader that builds an [`ArenaDom`].
//!
//! Element and attribute prefixes are resolved against in-scope `xmlns`
//! declarations. Unprefixed attributes stay in no namespace, the way
//! presentation attributes are looked up.

use std::borrow::Cow;

use html5ever::{LocalName, Namespace, Prefix, QualName};
use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};

use super::arena::{ArenaDom, ArenaNodeId, Attribute, DocumentKind};
use crate::error::Result;

const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";
const XMLNS_NS: &str = "http://www.w3.org/2000/xmlns/";

/// In-scope namespace bindings for one open element.
#[derive(Default)]
struct Scope {
    default: Option<String>,
    prefixes: Vec<(String, String)>,
}

struct NamespaceStack {
    scopes: Vec<Scope>,
}

impl NamespaceStack {
    fn new() -> Self {
        Self { scopes: Vec::new() }
    }

    fn resolve_prefix(&self, prefix: &str) -> Option<&str> {
        match prefix {
            "xml" => Some(XML_NS),
            "xmlns" => Some(XMLNS_NS),
            _ => self.scopes.iter().rev().find_map(|scope| {
                scope
                    .prefixes
                    .iter()
                    .find(|(p, _)| p == prefix)
                    .map(|(_, ns)| ns.as_str())
            }),
        }
    }

    fn default_namespace(&self) -> &str {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.default.as_deref())
            .unwrap_or("")
    }
}

fn split_name(raw: &str) -> (Option<&str>, &str) {
    match raw.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, raw),
    }
}

fn decode(bytes: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}

/// Parse an XML document into an arena.
pub fn parse_xml(xml: &str) -> Result<ArenaDom> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut dom = ArenaDom::with_kind(DocumentKind::Xml);
    let mut namespaces = NamespaceStack::new();
    let mut open: Vec<ArenaNodeId> = vec![dom.document()];

    loop {
        let parent = open.last().copied().unwrap_or(dom.document());
        match reader.read_event()? {
            Event::Start(e) => {
                let id = create_element(&mut dom, &mut namespaces, &e)?;
                dom.append(parent, id);
                open.push(id);
            }
            Event::Empty(e) => {
                let id = create_element(&mut dom, &mut namespaces, &e)?;
                dom.append(parent, id);
                namespaces.scopes.pop();
            }
            Event::End(_) => {
                // The reader rejects mismatched end tags, so this pops the
                // element that was opened last.
                if open.len() > 1 {
                    open.pop();
                    namespaces.scopes.pop();
                }
            }
            Event::Text(e) => {
                if parent != dom.document() {
                    dom.append_text(parent, &decode(e.as_ref()));
                }
            }
            Event::CData(e) => {
                if parent != dom.document() {
                    dom.append_text(parent, &decode(e.as_ref()));
                }
            }
            Event::GeneralRef(e) => {
                if parent != dom.document()
                    && let Some(resolved) = resolve_entity(&decode(e.as_ref()))
                {
                    dom.append_text(parent, &resolved);
                }
            }
            Event::Comment(e) => {
                let comment = dom.create_comment(decode(e.as_ref()).into_owned());
                dom.append(parent, comment);
            }
            Event::DocType(e) => {
                let name = decode(e.as_ref()).trim().to_string();
                let doctype = dom.create_doctype(name, String::new(), String::new());
                dom.append(parent, doctype);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(dom)
}

fn create_element(
    dom: &mut ArenaDom,
    namespaces: &mut NamespaceStack,
    start: &BytesStart<'_>,
) -> Result<ArenaNodeId> {
    // Collect raw attributes first: xmlns declarations on this element are in
    // scope for the element's own name.
    let mut raw_attrs = Vec::new();
    let mut scope = Scope::default();
    for attr in start.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = decode(attr.key.as_ref()).into_owned();
        let raw_value = decode(&attr.value).into_owned();
        let value = match unescape(&raw_value) {
            Ok(v) => v.into_owned(),
            Err(_) => raw_value,
        };
        if key == "xmlns" {
            scope.default = Some(value.clone());
        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
            scope.prefixes.push((prefix.to_string(), value.clone()));
        }
        raw_attrs.push((key, value));
    }
    namespaces.scopes.push(scope);

    let raw_name = decode(start.name().as_ref()).into_owned();
    let (prefix, local) = split_name(&raw_name);
    let ns = match prefix {
        Some(p) => namespaces.resolve_prefix(p).unwrap_or(""),
        None => namespaces.default_namespace(),
    };
    let name = QualName::new(
        prefix.map(Prefix::from),
        Namespace::from(ns),
        LocalName::from(local),
    );

    let attrs = raw_attrs
        .into_iter()
        .map(|(key, value)| {
            let (prefix, local) = split_name(&key);
            let ns = match prefix {
                Some(p) => namespaces.resolve_prefix(p).unwrap_or(""),
                None if local == "xmlns" => XMLNS_NS,
                None => "",
            };
            Attribute {
                name: QualName::new(
                    prefix.map(Prefix::from),
                    Namespace::from(ns),
                    LocalName::from(local),
                ),
                value,
            }
        })
        .collect();

    Ok(dom.create_element(name, attrs))
}

fn resolve_entity(entity: &str) -> Option<String> {
    match entity {
        "apos" => return Some("'".to_string()),
        "quot" => return Some("\"".to_string()),
        "lt" => return Some("<".to_string()),
        "gt" => return Some(">".to_string()),
        "amp" => return Some("&".to_string()),
        _ => {}
    }

    let code = if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        entity.strip_prefix('#')?.parse::<u32>().ok()?
    };
    char::from_u32(code).map(|c| c.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_svg_elements() {
        let dom = parse_xml(
            r#"<svg xmlns="http://www.w3.org/2000/svg"><g fill="red"><rect id="r"/></g></svg>"#,
        )
        .unwrap();

        let rect = dom.get_by_id("r").unwrap();
        assert_eq!(dom.element_name(rect).unwrap().as_ref(), "rect");
        assert_eq!(
            dom.element_namespace(rect).unwrap().as_ref(),
            "http://www.w3.org/2000/svg"
        );
        let g = dom.parent_element(rect).unwrap();
        assert_eq!(dom.get_attr(g, "fill"), Some("red"));
    }

    #[test]
    fn test_prefixed_attributes_are_not_plain() {
        let dom = parse_xml(
            r##"<svg xmlns:xlink="http://www.w3.org/1999/xlink"><use xlink:href="#a" href="#b"/></svg>"##,
        )
        .unwrap();

        let use_elem = dom.find_by_tag("use").unwrap();
        assert_eq!(dom.get_attr(use_elem, "href"), Some("#b"));
        let xlink = dom
            .attributes(use_elem)
            .iter()
            .find(|a| a.name.prefix.as_deref() == Some("xlink"))
            .unwrap();
        assert_eq!(xlink.name.ns.as_ref(), "http://www.w3.org/1999/xlink");
        assert!(!xlink.is_plain());
    }

    #[test]
    fn test_style_text_and_cdata() {
        let dom = parse_xml(
            "<svg><style>rect { fill: red }<![CDATA[ circle > g { fill: blue } ]]></style></svg>",
        )
        .unwrap();

        let style = dom.find_by_tag("style").unwrap();
        assert_eq!(
            dom.child_text(style),
            "rect { fill: red } circle > g { fill: blue } "
        );
    }

    #[test]
    fn test_entities_in_text_and_attributes() {
        let dom = parse_xml(r#"<svg><text font-family="&quot;A&quot;">a &amp; b</text></svg>"#)
            .unwrap();

        let text = dom.find_by_tag("text").unwrap();
        assert_eq!(dom.get_attr(text, "font-family"), Some("\"A\""));
        assert_eq!(dom.child_text(text), "a & b");
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        assert!(parse_xml("<svg><g></svg>").is_err());
    }
}
