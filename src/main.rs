//! svgcascade - print the computed styles of an SVG document

use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;

use svgcascade::{
    ArenaDom, ArenaNodeId, ComputedStyleMap, ElementRef, RuleSet, SelectorEngine,
    ServoSelectorEngine, StyleResolver,
};

#[derive(Parser)]
#[command(name = "svgcascade")]
#[command(version, about = "Compute CSS styles of SVG elements", long_about = None)]
#[command(after_help = "EXAMPLES:
    svgcascade icon.svg                     Styles of every element
    svgcascade icon.svg --select '#logo'    Styles of matching elements
    svgcascade page.html --own --pretty     Own styles only, indented")]
struct Cli {
    /// Input file (SVG/XML, or HTML with inline SVG)
    #[arg(value_name = "INPUT")]
    input: String,

    /// Only report elements matching this CSS selector
    #[arg(short, long, value_name = "SELECTOR")]
    select: Option<String>,

    /// Skip inherited properties
    #[arg(long)]
    own: bool,

    /// Parse the input as HTML regardless of its extension
    #[arg(long)]
    html: bool,

    /// Pretty-print the JSON output
    #[arg(short, long)]
    pretty: bool,
}

#[derive(Serialize)]
struct NodeStyle {
    node: String,
    style: ComputedStyleMap,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let dom = load(cli).map_err(|e| e.to_string())?;
    let rules = RuleSet::from_document(&dom).map_err(|e| e.to_string())?;
    let resolver = StyleResolver::new(&rules);

    let engine = ServoSelectorEngine;
    let filter = match &cli.select {
        Some(selector) => Some(
            engine
                .compile(selector)
                .ok_or_else(|| format!("invalid selector `{selector}`"))?,
        ),
        None => None,
    };

    let mut caches = <ServoSelectorEngine as SelectorEngine>::Caches::default();
    let styles: Vec<NodeStyle> = dom
        .elements()
        .filter(|&id| {
            filter.as_ref().is_none_or(|compiled| {
                engine.matches(ElementRef::new(&dom, id), compiled, &mut caches)
            })
        })
        .map(|id| NodeStyle {
            node: node_path(&dom, id),
            style: if cli.own {
                resolver.resolve_own(&dom, id)
            } else {
                resolver.resolve(&dom, id)
            },
        })
        .collect();

    let json = if cli.pretty {
        serde_json::to_string_pretty(&styles)
    } else {
        serde_json::to_string(&styles)
    }
    .map_err(|e| e.to_string())?;
    println!("{json}");

    Ok(())
}

fn load(cli: &Cli) -> svgcascade::Result<ArenaDom> {
    if cli.html {
        let source = std::fs::read_to_string(&cli.input)?;
        Ok(ArenaDom::parse_html(&source))
    } else {
        ArenaDom::open(&cli.input)
    }
}

/// `svg > g#layer > rect.big`
fn node_path(dom: &ArenaDom, id: ArenaNodeId) -> String {
    let mut labels: Vec<String> = dom.ancestors(id).map(|a| dom.describe(a)).collect();
    labels.reverse();
    labels.push(dom.describe(id));
    labels.join(" > ")
}
