//! Tests for the svgcascade binary.

#![cfg(feature = "cli")]

use std::io::Write;
use std::process::Command;

fn svgcascade() -> Command {
    Command::new(env!("CARGO_BIN_EXE_svgcascade"))
}

fn write_svg(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".svg").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_prints_styles_as_json() {
    let file = write_svg(
        r#"<svg xmlns="http://www.w3.org/2000/svg">
            <style>rect { fill: red } rect:hover { stroke: blue }</style>
            <g id="g" stroke-width="2"><rect id="r" class="a"/></g>
        </svg>"#,
    );

    let output = svgcascade()
        .arg(file.path())
        .args(["--select", "rect"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        json,
        serde_json::json!([{
            "node": "svg > g#g > rect#r.a",
            "style": {
                "fill": { "type": "static", "value": "red", "important": false, "inherited": false },
                "stroke": { "type": "dynamic", "inherited": false },
                "stroke-width": { "type": "static", "value": "2", "important": false, "inherited": true },
            }
        }])
    );
}

#[test]
fn test_own_flag_skips_inheritance() {
    let file = write_svg(
        r#"<svg xmlns="http://www.w3.org/2000/svg"><g fill="red"><rect id="r"/></g></svg>"#,
    );

    let output = svgcascade()
        .arg(file.path())
        .args(["--select", "#r", "--own"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json[0]["style"], serde_json::json!({}));
}

#[test]
fn test_reports_every_element_by_default() {
    let file = write_svg(
        r#"<svg xmlns="http://www.w3.org/2000/svg"><g><rect/><circle/></g></svg>"#,
    );

    let output = svgcascade().arg(file.path()).arg("--pretty").output().unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 4);
}

#[test]
fn test_malformed_stylesheet_fails() {
    let file = write_svg(
        r#"<svg xmlns="http://www.w3.org/2000/svg"><style>rect { fill red }</style><rect/></svg>"#,
    );

    let output = svgcascade().arg(file.path()).output().unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("error: stylesheet parse error"), "{stderr}");
}

#[test]
fn test_invalid_selector_fails() {
    let file = write_svg(r#"<svg xmlns="http://www.w3.org/2000/svg"/>"#);

    let output = svgcascade()
        .arg(file.path())
        .args(["--select", "rect >"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid selector"));
}

#[test]
fn test_missing_input_fails() {
    let output = svgcascade().arg("/nonexistent/input.svg").output().unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("error: I/O error"));
}
