use std::path::Path;

use anyhow::{Context, Result};

use super::terminal::HEADERS;
use crate::models::ResultRow;

const HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Licenses JAR</title>
    <style>
        body { font-family: Arial, sans-serif; margin: 40px; background-color: #f4f4f4; }
        h2 { text-align: center; }
        table { width: 100%; border-collapse: collapse; background: #fff; box-shadow: 0px 0px 10px rgba(0, 0, 0, 0.1); }
        th, td { padding: 10px; border: 1px solid #ddd; text-align: left; }
        th { background-color: #0073e6; color: white; }
        tr:nth-child(even) { background-color: #f9f9f9; }
    </style>
</head>
<body>
    <h2>Licenses</h2>
    <table>
"#;

const TAIL: &str = "    </table>\n</body>\n</html>\n";

/// Standalone HTML page with the results table.
pub fn render_html(rows: &[ResultRow]) -> String {
    let mut html = String::from(HEAD);

    html.push_str("        <tr>\n");
    for header in HEADERS {
        html.push_str(&format!("            <th>{}</th>\n", escape(header)));
    }
    html.push_str("        </tr>\n");

    for row in rows {
        html.push_str("        <tr>\n");
        for cell in [&row.archive, &row.artifact, &row.version, &row.license] {
            html.push_str(&format!("            <td>{}</td>\n", escape(cell)));
        }
        html.push_str("        </tr>\n");
    }

    html.push_str(TAIL);
    html
}

/// Write the HTML report to `path`, creating parent folders as needed.
pub fn write(rows: &[ResultRow], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, render_html(rows))
        .with_context(|| format!("Failed to write HTML report to {}", path.display()))
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
