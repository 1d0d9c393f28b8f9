use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::models::{ResultRow, NO_LICENSE_FOUND};

pub const HEADERS: [&str; 4] = ["JAR file", "Artifact ID", "Version", "License"];

/// Grid table of the results, unresolved licenses in red.
pub fn render_table(rows: &[ResultRow]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            HEADERS
                .iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
        );

    for row in rows {
        let license = if row.license == NO_LICENSE_FOUND {
            Cell::new(&row.license).fg(Color::Red)
        } else {
            Cell::new(&row.license)
        };
        table.add_row(vec![
            Cell::new(&row.archive),
            Cell::new(&row.artifact),
            Cell::new(&row.version),
            license,
        ]);
    }

    table
}

/// Print the results table on stdout.
pub fn render(rows: &[ResultRow]) {
    println!("{}", render_table(rows));
}
