//! Output formatting: table, JSON, plain.
//!
//! Renders row structs in the format selected by `--output`. Table uses
//! `tabled`, JSON serializes via serde, plain emits one identifier per
//! line.

use tabled::{Table, Tabled, settings::Style};

use crate::cli::OutputFormat;

/// Render a list of rows in the chosen format.
///
/// - `table`: pretty table via the `Tabled` derive
/// - `json`: pretty-printed serde JSON
/// - `plain`: one identifier per line, from `id_fn`
pub fn render_list<T>(
    format: OutputFormat,
    rows: &[T],
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize + Tabled,
{
    match format {
        OutputFormat::Table => {
            if rows.is_empty() {
                return "(no devices)".into();
            }
            Table::new(rows).with(Style::rounded()).to_string()
        }
        OutputFormat::Json => {
            serde_json::to_string_pretty(rows).unwrap_or_else(|e| format!("serialize error: {e}"))
        }
        OutputFormat::Plain => rows.iter().map(id_fn).collect::<Vec<_>>().join("\n"),
    }
}
