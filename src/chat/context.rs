use crate::data::Table;

/// Fixed preamble of every system prompt.
pub const INSTRUCTION: &str = "You are a helpful data analyst bot. \
Answer questions about the Titanic dataset clearly.";

/// Rows of the cleaned table shown to the model.
pub const SAMPLE_ROWS: usize = 2;

/// Build the system prompt describing `table`: its columns and a text
/// rendering of its first rows.
pub fn system_prompt(table: &Table) -> String {
    let columns = table
        .column_names()
        .iter()
        .map(|c| format!("'{c}'"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "{INSTRUCTION} Dataset columns: [{columns}]. \
         Sample rows (first {SAMPLE_ROWS} rows):\n{}",
        table.head(SAMPLE_ROWS).render_text()
    )
}
