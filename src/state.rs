use std::path::Path;

use anyhow::{Context, Result};

use titanic_dashboard::chat::{self, OpenRouterClient, Transcript};
use titanic_dashboard::config::ChatConfig;
use titanic_dashboard::data::aggregate::levels;
use titanic_dashboard::data::{
    apply_filter, load_file, normalize, CellValue, FilterSelection, FilteredView, NormalizedTable,
};

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Cleaned dataset (None until user opens a file).
    pub table: Option<NormalizedTable>,

    /// File name of the loaded dataset.
    pub source_name: Option<String>,

    /// Per-column filter selections.
    pub selection: FilterSelection,

    /// Rows passing the current filters, recomputed on every change.
    pub view: Option<FilteredView>,

    /// Colours for the "Survived" hue shared by every chart.
    pub hue_colors: Option<ColorMap>,

    /// Conversation with the assistant.
    pub transcript: Transcript,

    /// Text currently typed in the chat box.
    pub chat_input: String,

    /// Chat client, absent when no credential is configured.
    pub chat_client: Option<OpenRouterClient>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            table: None,
            source_name: None,
            selection: FilterSelection::default(),
            view: None,
            hue_colors: None,
            transcript: Transcript::new(),
            chat_input: String::new(),
            chat_client: None,
            status_message: None,
        }
    }
}

impl AppState {
    /// State with the chat client configured from the environment.
    pub fn from_env() -> Self {
        let mut state = Self::default();
        match ChatConfig::from_env().map(OpenRouterClient::new) {
            Ok(Ok(client)) => {
                log::info!("chat assistant enabled ({})", client.config().model);
                state.chat_client = Some(client);
            }
            Ok(Err(e)) => log::error!("Failed to build chat client: {e}"),
            Err(e) => log::warn!("chat assistant disabled: {e}"),
        }
        state
    }

    /// Load, clean and ingest a CSV file. On failure the previous dataset
    /// stays in place.
    pub fn open_file(&mut self, path: &Path) -> Result<()> {
        let raw = load_file(path).with_context(|| format!("loading {}", path.display()))?;
        let table = normalize(raw);
        log::info!(
            "Loaded {} passengers with columns {:?}",
            table.len(),
            table.column_names()
        );
        self.source_name = path.file_name().map(|n| n.to_string_lossy().into_owned());
        self.set_table(table);
        Ok(())
    }

    /// Ingest a newly cleaned table, initialise filters and colours.
    pub fn set_table(&mut self, table: NormalizedTable) {
        self.selection = FilterSelection::all_values(&table);
        self.hue_colors = table
            .has_column("Survived")
            .then(|| ColorMap::new("Survived", &levels(&table, "Survived")));
        self.view = Some(apply_filter(&table, &self.selection));
        self.table = Some(table);
        self.status_message = None;
    }

    /// Recompute `view` after a selection change.
    pub fn refilter(&mut self) {
        if let Some(table) = &self.table {
            self.view = Some(apply_filter(table, &self.selection));
        }
    }

    /// Toggle a single value in a column's filter.
    pub fn toggle_filter_value(&mut self, column: &str, value: &CellValue) {
        self.selection.toggle(column, value);
        self.refilter();
    }

    /// Select all values in a column.
    pub fn select_all(&mut self, column: &str) {
        if let Some(table) = &self.table {
            self.selection.select_all(table, column);
            self.refilter();
        }
    }

    /// Deselect all values in a column.
    pub fn select_none(&mut self, column: &str) {
        self.selection.select_none(column);
        self.refilter();
    }

    /// Send the typed question to the assistant. Blocks until it answers.
    pub fn send_chat(&mut self) {
        let (Some(table), Some(client)) = (&self.table, &self.chat_client) else {
            return;
        };
        let question = std::mem::take(&mut self.chat_input);
        let transcript = std::mem::take(&mut self.transcript);

        let exchange = chat::submit_question(transcript, &question, table, client.config(), client);
        self.transcript = exchange.transcript;
        self.status_message = exchange
            .result
            .err()
            .map(|e| format!("Error: {e}"));
    }
}
