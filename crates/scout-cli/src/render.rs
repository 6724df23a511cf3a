//! Terminal rendering of results, step log and loading state.

use std::time::Duration;

use chrono::Local;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};
use indicatif::{ProgressBar, ProgressStyle};
use scout_core::{ProjectedRow, SearchSession};
use scout_model::StepLogEntry;

const SELECTED_MARK: &str = "[x]";
const UNSELECTED_MARK: &str = "[ ]";
const SAVED_MARK: &str = "*";

/// Results table for the visible rows, numbered from 1.
pub fn results_table(rows: &[ProjectedRow<'_>]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Sel"),
        header_cell("Saved"),
        header_cell("Title"),
        header_cell("Score"),
        header_cell("Source"),
    ]);
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
    for (index, row) in rows.iter().enumerate() {
        let op = row.opportunity;
        let mut title = Cell::new(op.display_title());
        if row.is_selected {
            title = title.add_attribute(Attribute::Bold);
        }
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(if row.is_selected {
                SELECTED_MARK
            } else {
                UNSELECTED_MARK
            }),
            Cell::new(if row.is_saved { SAVED_MARK } else { "" }).fg(Color::Yellow),
            title,
            Cell::new(op.display_score()),
            Cell::new(op.source()).fg(Color::Blue),
        ]);
    }
    table.set_constraints(vec![
        ColumnConstraint::LowerBoundary(Width::Fixed(3)),
        ColumnConstraint::LowerBoundary(Width::Fixed(5)),
        ColumnConstraint::LowerBoundary(Width::Fixed(5)),
        ColumnConstraint::UpperBoundary(Width::Percentage(45)),
        ColumnConstraint::LowerBoundary(Width::Fixed(5)),
        ColumnConstraint::UpperBoundary(Width::Percentage(35)),
    ]);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 1, CellAlignment::Center);
    align_column(&mut table, 2, CellAlignment::Center);
    align_column(&mut table, 4, CellAlignment::Right);
    table
}

/// Print the results table and the counter line under it.
pub fn print_results(session: &SearchSession) {
    let rows = session.rows();
    if rows.is_empty() {
        println!("(no {} results)", session.filter().label());
    } else {
        println!("{}", results_table(&rows));
    }
    println!("{} (showing {})", session.summary(), session.filter().label());
}

/// One step log line: `HH:MM:SS [node] text`, in local time.
pub fn log_line(entry: &StepLogEntry) -> String {
    format!(
        "{} [{}] {}",
        entry.logged_at.with_timezone(&Local).format("%H:%M:%S"),
        entry.source_node,
        entry.text
    )
}

/// Spinner shown while a search is loading.
///
/// Hidden when stderr is not a terminal; lines are then printed directly.
#[derive(Debug)]
pub struct LoadingIndicator {
    bar: ProgressBar,
}

impl LoadingIndicator {
    pub fn start(message: impl Into<String>) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_message(message.into());
        Self { bar }
    }

    pub fn set_message(&self, message: impl Into<String>) {
        self.bar.set_message(message.into());
    }

    /// Print a line above the spinner.
    pub fn println(&self, line: &str) {
        if self.bar.is_hidden() || self.bar.is_finished() {
            println!("{line}");
        } else {
            self.bar.println(line);
        }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Drop for LoadingIndicator {
    fn drop(&mut self) {
        self.finish();
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .add_attribute(Attribute::Bold)
        .fg(Color::Cyan)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
