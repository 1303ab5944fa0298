use anyhow::{Context, Result};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use relkit_model::{Dataset, SurvivalRecord, format_ordinal};
use relkit_store::DatasetSummary;

use crate::types::{BuildResult, Destination};

pub fn print_build_summary(result: &BuildResult, json: bool) -> Result<()> {
    if json {
        let text = serde_json::to_string_pretty(result).context("serialize run summary")?;
        println!("{text}");
        return Ok(());
    }
    println!("{}", build_summary_table(result));
    if let Some(notice) = &result.notice {
        println!();
        println!("{notice}");
    }
    Ok(())
}

fn build_summary_table(result: &BuildResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Run"), header_cell("Value")]);
    apply_table_style(&mut table);
    let (destination_kind, destination_path) = match &result.destination {
        Destination::Store(path) => ("program database", path),
        Destination::File(path) => ("file", path),
    };
    table.add_row(vec![
        Cell::new("Mode"),
        Cell::new(result.mode.description()),
    ]);
    table.add_row(vec![
        Cell::new("Zero-hour incidents"),
        Cell::new(if result.include_zero_hour {
            "included"
        } else {
            "excluded"
        }),
    ]);
    table.add_row(vec![
        Cell::new("Source"),
        Cell::new(result.source.display()),
    ]);
    table.add_row(vec![
        Cell::new("Destination"),
        Cell::new(format!(
            "{destination_kind}: {}",
            destination_path.display()
        )),
    ]);
    table.add_row(vec![
        Cell::new("Dataset"),
        match result.dataset_id {
            Some(id) => Cell::new(id).add_attribute(Attribute::Bold),
            None => dim_cell("-"),
        },
    ]);
    table.add_row(vec![Cell::new("Selected"), Cell::new(result.selected)]);
    table.add_row(vec![
        Cell::new("Emitted"),
        Cell::new(result.emitted).fg(Color::Green),
    ]);
    table.add_row(vec![
        Cell::new("Skipped"),
        count_cell(result.skipped, Color::Yellow),
    ]);
    if let Some(path) = &result.skipped_report {
        table.add_row(vec![Cell::new("Skipped report"), Cell::new(path.display())]);
    }
    table
}

pub fn print_datasets(summaries: &[DatasetSummary]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Dataset"),
        header_cell("Assembly"),
        header_cell("Description"),
        header_cell("Confidence"),
        header_cell("Records"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    for summary in summaries {
        let dataset = &summary.dataset;
        table.add_row(vec![
            Cell::new(dataset.dataset_id)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(dataset.assembly_id),
            description_cell(&dataset.description),
            Cell::new(format!("{:.1}", dataset.confidence)),
            Cell::new(summary.records),
        ]);
    }
    println!("{table}");
}

pub fn print_dataset_records(dataset: &Dataset, records: &[SurvivalRecord]) {
    println!("Dataset {}: {}", dataset.dataset_id, dataset.description);
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Record"),
        header_cell("Unit"),
        header_cell("Left"),
        header_cell("Right"),
        header_cell("TBF"),
        header_cell("Status"),
        header_cell("Qty"),
        header_cell("Assembly"),
        header_cell("Report date"),
    ]);
    apply_table_style(&mut table);
    for index in [0, 2, 3, 4, 6, 7] {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for record in records {
        table.add_row(vec![
            Cell::new(record.record_id),
            Cell::new(&record.unit),
            Cell::new(record.left_interval),
            Cell::new(record.right_interval),
            Cell::new(record.time_between_failure),
            Cell::new(record.status),
            Cell::new(record.quantity),
            Cell::new(record.assembly_id),
            Cell::new(format_ordinal(record.report_date)),
        ]);
    }
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn description_cell(description: &str) -> Cell {
    if description.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(description)
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
