use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use draft_model::StageStatus;

use crate::types::{FetchSummary, StageSummary, UsageSummary};

pub fn print_stage_summaries(summaries: &[StageSummary]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Stage"),
        header_cell("Status"),
        header_cell("Rows in"),
        header_cell("Rows out"),
        header_cell("Dropped"),
        header_cell("Warnings"),
        header_cell("Outputs"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 2..=5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for summary in summaries {
        let outputs: Vec<String> = summary
            .outputs
            .iter()
            .map(|path| path.display().to_string())
            .collect();
        table.add_row(vec![
            Cell::new(&summary.stage)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            status_cell(summary.status),
            Cell::new(summary.rows_in),
            Cell::new(summary.rows_out),
            count_cell(summary.dropped, Color::Red),
            count_cell(summary.warnings, Color::Yellow),
            Cell::new(outputs.join("\n")),
        ]);
    }
    println!("{table}");
}

pub fn print_fetch_summary(summary: &FetchSummary) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Field"), header_cell("Value")]);
    apply_table_style(&mut table);
    let mode = match &summary.outcome {
        Some(outcome) if outcome.dry_run => "dry run",
        Some(_) => "executed",
        None => "refused",
    };
    table.add_row(vec![Cell::new("dataset"), Cell::new(&summary.dataset)]);
    table.add_row(vec![Cell::new("year"), Cell::new(summary.year)]);
    table.add_row(vec![Cell::new("mode"), Cell::new(mode)]);
    if let Some(outcome) = &summary.outcome {
        table.add_row(vec![Cell::new("url"), Cell::new(&outcome.url)]);
        let params: Vec<String> = outcome
            .params
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        table.add_row(vec![Cell::new("params"), Cell::new(params.join(" "))]);
        table.add_row(vec![Cell::new("rows"), Cell::new(outcome.rows())]);
    }
    if let Some(path) = &summary.saved {
        table.add_row(vec![Cell::new("saved"), Cell::new(path.display())]);
    }
    if let Some(reason) = &summary.refused {
        table.add_row(vec![Cell::new("error"), Cell::new(reason).fg(Color::Red)]);
    }
    table.add_row(vec![
        Cell::new("calls used"),
        Cell::new(format!(
            "{} / {}",
            summary.usage.calls_used, summary.usage.max_calls
        )),
    ]);
    table.add_row(vec![
        Cell::new("calls remaining"),
        Cell::new(summary.usage.calls_remaining()),
    ]);
    table.add_row(vec![Cell::new("ledger"), dim_cell(summary.ledger.display())]);
    println!("{table}");
}

pub fn print_usage_summary(summary: &UsageSummary) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Field"), header_cell("Value")]);
    apply_table_style(&mut table);
    table.add_row(vec![Cell::new("provider"), Cell::new(&summary.provider)]);
    table.add_row(vec![Cell::new("month"), Cell::new(&summary.month)]);
    table.add_row(vec![
        Cell::new("calls used"),
        Cell::new(summary.status.calls_used),
    ]);
    let remaining = summary.status.calls_remaining();
    let remaining_cell = if remaining == 0 {
        Cell::new(remaining)
            .fg(Color::Red)
            .add_attribute(Attribute::Bold)
    } else {
        Cell::new(remaining)
    };
    table.add_row(vec![Cell::new("calls remaining"), remaining_cell]);
    table.add_row(vec![
        Cell::new("monthly cap"),
        Cell::new(summary.status.max_calls),
    ]);
    table.add_row(vec![
        Cell::new("last call"),
        summary
            .last_call
            .as_deref()
            .map_or_else(|| dim_cell("-"), Cell::new),
    ]);
    let ledger = if summary.ledger_exists {
        Cell::new(summary.ledger.display())
    } else {
        dim_cell(format!("{} (not created yet)", summary.ledger.display()))
    };
    table.add_row(vec![Cell::new("ledger"), ledger]);
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn status_cell(status: StageStatus) -> Cell {
    let color = match status {
        StageStatus::Ok => Color::Green,
        StageStatus::Partial => Color::Yellow,
        StageStatus::MissingInput | StageStatus::EmptyInput => Color::DarkGrey,
    };
    Cell::new(status).fg(color)
}

fn count_cell(count: u64, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
