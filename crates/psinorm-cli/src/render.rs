use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use psinorm_core::models::classification::ClassificationLabel;
use psinorm_core::models::lookup::Lookup;
use psinorm_core::models::result::ScoringResult;
use psinorm_instruments::InstrumentDefinition;
use psinorm_instruments::scoring::ScoreRange;

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

fn dim_cell(label: &str) -> Cell {
    Cell::new(label).fg(Color::DarkGrey)
}

/// Whole numbers without a fraction, ratios at two decimals.
pub fn format_score(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

fn format_range(range: Option<ScoreRange>) -> String {
    match range {
        Some(range) => format!("{} to {}", format_score(range.min), format_score(range.max)),
        None => "-".to_string(),
    }
}

fn tier_color(label: ClassificationLabel) -> Color {
    match label.tier() {
        1 => Color::Red,
        2 => Color::Yellow,
        3 => Color::Reset,
        _ => Color::Green,
    }
}

pub fn instruments_table<'a>(instruments: impl Iterator<Item = &'a InstrumentDefinition>) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Code"),
        header_cell("Instrument"),
        header_cell("Ages"),
        header_cell("Scheme"),
        header_cell("Stratifier"),
    ]);
    apply_table_style(&mut table);
    for instrument in instruments {
        let stratifier = match &instrument.stratifier {
            Some(s) => Cell::new(format!("{}: {}", s.id, s.values.join(", "))),
            None => dim_cell("-"),
        };
        table.add_row(vec![
            Cell::new(&instrument.code).add_attribute(Attribute::Bold),
            Cell::new(&instrument.name),
            Cell::new(format!("{}-{}", instrument.min_age, instrument.max_age)),
            Cell::new(instrument.banding_scheme.name()),
            stratifier,
        ]);
    }
    table
}

/// Raw fields and scored variables of one instrument.
pub fn describe_tables(instrument: &InstrumentDefinition) -> (Table, Table) {
    let mut fields = Table::new();
    fields.set_header(vec![
        header_cell("Field"),
        header_cell("Description"),
        header_cell("Range"),
    ]);
    apply_table_style(&mut fields);
    for field in &instrument.raw_fields {
        fields.add_row(vec![
            Cell::new(&field.id),
            Cell::new(&field.name),
            Cell::new(format_range(Some(field.range))).set_alignment(CellAlignment::Right),
        ]);
    }

    let mut variables = Table::new();
    variables.set_header(vec![
        header_cell("Variable"),
        header_cell("Name"),
        header_cell("Domain"),
        header_cell("Notes"),
    ]);
    apply_table_style(&mut variables);
    for variable in &instrument.scored_variables {
        variables.add_row(vec![
            Cell::new(&variable.id).add_attribute(Attribute::Bold),
            Cell::new(&variable.name),
            Cell::new(format_range(variable.domain)).set_alignment(CellAlignment::Right),
            match &variable.description {
                Some(description) => Cell::new(description),
                None => dim_cell(""),
            },
        ]);
    }

    (fields, variables)
}

pub fn result_table(result: &ScoringResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Variable"),
        header_cell("Derived"),
        header_cell("Normative"),
        header_cell("Classification"),
    ]);
    apply_table_style(&mut table);

    for (variable, derived) in &result.derived_scores {
        let normative = match result.normative(variable) {
            Some(Lookup::Found(value)) => {
                Cell::new(format_score(value)).set_alignment(CellAlignment::Right)
            }
            _ => dim_cell("n/a").set_alignment(CellAlignment::Right),
        };
        let classification = match result.classification(variable) {
            Some(Lookup::Found(label)) => Cell::new(label.label()).fg(tier_color(label)),
            _ => dim_cell("not available"),
        };
        table.add_row(vec![
            Cell::new(variable).add_attribute(Attribute::Bold),
            Cell::new(format_score(*derived)).set_alignment(CellAlignment::Right),
            normative,
            classification,
        ]);
    }
    table
}

/// One-line heading printed above a result table.
pub fn result_heading(result: &ScoringResult) -> String {
    let mut heading = format!("{} at age {}", result.instrument_code, result.subject_age);
    if let Some(stratifier) = &result.stratifier {
        heading.push_str(&format!(" ({stratifier})"));
    }
    heading
}
