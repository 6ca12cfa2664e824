use crate::pivot::PivotTable;
use crate::process::{FIELD_CONDITION, FIELD_NAME};
use std::collections::HashSet;

/// Shown when the fetch failed or the table has no records; either way the
/// pipeline stops before aggregation.
pub const NO_DATA_WARNING: &str = "no data available: fetch failed or the table is empty";

const HIGHLIGHT: &str = "\x1b[1;33m";
const RESET: &str = "\x1b[0m";

const EMPTY_TABLE: &str = "(no rows match the current filter)";

/// Print amounts without `.0` noise when they are integral.
fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value:.2}")
    }
}

fn pad_left(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.chars().count());
    format!("{}{text}", " ".repeat(fill))
}

fn pad_right(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.chars().count());
    format!("{text}{}", " ".repeat(fill))
}

/// Fixed-width text table. Each row's maximum cell(s) are wrapped in a
/// bold-yellow escape; widths are computed before the escapes are added.
pub fn render_table(pivot: &PivotTable) -> String {
    if pivot.is_empty() {
        return EMPTY_TABLE.to_string();
    }

    let flags = pivot.row_max_flags();
    let name_width = pivot
        .names
        .iter()
        .map(|n| n.chars().count())
        .chain(std::iter::once(FIELD_NAME.chars().count()))
        .max()
        .unwrap_or(0);
    let col_widths: Vec<usize> = pivot
        .conditions
        .iter()
        .enumerate()
        .map(|(c, cond)| {
            pivot
                .cells
                .iter()
                .map(|row| format_amount(row[c]).chars().count())
                .chain(std::iter::once(cond.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut lines = Vec::new();

    let mut header = pad_right(FIELD_NAME, name_width);
    for (c, cond) in pivot.conditions.iter().enumerate() {
        header.push_str(" | ");
        header.push_str(&pad_left(cond, col_widths[c]));
    }
    lines.push(header);

    let mut rule = "-".repeat(name_width);
    for width in &col_widths {
        rule.push_str("-+-");
        rule.push_str(&"-".repeat(*width));
    }
    lines.push(rule);

    for (r, name) in pivot.names.iter().enumerate() {
        let mut line = pad_right(name, name_width);
        for c in 0..pivot.conditions.len() {
            let cell = pad_left(&format_amount(pivot.cells[r][c]), col_widths[c]);
            line.push_str(" | ");
            if flags[r][c] {
                line.push_str(HIGHLIGHT);
                line.push_str(&cell);
                line.push_str(RESET);
            } else {
                line.push_str(&cell);
            }
        }
        lines.push(line);
    }

    lines.push(format!("total: {}", format_amount(pivot.total())));
    lines.join("\n")
}

/// Numbered checklist of condition values with their selection state.
pub fn render_filter_menu(options: &[String], selected: &HashSet<String>) -> String {
    let mut lines = vec![format!("{FIELD_CONDITION} filter:")];
    for (i, option) in options.iter().enumerate() {
        let mark = if selected.contains(option) { "x" } else { " " };
        lines.push(format!("  [{mark}] {} {option}", i + 1));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::NormalizedRow;

    fn row(name: &str, condition: &str, amount: f64) -> NormalizedRow {
        NormalizedRow {
            name: name.to_string(),
            condition: condition.to_string(),
            amount,
        }
    }

    #[test]
    fn integral_amounts_drop_the_decimal_point() {
        assert_eq!(format_amount(100.0), "100");
        assert_eq!(format_amount(0.0), "0");
        assert_eq!(format_amount(250.5), "250.50");
    }

    #[test]
    fn empty_table_renders_a_placeholder() {
        let pivot = PivotTable::from_rows(&[]);
        assert_eq!(render_table(&pivot), EMPTY_TABLE);
    }

    #[test]
    fn table_shows_headers_cells_and_zero_fill() {
        let pivot = PivotTable::from_rows(&[
            row("A", "Seed", 100.0),
            row("A", "Series A", 200.0),
            row("B", "Seed", 50.0),
        ]);
        let out = render_table(&pivot);
        assert!(out.contains(FIELD_NAME));
        assert!(out.contains("Seed"));
        assert!(out.contains("Series A"));
        assert!(out.contains("100"));
        // B's missing Series A cell renders as 0
        let b_line = out.lines().find(|l| l.starts_with('B')).unwrap();
        assert!(b_line.contains('0'));
        assert!(out.contains("total: 350"));
    }

    #[test]
    fn row_maximum_is_wrapped_in_the_highlight_escape() {
        let pivot = PivotTable::from_rows(&[row("A", "Seed", 100.0), row("A", "Series A", 200.0)]);
        let out = render_table(&pivot);
        let a_line = out.lines().find(|l| l.starts_with('A')).unwrap();
        let highlighted = a_line
            .split(HIGHLIGHT)
            .nth(1)
            .and_then(|rest| rest.split(RESET).next())
            .unwrap();
        assert!(highlighted.contains("200"));
        assert!(!a_line.split(HIGHLIGHT).next().unwrap().contains("200"));
    }

    #[test]
    fn menu_marks_only_selected_options() {
        let options = vec!["Seed".to_string(), "Series A".to_string()];
        let selected: HashSet<String> = ["Seed".to_string()].into();
        let out = render_filter_menu(&options, &selected);
        assert!(out.contains("[x] 1 Seed"));
        assert!(out.contains("[ ] 2 Series A"));
    }
}
