use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Left-aligned plain-text table. Widths count characters, so headlines with
/// accents or emoji line up. Long cells in the last column are not truncated.
pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    println!("{}", format_row(&header, &widths));
    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    println!("{}", rule.join("  "));
    for row in &rows {
        println!("{}", format_row(row, &widths));
    }
}

fn format_row(cells: &[String], widths: &[usize]) -> String {
    let last = cells.len().saturating_sub(1);
    cells
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let pad = widths.get(i).copied().unwrap_or(0);
            if i == last {
                cell.clone()
            } else {
                format!("{cell}{}", " ".repeat(pad.saturating_sub(cell.chars().count())))
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_pad_by_characters_not_bytes() {
        let widths = [5, 3];
        let row = format_row(&["é".to_string(), "x".to_string()], &widths);
        assert_eq!(row, "é      x");
    }

    #[test]
    fn last_column_is_not_padded() {
        let row = format_row(&["a".to_string(), "b".to_string()], &[3, 10]);
        assert_eq!(row, "a    b");
    }
}
