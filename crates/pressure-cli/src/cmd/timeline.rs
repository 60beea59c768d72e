use crate::output::{print_json, print_table};
use std::path::Path;

pub fn run(config: Option<&Path>, month: Option<&str>, json: bool) -> anyhow::Result<()> {
    let config = super::load_config(config)?;
    let scenario = super::load_scenario(&config)?;

    let filter = month.map(str::to_lowercase);
    let months: Vec<_> = scenario
        .timeline
        .months()
        .iter()
        .filter(|m| {
            filter
                .as_deref()
                .map_or(true, |f| m.name.to_lowercase().contains(f))
        })
        .collect();

    if let Some(f) = month {
        if months.is_empty() {
            anyhow::bail!("no month matches '{f}'");
        }
    }

    if json {
        let value = serde_json::json!({
            "months": months,
            "dangling": scenario.dangling,
        });
        return print_json(&value);
    }

    let rows: Vec<Vec<String>> = months
        .iter()
        .flat_map(|m| {
            m.entries.iter().map(|e| {
                vec![
                    m.name.clone(),
                    e.id.clone(),
                    e.trigger.clone().unwrap_or_else(|| "-".to_string()),
                    e.text.clone(),
                ]
            })
        })
        .collect();
    let count = rows.len();
    print_table(&["MONTH", "ID", "TRIGGER", "HEADLINE"], rows);
    println!("\n{count} headlines in {} months", months.len());

    if !scenario.dangling.is_empty() {
        println!(
            "{} trigger(s) reference undefined crises and were ignored (see `pressure validate`)",
            scenario.dangling.len()
        );
    }
    Ok(())
}
