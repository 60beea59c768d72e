use crate::output::{print_json, print_table};
use std::path::Path;

pub fn run(config: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let config = super::load_config(config)?;
    let scenario = super::load_scenario(&config)?;
    let catalog = &scenario.catalog;

    if json {
        let items: Vec<serde_json::Value> = catalog
            .iter()
            .map(|c| {
                serde_json::json!({
                    "id": c.id,
                    "title": c.title,
                    "description": c.description,
                    "prompt": c.prompt,
                    "theme": c.theme(),
                })
            })
            .collect();
        return print_json(&items);
    }

    let rows = catalog
        .iter()
        .map(|c| {
            let theme = c.theme();
            vec![
                c.id.clone(),
                format!("{} {}", theme.icon(), theme.as_str()),
                c.title.clone(),
            ]
        })
        .collect::<Vec<_>>();
    print_table(&["ID", "THEME", "TITLE"], rows);
    println!("\n{} crises", catalog.len());
    Ok(())
}
