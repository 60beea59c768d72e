use crate::output::print_json;
use pressure_core::config::{ConfigWarning, WarnLevel};
use pressure_core::scenario::Scenario;
use std::path::Path;

pub fn run(config: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let config = super::load_config(config)?;
    let mut warnings = config.validate();

    match Scenario::load_or_builtin(config.scenario.as_deref())
        .and_then(|s| s.compile(config.strict_triggers))
    {
        Ok(compiled) => {
            warnings.extend(compiled.dangling.iter().map(|d| {
                ConfigWarning::warning(format!(
                    "{}: headline '{}' triggers undefined crisis '{}'",
                    d.month, d.entry, d.crisis
                ))
            }));
        }
        Err(e) => warnings.push(ConfigWarning::error(format!("scenario: {e}"))),
    }

    if json {
        let value = serde_json::json!({
            "warnings": warnings,
        });
        print_json(&value)?;
    } else if warnings.is_empty() {
        println!("Config and scenario are valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("validation found errors");
    }
    Ok(())
}
