//! Settings management over dot-separated keys.
//!
//! Reads and writes go through the engine's merge-and-clamp path, so a value
//! set out of range lands clamped, exactly as it would from a settings form.

use clap::Subcommand;
use focusloop_core::{
    CompletionAlerts, Database, SettingsPatch, Snapshot, TimerEngine, TimerSettings,
};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print a single settings value
    Get { key: String },
    /// Update a settings value (clamped into its valid range)
    Set { key: String, value: String },
    /// Print all settings as JSON
    List,
}

fn get_json_value_by_path<'a>(
    root: &'a serde_json::Value,
    key: &str,
) -> Option<&'a serde_json::Value> {
    if key.is_empty() {
        return None;
    }

    let mut current = root;
    for part in key.split('.') {
        current = current.get(part)?;
    }
    Some(current)
}

fn set_json_value_by_path(
    root: &mut serde_json::Value,
    key: &str,
    value: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut parts = key.split('.').peekable();
    if parts.peek().is_none() {
        return Err("config key is empty".into());
    }

    let mut current = root;
    while let Some(part) = parts.next() {
        let is_leaf = parts.peek().is_none();
        if is_leaf {
            let obj = current
                .as_object_mut()
                .ok_or_else(|| format!("unknown config key: {key}"))?;
            let existing = obj
                .get(part)
                .ok_or_else(|| format!("unknown config key: {key}"))?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(value.parse::<bool>()?),
                serde_json::Value::Number(_) => {
                    if let Ok(n) = value.parse::<u64>() {
                        serde_json::Value::Number(n.into())
                    } else if let Ok(n) = value.parse::<f64>() {
                        serde_json::Number::from_f64(n)
                            .map(serde_json::Value::Number)
                            .ok_or_else(|| format!("cannot parse '{value}' as number"))?
                    } else {
                        return Err(format!("cannot parse '{value}' as number").into());
                    }
                }
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    serde_json::from_str(value)?
                }
                // a null slot (unset themeColors) takes JSON when it parses,
                // a plain string otherwise
                serde_json::Value::Null => serde_json::from_str(value)
                    .unwrap_or_else(|_| serde_json::Value::String(value.into())),
                _ => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        current = current
            .get_mut(part)
            .ok_or_else(|| format!("unknown config key: {key}"))?;
    }

    Err(format!("unknown config key: {key}").into())
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut engine = TimerEngine::rehydrate(Snapshot::load_from(&db), CompletionAlerts::disabled());

    match action {
        ConfigAction::Get { key } => {
            let json = serde_json::to_value(engine.settings())?;
            match get_json_value_by_path(&json, &key) {
                Some(serde_json::Value::String(s)) => println!("{s}"),
                Some(other) => println!("{other}"),
                None => return Err(format!("unknown config key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut json = serde_json::to_value(engine.settings())?;
            set_json_value_by_path(&mut json, &key, &value)?;
            let updated: TimerSettings = serde_json::from_value(json)?;
            engine.update_settings(SettingsPatch::from(updated));
            if let Err(e) = engine.to_snapshot().save_to(&db) {
                eprintln!("warning: failed to persist timer state: {e}");
            }
            println!("{}", serde_json::to_string_pretty(engine.settings())?);
        }
        ConfigAction::List => {
            println!("{}", serde_json::to_string_pretty(engine.settings())?);
        }
    }
    Ok(())
}
