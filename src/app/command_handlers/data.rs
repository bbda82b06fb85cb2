use crate::app::command_support::{parse_kind, CommandContext};
use crate::shared::ids::DataKey;
use serde_json::Value;

pub fn cmd_data(args: &[String]) -> Result<String, String> {
    match args {
        [action, kind, key] if action == "get" => {
            let context = CommandContext::load()?;
            let command = context.open_controller(parse_kind(kind)?)?;
            let key = DataKey::parse(key)?;
            match command.controller.workflow_data(key.as_str()) {
                Some(value) => Ok(format!("key={key}\nfound=true\nvalue={value}")),
                None => Ok(format!("key={key}\nfound=false")),
            }
        }
        [action, kind, key, raw] if action == "set" => {
            let key = DataKey::parse(key)?;
            let value: Value =
                serde_json::from_str(raw).map_err(|e| format!("invalid json value: {e}"))?;
            let context = CommandContext::load()?;
            let command = context.open_controller(parse_kind(kind)?)?;
            command.controller.save_workflow_data(&key, value);
            Ok(format!(
                "data saved\nworkflow={}\nkey={key}",
                command.controller.kind()
            ))
        }
        _ => Err("usage: data <get <kind> <key>|set <kind> <key> <json>>".to_string()),
    }
}
