use crate::app::command_support::{map_config_err, CommandContext};
use crate::catalog::WorkflowCatalog;
use crate::config::{load_settings, StatePaths};
use std::path::PathBuf;

pub fn cmd_catalog(args: &[String]) -> Result<String, String> {
    match args {
        [action] if action == "check" => {
            let paths = StatePaths::from_env().map_err(map_config_err)?;
            let settings = load_settings(&paths).map_err(map_config_err)?;
            match settings.catalog_path {
                Some(path) => check_file(path),
                None => Ok(check_report("builtin", &WorkflowCatalog::builtin())),
            }
        }
        [action, path] if action == "check" => check_file(PathBuf::from(path)),
        [action] if action == "show" => {
            let context = CommandContext::load()?;
            context.catalog.to_yaml().map_err(|e| e.to_string())
        }
        _ => Err("usage: catalog <check [<path>]|show>".to_string()),
    }
}

fn check_file(path: PathBuf) -> Result<String, String> {
    let catalog = WorkflowCatalog::from_path(&path).map_err(|e| e.to_string())?;
    Ok(check_report(&path.display().to_string(), &catalog))
}

fn check_report(source: &str, catalog: &WorkflowCatalog) -> String {
    let steps = catalog
        .workflows()
        .iter()
        .map(|workflow| workflow.steps.len())
        .sum::<usize>();
    format!(
        "catalog=ok\nsource={source}\nworkflows={}\nsteps={steps}",
        catalog.workflows().len()
    )
}
