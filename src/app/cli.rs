#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliVerb {
    Help,
    Workflows,
    Show,
    Go,
    Complete,
    Reset,
    Next,
    Progress,
    Data,
    Inspect,
    Catalog,
    Unknown,
}

pub fn parse_cli_verb(input: &str) -> CliVerb {
    match input {
        "help" | "--help" | "-h" => CliVerb::Help,
        "workflows" => CliVerb::Workflows,
        "show" => CliVerb::Show,
        "go" => CliVerb::Go,
        "complete" => CliVerb::Complete,
        "reset" => CliVerb::Reset,
        "next" => CliVerb::Next,
        "progress" => CliVerb::Progress,
        "data" => CliVerb::Data,
        "inspect" => CliVerb::Inspect,
        "catalog" => CliVerb::Catalog,
        _ => CliVerb::Unknown,
    }
}

pub fn cli_help_lines() -> Vec<String> {
    vec![
        "Commands:".to_string(),
        "  workflows                            List workflows with their progress".to_string(),
        "  show <kind> [--json]                 Show steps with status".to_string(),
        "  go <kind> <step>                     Navigate to a step if it is not blocked"
            .to_string(),
        "  complete <kind> <step>               Mark a step complete and advance".to_string(),
        "  reset <kind>                         Clear all progress of a workflow".to_string(),
        "  next <kind> [<step>] [--limit N]     Suggest upcoming steps (default limit 3)"
            .to_string(),
        "  progress <kind> [--active <step>]    Print percent progress".to_string(),
        "  data get <kind> <key>                Read a workflow data value".to_string(),
        "  data set <kind> <key> <json>         Store a workflow data value".to_string(),
        "  inspect <kind>                       Strictly read the persisted record".to_string(),
        "  catalog check [<path>]               Validate a catalog file".to_string(),
        "  catalog show                         Print the active catalog as yaml".to_string(),
        String::new(),
        "Workflow kinds: steuer-optimierung, immobilien-verwaltung, finanzierung, analyse"
            .to_string(),
    ]
}

pub(crate) fn help_text() -> String {
    cli_help_lines().join("\n")
}
