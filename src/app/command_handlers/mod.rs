use crate::app::cli::{help_text, parse_cli_verb, CliVerb};

pub mod catalog;
pub mod data;
pub mod workflows;

pub fn run_cli(args: Vec<String>) -> Result<String, String> {
    if args.is_empty() {
        return Ok(help_text());
    }

    match parse_cli_verb(args[0].as_str()) {
        CliVerb::Help => Ok(help_text()),
        CliVerb::Workflows => workflows::cmd_workflows(&args[1..]),
        CliVerb::Show => workflows::cmd_show(&args[1..]),
        CliVerb::Go => workflows::cmd_go(&args[1..]),
        CliVerb::Complete => workflows::cmd_complete(&args[1..]),
        CliVerb::Reset => workflows::cmd_reset(&args[1..]),
        CliVerb::Next => workflows::cmd_next(&args[1..]),
        CliVerb::Progress => workflows::cmd_progress(&args[1..]),
        CliVerb::Inspect => workflows::cmd_inspect(&args[1..]),
        CliVerb::Data => data::cmd_data(&args[1..]),
        CliVerb::Catalog => catalog::cmd_catalog(&args[1..]),
        CliVerb::Unknown => Err(format!("unknown command `{}`", args[0])),
    }
}
