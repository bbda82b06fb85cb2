use crate::app::command_support::{join_ids, parse_kind, CommandContext};
use crate::controller::{CompletionOutcome, NavigationOutcome};
use crate::store::StoreError;

const DEFAULT_NEXT_LIMIT: usize = 3;

pub fn cmd_workflows(args: &[String]) -> Result<String, String> {
    if !args.is_empty() {
        return Err("usage: workflows".to_string());
    }
    let context = CommandContext::load()?;
    let mut lines = Vec::new();
    for kind in context.catalog.kinds() {
        let command = context.open_controller(kind)?;
        let controller = &command.controller;
        lines.push(format!("{kind}.title={}", controller.title()));
        lines.push(format!("{kind}.progress={}", controller.workflow_progress()));
        if let Some(current) = controller.current_step() {
            lines.push(format!("{kind}.current={}", current.id()));
        }
    }
    Ok(lines.join("\n"))
}

pub fn cmd_show(args: &[String]) -> Result<String, String> {
    let (kind, json) = match args {
        [kind] => (kind, false),
        [kind, flag] if flag == "--json" => (kind, true),
        _ => return Err("usage: show <kind> [--json]".to_string()),
    };
    let context = CommandContext::load()?;
    let command = context.open_controller(parse_kind(kind)?)?;
    let summary = command.controller.summary();
    if json {
        return serde_json::to_string_pretty(&summary)
            .map_err(|e| format!("failed to encode workflow summary: {e}"));
    }

    let mut lines = vec![
        format!("workflow={}", summary.workflow),
        format!("title={}", summary.title),
        format!("progress={}", summary.progress),
        format!(
            "current={}",
            summary
                .current_step_id
                .as_ref()
                .map(|id| id.to_string())
                .unwrap_or_default()
        ),
        format!(
            "estimated_minutes_remaining={}",
            summary.estimated_minutes_remaining
        ),
    ];
    for step in &summary.steps {
        lines.push(format!("step.{}={}", step.id(), step.status()));
    }
    Ok(lines.join("\n"))
}

pub fn cmd_go(args: &[String]) -> Result<String, String> {
    let [kind, step] = args else {
        return Err("usage: go <kind> <step>".to_string());
    };
    let context = CommandContext::load()?;
    let command = context.open_controller(parse_kind(kind)?)?;
    let mut lines = match command.controller.go_to_step(step) {
        NavigationOutcome::Navigated { step, path } => vec![
            "outcome=navigated".to_string(),
            format!("step={step}"),
            format!("path={path}"),
        ],
        NavigationOutcome::Blocked { step, missing } => vec![
            "outcome=blocked".to_string(),
            format!("step={step}"),
            format!("missing={}", join_ids(&missing)),
        ],
        NavigationOutcome::UnknownStep { step } => {
            return Err(format!("unknown step `{step}` in workflow `{kind}`"));
        }
    };
    lines.extend(command.side_effect_lines());
    Ok(lines.join("\n"))
}

pub fn cmd_complete(args: &[String]) -> Result<String, String> {
    let [kind, step] = args else {
        return Err("usage: complete <kind> <step>".to_string());
    };
    let context = CommandContext::load()?;
    let command = context.open_controller(parse_kind(kind)?)?;
    let mut lines = match command.controller.complete_step(step) {
        CompletionOutcome::Advanced { completed, next } => vec![
            "outcome=advanced".to_string(),
            format!("completed={completed}"),
            format!("next={next}"),
        ],
        CompletionOutcome::NextBlocked {
            completed,
            next,
            missing,
        } => vec![
            "outcome=next_blocked".to_string(),
            format!("completed={completed}"),
            format!("next={next}"),
            format!("missing={}", join_ids(&missing)),
        ],
        CompletionOutcome::WorkflowComplete { completed } => vec![
            "outcome=workflow_complete".to_string(),
            format!("completed={completed}"),
        ],
        CompletionOutcome::OpenStepsRemain { completed, open } => vec![
            "outcome=open_steps_remain".to_string(),
            format!("completed={completed}"),
            format!("open={}", join_ids(&open)),
        ],
        CompletionOutcome::Blocked { step, missing } => vec![
            "outcome=blocked".to_string(),
            format!("step={step}"),
            format!("missing={}", join_ids(&missing)),
        ],
        CompletionOutcome::UnknownStep { step } => {
            return Err(format!("unknown step `{step}` in workflow `{kind}`"));
        }
    };
    lines.push(format!("progress={}", command.controller.workflow_progress()));
    lines.extend(command.side_effect_lines());
    Ok(lines.join("\n"))
}

pub fn cmd_reset(args: &[String]) -> Result<String, String> {
    let [kind] = args else {
        return Err("usage: reset <kind>".to_string());
    };
    let context = CommandContext::load()?;
    let command = context.open_controller(parse_kind(kind)?)?;
    command.controller.reset_workflow_progress();
    let mut lines = vec![
        "outcome=reset".to_string(),
        format!("workflow={}", command.controller.kind()),
        format!("progress={}", command.controller.workflow_progress()),
    ];
    if let Some(current) = command.controller.current_step() {
        lines.push(format!("current={}", current.id()));
    }
    lines.extend(command.side_effect_lines());
    Ok(lines.join("\n"))
}

pub fn cmd_next(args: &[String]) -> Result<String, String> {
    let usage = || "usage: next <kind> [<step>] [--limit N]".to_string();
    let Some(kind) = args.first() else {
        return Err(usage());
    };
    let mut step = None;
    let mut limit = DEFAULT_NEXT_LIMIT;
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--limit" => {
                let raw = args.get(i + 1).ok_or_else(usage)?;
                limit = raw
                    .parse()
                    .map_err(|_| format!("invalid --limit value `{raw}`"))?;
                i += 2;
            }
            other if step.is_none() && !other.starts_with("--") => {
                step = Some(other.to_string());
                i += 1;
            }
            other => return Err(format!("unexpected argument `{other}`")),
        }
    }

    let context = CommandContext::load()?;
    let command = context.open_controller(parse_kind(kind)?)?;
    let suggestions = command.controller.next_steps(step.as_deref(), limit);
    let mut lines = vec![format!("count={}", suggestions.len())];
    for (index, next) in suggestions.iter().enumerate() {
        lines.push(format!(
            "next.{}={}/{}",
            index + 1,
            next.workflow,
            next.step.id()
        ));
    }
    Ok(lines.join("\n"))
}

pub fn cmd_progress(args: &[String]) -> Result<String, String> {
    let (kind, active) = match args {
        [kind] => (kind, None),
        [kind, flag, step] if flag == "--active" => (kind, Some(step.as_str())),
        _ => return Err("usage: progress <kind> [--active <step>]".to_string()),
    };
    let context = CommandContext::load()?;
    let command = context.open_controller(parse_kind(kind)?)?;
    let progress = match active {
        Some(step) => command.controller.workflow_progress_at(step),
        None => command.controller.workflow_progress(),
    };
    Ok(format!(
        "workflow={}\nprogress={progress}",
        command.controller.kind()
    ))
}

pub fn cmd_inspect(args: &[String]) -> Result<String, String> {
    let [kind] = args else {
        return Err("usage: inspect <kind>".to_string());
    };
    let kind = parse_kind(kind)?;
    let context = CommandContext::load()?;
    let store = context.open_store()?;
    let mut lines = vec![
        format!("workflow={kind}"),
        format!("storage_key={}", store.storage_key(kind)),
    ];
    match store.load_record(kind) {
        Ok(None) => lines.push("status=missing".to_string()),
        Ok(Some(record)) => {
            lines.push("status=ok".to_string());
            lines.push(format!("completed={}", join_ids(&record.completed_step_ids)));
            lines.push(format!(
                "current={}",
                record
                    .current_step_id
                    .map(|id| id.to_string())
                    .unwrap_or_default()
            ));
            lines.push(format!(
                "data_keys={}",
                join_ids(&record.data.keys().collect::<Vec<_>>())
            ));
            lines.push(format!("updated_at={}", record.updated_at));
        }
        Err(err @ StoreError::Decode { .. }) => {
            lines.push("status=corrupt".to_string());
            lines.push(format!("error={err}"));
        }
        Err(err) => return Err(err.to_string()),
    }
    Ok(lines.join("\n"))
}
