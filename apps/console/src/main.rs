use std::{fmt::Write as _, sync::Arc, time::Duration};

use anyhow::Result;
use clap::{Parser, ValueEnum};
use client_core::{
    config::normalize_base_url, load_settings, workflow::ListSection, ClientEvent, HttpBackend,
    InterviewDraft, RoleView, SyncClient, TaskDraft, TokioClock,
};
use shared::domain::{Role, TaskId};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::broadcast::error::RecvError,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
struct Args {
    /// Backend base url; overrides client.toml and the environment.
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long, value_enum, default_value_t = RoleArg::Hr)]
    role: RoleArg,
    #[arg(long)]
    poll_secs: Option<u64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum RoleArg {
    Employee,
    Hr,
}

impl From<RoleArg> for Role {
    fn from(value: RoleArg) -> Self {
        match value {
            RoleArg::Employee => Role::Employee,
            RoleArg::Hr => Role::Hr,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Task(TaskDraft),
    Interview(InterviewDraft),
    Advance(TaskId),
    Role(Role),
    Refresh,
    Help,
    Quit,
}

const HELP: &str = "\
commands:
  task <title> | <description>
  interview <candidate> | <position> | <YYYY-MM-DDTHH:MM>
  advance <task id>
  role employee|hr
  refresh
  quit";

fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));
    let parts: Vec<&str> = rest.split('|').map(str::trim).collect();

    match verb {
        "task" => match parts.as_slice() {
            [title, description] => Ok(Command::Task(TaskDraft::new(*title, *description))),
            _ => Err("usage: task <title> | <description>".into()),
        },
        "interview" => match parts.as_slice() {
            [candidate, position, at] => Ok(Command::Interview(InterviewDraft::new(
                *candidate, *position, *at,
            ))),
            _ => Err("usage: interview <candidate> | <position> | <time>".into()),
        },
        "advance" if !rest.trim().is_empty() => Ok(Command::Advance(TaskId::new(rest.trim()))),
        "role" => match rest.trim() {
            "employee" => Ok(Command::Role(Role::Employee)),
            "hr" => Ok(Command::Role(Role::Hr)),
            other => Err(format!("unknown role '{other}'")),
        },
        "refresh" => Ok(Command::Refresh),
        "help" | "" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(format!("unknown command '{other}', try 'help'")),
    }
}

fn render_section<T>(out: &mut String, section: &ListSection<T>, row: impl Fn(&T) -> String) {
    let _ = writeln!(out, "== {} ==", section.heading);
    if section.is_empty() {
        let _ = writeln!(out, "  {}", section.empty_text);
    }
    for item in &section.items {
        let _ = writeln!(out, "  {}", row(item));
    }
}

fn render(view: &RoleView) -> String {
    let mut out = String::new();
    match view {
        RoleView::Employee(employee) => {
            let _ = writeln!(out, "[{}] use: task", employee.form.heading);
            render_section(&mut out, &employee.requests, |row| {
                format!("#{} {} [{}]", row.task_id, row.title, row.badge.label)
            });
        }
        RoleView::Hr(hr) => {
            let _ = writeln!(out, "[{}] use: interview", hr.form.heading);
            render_section(&mut out, &hr.upcoming, |card| {
                let join = card
                    .join
                    .as_ref()
                    .map(|join| format!(" {}: {}", join.label, join.link))
                    .unwrap_or_default();
                format!(
                    "{} for {} at {}{join}",
                    card.candidate_name, card.position, card.scheduled_local
                )
            });
            render_section(&mut out, &hr.inbox, |row| {
                format!(
                    "#{} {} ({}) [{}] -> {}",
                    row.task_id,
                    row.title,
                    row.requested_by,
                    row.badge.label,
                    row.affordance.label()
                )
            });
        }
    }
    out
}

async fn run_command(client: &SyncClient, role: &mut Role, command: Command) -> bool {
    let outcome = match command {
        Command::Task(draft) => {
            client.set_task_draft(draft).await;
            client.submit_task().await.map(|task| format!("sent #{}", task.id))
        }
        Command::Interview(draft) => {
            client.set_interview_draft(draft).await;
            client
                .submit_interview()
                .await
                .map(|interview| format!("scheduled #{}", interview.id))
        }
        Command::Advance(task_id) => client
            .advance_task(&task_id)
            .await
            .map(|task| format!("#{} is now {}", task.id, task.status)),
        Command::Role(next) => {
            *role = next;
            print!("{}", render(&client.view(*role).await));
            return true;
        }
        Command::Refresh => {
            client.refresh().await;
            return true;
        }
        Command::Help => {
            println!("{HELP}");
            return true;
        }
        Command::Quit => return false,
    };

    match outcome {
        Ok(message) => println!("{message}"),
        Err(err) if err.is_validation() => println!("{err}"),
        // Alerts for failed writes arrive on the event channel.
        Err(err) => warn!(error = %err, "command failed"),
    }
    true
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings()?;
    if let Some(url) = args.api_url.as_deref() {
        settings.api_base_url = normalize_base_url(url)?;
    }
    if let Some(secs) = args.poll_secs.filter(|secs| *secs > 0) {
        settings.poll_interval = Duration::from_secs(secs);
    }
    info!(api = %settings.api_base_url, "connecting to virtual hr backend");

    let client = SyncClient::new(Arc::new(HttpBackend::from_settings(&settings)));
    let mut events = client.subscribe_events();
    let handle = client.start_polling(Arc::new(TokioClock), settings.poll_interval);
    let mut role: Role = args.role.into();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{HELP}");

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(ClientEvent::SnapshotApplied { .. }) | Err(RecvError::Lagged(_)) => {
                    print!("{}", render(&client.view(role).await));
                }
                Ok(ClientEvent::Alert { message, .. }) => println!("!! {message}"),
                Err(RecvError::Closed) => break,
            },
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_command(&line) {
                    Ok(command) => {
                        if !run_command(&client, &mut role, command).await {
                            break;
                        }
                    }
                    Err(usage) => println!("{usage}"),
                }
            }
        }
    }

    handle.stop().await;
    Ok(())
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
