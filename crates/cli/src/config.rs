#![forbid(unsafe_code)]

use cl_core::EventCategory;
use cl_core::ids::ProjectName;
use std::path::PathBuf;

pub(crate) const DEFAULT_DATA_DIRNAME: &str = ".changelinks";

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Invocation {
    Help,
    Run(CliConfig),
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct CliConfig {
    pub(crate) data_dir: PathBuf,
    pub(crate) project: ProjectName,
    pub(crate) repo: PathBuf,
    pub(crate) git_bin: String,
    pub(crate) command: Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum EventKind {
    Created,
    Submitted,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Command {
    Get {
        category: EventCategory,
        key: String,
    },
    Record {
        category: EventCategory,
        key: String,
        event_id: String,
    },
    Dump {
        category: EventCategory,
    },
    /// Tag is kept raw so an unknown one reaches the store's own check.
    Resolve {
        tag: String,
        keys: Vec<String>,
    },
    Links {
        kind: EventKind,
        change_id: String,
        commit_id: String,
    },
}

pub(crate) fn usage() -> &'static str {
    "changelinks — track and resolve links between change lifecycle events\n\n\
USAGE:\n\
  changelinks [--data-dir DIR] [--project NAME] [--repo DIR] [--git-bin PATH] COMMAND\n\n\
COMMANDS:\n\
  get CATEGORY KEY                 print the last event id recorded for KEY\n\
  record CATEGORY KEY EVENT_ID     record EVENT_ID as the last event for KEY\n\
  dump CATEGORY                    list every recorded key of a category\n\
  resolve CATEGORY KEY...          first recorded event id among KEYs\n\
  links created|submitted --change-id ID --commit SHA\n\
                                   links for a new event, in emission order\n\n\
CATEGORY is SourceChangeCreated (created) or SourceChangeSubmitted (submitted).\n\n\
ENVIRONMENT:\n\
  CL_DATA_DIR, CL_PROJECT, CL_REPO, CL_GIT_BIN back the flags above.\n\
  CL_LOG sets the log filter (default: info). Logs go to stderr.\n"
}

pub(crate) fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) fn parse_args(
    args: &[String],
    env: impl Fn(&str) -> Option<String>,
) -> Result<Invocation, String> {
    if args.iter().any(|a| a == "-h" || a == "--help") {
        return Ok(Invocation::Help);
    }

    let mut data_dir: Option<PathBuf> = env("CL_DATA_DIR").map(PathBuf::from);
    let mut project: Option<String> = env("CL_PROJECT");
    let mut repo: Option<PathBuf> = env("CL_REPO").map(PathBuf::from);
    let mut git_bin: Option<String> = env("CL_GIT_BIN");

    let mut i = 0usize;
    while i < args.len() {
        let a = args[i].as_str();
        match a {
            "--data-dir" => {
                i += 1;
                let v = args.get(i).ok_or("--data-dir requires DIR")?;
                data_dir = Some(PathBuf::from(v));
            }
            "--project" => {
                i += 1;
                let v = args.get(i).ok_or("--project requires NAME")?;
                project = Some(v.to_string());
            }
            "--repo" => {
                i += 1;
                let v = args.get(i).ok_or("--repo requires DIR")?;
                repo = Some(PathBuf::from(v));
            }
            "--git-bin" => {
                i += 1;
                let v = args.get(i).ok_or("--git-bin requires PATH")?;
                git_bin = Some(v.to_string());
            }
            other if other.starts_with("--") => {
                return Err(format!("Unknown arg: {other}\n\n{}", usage()));
            }
            _ => break,
        }
        i += 1;
    }

    let command = parse_command(&args[i..])?;
    let project = project.ok_or("--project (or CL_PROJECT) is required")?;
    let project = ProjectName::try_new(project)
        .map_err(|err| format!("invalid --project: {}", err.message()))?;

    Ok(Invocation::Run(CliConfig {
        data_dir: data_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIRNAME)),
        project,
        repo: repo.unwrap_or_else(|| PathBuf::from(".")),
        git_bin: git_bin.unwrap_or_else(|| "git".to_string()),
        command,
    }))
}

fn parse_command(args: &[String]) -> Result<Command, String> {
    let Some((name, rest)) = args.split_first() else {
        return Err(format!("missing COMMAND\n\n{}", usage()));
    };

    match name.as_str() {
        "get" => match rest {
            [category, key] => Ok(Command::Get {
                category: parse_category(category)?,
                key: key.to_string(),
            }),
            _ => Err("usage: get CATEGORY KEY".to_string()),
        },
        "record" => match rest {
            [category, key, event_id] => Ok(Command::Record {
                category: parse_category(category)?,
                key: key.to_string(),
                event_id: event_id.to_string(),
            }),
            _ => Err("usage: record CATEGORY KEY EVENT_ID".to_string()),
        },
        "dump" => match rest {
            [category] => Ok(Command::Dump {
                category: parse_category(category)?,
            }),
            _ => Err("usage: dump CATEGORY".to_string()),
        },
        "resolve" => match rest {
            [tag, keys @ ..] if !keys.is_empty() => Ok(Command::Resolve {
                tag: tag.to_string(),
                keys: keys.to_vec(),
            }),
            _ => Err("usage: resolve CATEGORY KEY...".to_string()),
        },
        "links" => parse_links(rest),
        other => Err(format!("Unknown command: {other}\n\n{}", usage())),
    }
}

fn parse_links(args: &[String]) -> Result<Command, String> {
    let Some((kind, rest)) = args.split_first() else {
        return Err("usage: links created|submitted --change-id ID --commit SHA".to_string());
    };
    let kind = match kind.as_str() {
        "created" => EventKind::Created,
        "submitted" => EventKind::Submitted,
        other => return Err(format!("links: unknown event kind {other} (expected created|submitted)")),
    };

    let mut change_id: Option<String> = None;
    let mut commit_id: Option<String> = None;
    let mut i = 0usize;
    while i < rest.len() {
        match rest[i].as_str() {
            "--change-id" => {
                i += 1;
                let v = rest.get(i).ok_or("--change-id requires ID")?;
                change_id = Some(v.to_string());
            }
            "--commit" => {
                i += 1;
                let v = rest.get(i).ok_or("--commit requires SHA")?;
                commit_id = Some(v.to_string());
            }
            other => return Err(format!("links: unexpected argument {other}")),
        }
        i += 1;
    }

    Ok(Command::Links {
        kind,
        change_id: change_id.ok_or("links requires --change-id")?,
        commit_id: commit_id.ok_or("links requires --commit")?,
    })
}

fn parse_category(tag: &str) -> Result<EventCategory, String> {
    EventCategory::parse_tag(tag).map_err(|err| err.to_string())
}
