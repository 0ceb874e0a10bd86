//! Line-oriented command shell over the shared board.
//!
//! Each line is one command. Board errors (validation, unknown id, bad
//! status) are printed and the shell keeps going.

use anyhow::{Context, Result};
use chrono::Utc;
use chrono_tz::Tz;
use kankai_core::{format_minutes, Task, TaskStatus, TaskStore};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::board::Board;

const HELP: &str = "\
Commands:
  board                          show the board
  show <id>                      task details
  add <duration> <low|medium|high> <name...>
                                 add a task; duration like 90, 45m, 2h or 1h30m
  start <id> | done <id> | back <id>
                                 move a task to in progress / done / to do
  move <id> <todo|inprogress|done>
  delete <id>
  suggest                        open tasks, easiest and shortest first
  progress                       completion summary
  export [file.xlsx]             spreadsheet report with status chart
  export-csv [file.csv]          same rows as CSV
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Help,
    Board,
    Show {
        id: String,
    },
    Add {
        minutes: i64,
        difficulty: String,
        name: String,
    },
    Move {
        id: String,
        status: String,
    },
    Delete {
        id: String,
    },
    Suggest,
    Progress,
    Export {
        path: Option<PathBuf>,
    },
    ExportCsv {
        path: Option<PathBuf>,
    },
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Parse one input line. `Ok(None)` for blank lines.
pub fn parse_line(line: &str) -> Result<Option<ShellCommand>, String> {
    let mut parts = line.split_whitespace();
    let Some(head) = parts.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = parts.collect();

    let id_arg = |usage: &str| -> Result<String, String> {
        match rest.as_slice() {
            [id] => Ok(normalize_id(id)),
            _ => Err(format!("usage: {usage}")),
        }
    };

    let cmd = match head.to_ascii_lowercase().as_str() {
        "help" | "?" => ShellCommand::Help,
        "board" | "list" | "ls" => ShellCommand::Board,
        "show" => ShellCommand::Show {
            id: id_arg("show <id>")?,
        },
        "add" => {
            let [duration, difficulty, name @ ..] = rest.as_slice() else {
                return Err("usage: add <duration> <low|medium|high> <name...>".to_string());
            };
            let minutes = parse_duration(duration)
                .ok_or_else(|| format!("invalid duration '{duration}' (try 90, 45m, 2h or 1h30m)"))?;
            ShellCommand::Add {
                minutes,
                difficulty: difficulty.to_string(),
                name: name.join(" "),
            }
        }
        "start" => ShellCommand::Move {
            id: id_arg("start <id>")?,
            status: TaskStatus::InProgress.as_str().to_string(),
        },
        "done" | "finish" => ShellCommand::Move {
            id: id_arg("done <id>")?,
            status: TaskStatus::Done.as_str().to_string(),
        },
        "back" | "return" => ShellCommand::Move {
            id: id_arg("back <id>")?,
            status: TaskStatus::Todo.as_str().to_string(),
        },
        "move" => match rest.as_slice() {
            [id, status] => ShellCommand::Move {
                id: normalize_id(id),
                status: status.to_string(),
            },
            _ => return Err("usage: move <id> <todo|inprogress|done>".to_string()),
        },
        "delete" | "rm" => ShellCommand::Delete {
            id: id_arg("delete <id>")?,
        },
        "suggest" => ShellCommand::Suggest,
        "progress" => ShellCommand::Progress,
        "export" => ShellCommand::Export {
            path: rest.first().map(PathBuf::from),
        },
        "export-csv" => ShellCommand::ExportCsv {
            path: rest.first().map(PathBuf::from),
        },
        "quit" | "exit" => ShellCommand::Quit,
        other => return Err(format!("unknown command '{other}' (type help)")),
    };
    Ok(Some(cmd))
}

/// "90", "45m", "2h", "1h30m" -> minutes. Signs pass through so the store
/// can reject non-positive values with a proper validation error.
pub fn parse_duration(input: &str) -> Option<i64> {
    let s = input.trim().to_ascii_lowercase();
    if let Ok(n) = s.parse::<i64>() {
        return Some(n);
    }

    let (hours, rest) = match s.split_once('h') {
        Some((h, rest)) => (h.parse::<i64>().ok()?, rest),
        None => (0, s.as_str()),
    };
    let minutes = match rest.strip_suffix('m') {
        Some(m) => m.parse::<i64>().ok()?,
        None if rest.is_empty() => 0,
        None => return None,
    };
    hours.checked_mul(60)?.checked_add(minutes)
}

/// Bare numbers are shorthand for `task-<n>`.
fn normalize_id(raw: &str) -> String {
    if !raw.is_empty() && raw.chars().all(|c| c.is_ascii_digit()) {
        format!("task-{raw}")
    } else {
        raw.to_string()
    }
}

pub fn execute(board: &Board, cmd: ShellCommand, tz: Tz, out: &mut impl Write) -> Result<Flow> {
    match cmd {
        ShellCommand::Help => writeln!(out, "{HELP}")?,
        ShellCommand::Board => render_board(&board.snapshot(), out)?,
        ShellCommand::Show { id } => match board.get_task(&id) {
            Ok(t) => render_task(&t, tz, out)?,
            Err(e) => writeln!(out, "error: {e}")?,
        },
        ShellCommand::Add {
            minutes,
            difficulty,
            name,
        } => match board.create_task(&name, minutes, &difficulty) {
            Ok(t) => writeln!(out, "Created {} '{}' ({}, {})", t.id, t.name, t.estimate_label(), t.difficulty)?,
            Err(e) => writeln!(out, "error: {e}")?,
        },
        ShellCommand::Move { id, status } => match board.update_status(&id, &status) {
            Ok(outcome) if !outcome.transition.is_changed() => {
                writeln!(out, "{} is already {}", id, outcome.task.status.label())?
            }
            Ok(outcome) => {
                let t = &outcome.task;
                write!(out, "Moved {} '{}' to {}", t.id, t.name, t.status.label())?;
                if let Some(eff) = t.efficiency_label() {
                    write!(out, " - {eff}")?;
                }
                writeln!(out)?;
            }
            Err(e) => writeln!(out, "error: {e}")?,
        },
        ShellCommand::Delete { id } => match board.delete_task(&id) {
            Ok(t) => writeln!(out, "Deleted {} '{}'", t.id, t.name)?,
            Err(e) => writeln!(out, "error: {e}")?,
        },
        ShellCommand::Suggest => {
            let order = board.suggest_order();
            if order.is_empty() {
                writeln!(out, "No pending tasks to order.")?;
            } else {
                writeln!(out, "Suggested order (difficulty, then duration):")?;
                for (i, t) in order.iter().enumerate() {
                    writeln!(out, "{}. {} ({}, {})", i + 1, t.name, t.difficulty, t.estimate_label())?;
                }
            }
        }
        ShellCommand::Progress => {
            let p = board.progress();
            writeln!(
                out,
                "Done {}/{} ({}%) | in progress {} | pending {}",
                p.done, p.total, p.done_percentage, p.in_progress, p.pending
            )?;
        }
        ShellCommand::Export { path } => {
            let path = path.unwrap_or_else(|| PathBuf::from(kankai_report::default_file_name(Utc::now())));
            match export_xlsx_to(board, tz, &path) {
                Ok(()) => writeln!(out, "Wrote {}", path.display())?,
                Err(e) => writeln!(out, "error: {e:#}")?,
            }
        }
        ShellCommand::ExportCsv { path } => {
            let path = path.unwrap_or_else(|| {
                PathBuf::from(kankai_report::default_file_name(Utc::now())).with_extension("csv")
            });
            match export_csv_to(board, tz, &path) {
                Ok(()) => writeln!(out, "Wrote {}", path.display())?,
                Err(e) => writeln!(out, "error: {e:#}")?,
            }
        }
        ShellCommand::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

fn export_xlsx_to(board: &Board, tz: Tz, path: &Path) -> Result<()> {
    let bytes = board.export_xlsx(tz).context("build xlsx report")?;
    fs::write(path, bytes).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

fn export_csv_to(board: &Board, tz: Tz, path: &Path) -> Result<()> {
    let file = fs::File::create(path).with_context(|| format!("create {}", path.display()))?;
    board.export_csv(tz, file).context("write csv report")?;
    Ok(())
}

/// Render one consistent snapshot, one column per status.
pub fn render_board(store: &TaskStore, out: &mut impl Write) -> Result<()> {
    for status in TaskStatus::ALL {
        let column = store.list_by_status(status);
        writeln!(out, "== {} ({}) ==", status.label(), column.len())?;
        if column.is_empty() {
            writeln!(out, "  (empty)")?;
        }
        for t in column {
            write!(out, "  {:<8} {}  [{} | {}]", t.id, t.name, t.estimate_label(), t.difficulty)?;
            if let Some(eff) = t.efficiency_label() {
                write!(out, "  {eff}")?;
            }
            if t.delay_notified {
                if let Some(started) = t.started_at {
                    let late = kankai_core::minutes_between(started, Utc::now());
                    write!(out, "  (delayed, {} elapsed)", format_minutes(late))?;
                }
            }
            writeln!(out)?;
        }
    }
    Ok(())
}

fn render_task(t: &Task, tz: Tz, out: &mut impl Write) -> Result<()> {
    let stamp = |at: Option<chrono::DateTime<Utc>>| {
        at.map(|dt| dt.with_timezone(&tz).format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string())
    };
    writeln!(out, "{} '{}'", t.id, t.name)?;
    writeln!(out, "  status:     {}", t.status.label())?;
    writeln!(out, "  difficulty: {}", t.difficulty)?;
    writeln!(out, "  estimate:   {}", t.estimate_label())?;
    writeln!(out, "  started:    {}", stamp(t.started_at))?;
    writeln!(out, "  completed:  {}", stamp(t.completed_at))?;
    writeln!(out, "  efficiency: {}", t.efficiency_label().unwrap_or("-"))?;
    if t.delay_notified {
        writeln!(out, "  delay alert sent for this run")?;
    }
    Ok(())
}

/// Read commands from stdin until EOF or `quit`.
pub async fn run(board: Board, tz: Tz) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    {
        let mut stdout = std::io::stdout().lock();
        render_board(&board.snapshot(), &mut stdout)?;
        writeln!(stdout, "\nType 'help' for commands.")?;
    }

    loop {
        {
            let mut stdout = std::io::stdout().lock();
            write!(stdout, "kankai> ")?;
            stdout.flush().ok();
        }

        let Some(line) = lines.next_line().await.context("read stdin")? else {
            break;
        };

        let mut stdout = std::io::stdout().lock();
        match parse_line(&line) {
            Ok(None) => {}
            Ok(Some(cmd)) => {
                if execute(&board, cmd, tz, &mut stdout)? == Flow::Quit {
                    break;
                }
            }
            Err(msg) => writeln!(stdout, "{msg}")?,
        }
    }

    Ok(())
}
