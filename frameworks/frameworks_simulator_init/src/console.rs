//! Console Front End
//!
//! Line-oriented stand-in for the interactive panel: reads commands, runs
//! them against a [`MemorySession`] and writes the results.
//!
//! Session errors are printed and the loop continues; only I/O errors on
//! the console streams end [`Console::run`].

use crate::commands::{Command, HELP};
use api_facades::{MemorySession, SessionError};
use entities_tasks::TaskId;
use log::{debug, info};
use rand::Rng;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Widest memory bar printed by `blocks`
pub const BAR_WIDTH: usize = 64;

const PROMPT: &str = "memsim> ";

/// Whether the console should keep reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Console<R: Rng> {
    session: MemorySession,
    snapshot_path: PathBuf,
    rng: R,
}

impl<R: Rng> Console<R> {
    pub fn new(session: MemorySession, snapshot_path: PathBuf, rng: R) -> Self {
        Self {
            session,
            snapshot_path,
            rng,
        }
    }

    pub fn session(&self) -> &MemorySession {
        &self.session
    }

    pub fn into_session(self) -> MemorySession {
        self.session
    }

    /// Read commands from `input` until `quit` or end of input
    pub fn run<I: BufRead, W: Write>(&mut self, input: I, out: &mut W) -> io::Result<()> {
        write!(out, "{}", PROMPT)?;
        out.flush()?;

        for line in input.lines() {
            let line = line?;
            let flow = match Command::parse(&line) {
                Ok(Some(command)) => self.execute(command, out)?,
                Ok(None) => Flow::Continue,
                Err(err) => {
                    writeln!(out, "error: {}", err)?;
                    Flow::Continue
                }
            };
            if flow == Flow::Quit {
                return Ok(());
            }
            write!(out, "{}", PROMPT)?;
            out.flush()?;
        }

        writeln!(out)?;
        Ok(())
    }

    /// Run a single command
    pub fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> io::Result<Flow> {
        debug!("console command: {:?}", command);
        match command {
            Command::Add {
                name,
                size,
                lifetime,
                strategy,
            } => {
                let strategy = strategy.unwrap_or(self.session.default_strategy());
                match self.session.add_task(&name, size, lifetime, strategy) {
                    Ok(task) => writeln!(out, "added {} with {}", task, strategy)?,
                    Err(err) => report(out, &err)?,
                }
            }
            Command::Random => match self.session.add_random_task(&mut self.rng) {
                Ok(task) => writeln!(out, "added {}", task)?,
                Err(err) => report(out, &err)?,
            },
            Command::Remove(id) => {
                let removed = match id {
                    None => self.session.remove_oldest(),
                    Some(raw) => self.session.remove(TaskId::from(raw)),
                };
                match removed {
                    Some(task) => writeln!(out, "removed {}", task)?,
                    None => writeln!(out, "no such task")?,
                }
            }
            Command::Defrag => {
                let moved = self.session.defragment();
                writeln!(out, "defragmented, {} tasks moved", moved)?;
            }
            Command::Blocks => {
                writeln!(out, "[{}]", render_bar(&self.session.slots(), BAR_WIDTH))?;
                let blocks = self.session.free_blocks();
                if blocks.is_empty() {
                    writeln!(out, "no free blocks")?;
                }
                for block in blocks {
                    writeln!(out, "free [{}, {}) len {}", block.start, block.end(), block.len)?;
                }
            }
            Command::Stats => {
                let stats = self.session.stats();
                writeln!(
                    out,
                    "capacity {} | used {} | free {} | free blocks {} | largest {} | tasks {} | fragmentation {:.1}%",
                    stats.capacity,
                    stats.used,
                    stats.free,
                    stats.free_blocks,
                    stats.largest_free_block,
                    stats.allocated_tasks,
                    stats.fragmentation() * 100.0
                )?;
            }
            Command::List => {
                let tasks = self.session.tasks();
                if tasks.is_empty() {
                    writeln!(out, "no tasks")?;
                }
                for task in tasks {
                    writeln!(out, "{}", task)?;
                }
            }
            Command::Save(path) => {
                let path = path.unwrap_or_else(|| self.snapshot_path.clone());
                match self.session.save(&path) {
                    Ok(count) => writeln!(out, "saved {} tasks to {}", count, path.display())?,
                    Err(err) => report(out, &err)?,
                }
            }
            Command::Load(path) => {
                let path = path.unwrap_or_else(|| self.snapshot_path.clone());
                match self.session.load(&path) {
                    Ok(report) => {
                        writeln!(out, "loaded {} tasks from {}", report.loaded.len(), path.display())?;
                        for (task, err) in &report.rejected {
                            writeln!(out, "not restored: {} ({})", task, err)?;
                        }
                    }
                    Err(SessionError::Snapshot(err)) if !err.applied().is_empty() => {
                        writeln!(out, "error: {}", err)?;
                        writeln!(out, "{} tasks before the error were loaded", err.applied().len())?;
                    }
                    Err(err) => report(out, &err)?,
                }
            }
            Command::Tick => {
                let expired = self.session.tick();
                writeln!(out, "tick: {} tasks expired", expired.len())?;
                for task in expired {
                    writeln!(out, "expired {}", task)?;
                }
            }
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Quit => {
                info!("console quit requested");
                return Ok(Flow::Quit);
            }
        }
        Ok(Flow::Continue)
    }
}

fn report<W: Write>(out: &mut W, err: &SessionError) -> io::Result<()> {
    writeln!(out, "error: {}", err)
}

/// Render slots as a bar at most `width` cells wide
///
/// Each cell covers an equal run of slots: `#` fully used, `+` partly used,
/// `.` free.
pub fn render_bar(slots: &[Option<TaskId>], width: usize) -> String {
    if slots.is_empty() || width == 0 {
        return String::new();
    }
    let per_cell = slots.len().div_ceil(width);
    slots
        .chunks(per_cell)
        .map(|cell| {
            let used = cell.iter().filter(|slot| slot.is_some()).count();
            if used == cell.len() {
                '#'
            } else if used == 0 {
                '.'
            } else {
                '+'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn console(capacity: usize) -> Console<StdRng> {
        Console::new(
            MemorySession::without_lifecycle(capacity),
            PathBuf::from("unused.txt"),
            StdRng::seed_from_u64(3),
        )
    }

    fn run_line(console: &mut Console<StdRng>, line: &str) -> String {
        let mut out = Vec::new();
        let command = Command::parse(line).unwrap().unwrap();
        console.execute(command, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_render_bar() {
        let id = TaskId::next();
        let slots = vec![Some(id), Some(id), Some(id), None, None, None];
        assert_eq!(render_bar(&slots, 6), "###...");
        assert_eq!(render_bar(&slots, 3), "#+.");
        assert_eq!(render_bar(&[], 8), "");
    }

    #[test]
    fn test_add_and_list() {
        let mut console = console(10);
        assert!(run_line(&mut console, "add job 3 5").starts_with("added"));
        let listing = run_line(&mut console, "list");
        assert!(listing.contains("job (size 3, 5 ticks left)"));
    }

    #[test]
    fn test_errors_are_printed() {
        let mut console = console(4);
        assert!(run_line(&mut console, "add big 9 5").starts_with("error:"));
        assert_eq!(run_line(&mut console, "remove"), "no such task\n");
    }

    #[test]
    fn test_remove_by_id() {
        let mut console = console(10);
        run_line(&mut console, "add a 2 5");
        let b = console.session().add_task("b", 2, 5, usecases_memory_management::Strategy::FirstFit).unwrap();
        let out = run_line(&mut console, &format!("remove {}", b.id().as_u64()));
        assert!(out.contains("removed"));
        assert_eq!(console.session().tasks().len(), 1);
        assert_eq!(console.session().tasks()[0].name(), "a");

        let unknown = b.id().as_u64() + 1000;
        assert_eq!(run_line(&mut console, &format!("remove {}", unknown)), "no such task\n");
        assert_eq!(console.session().tasks().len(), 1);
    }

    #[test]
    fn test_run_stops_at_quit() {
        let mut console = console(10);
        let input = "add a 2 5\n\nbogus\nquit\nadd b 2 5\n";
        let mut out = Vec::new();
        console.run(input.as_bytes(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("unknown command 'bogus'"));
        assert_eq!(console.session().tasks().len(), 1);
    }
}
