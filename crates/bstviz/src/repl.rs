//! Line-oriented controller shared by the interactive REPL and the script
//! runner.
//!
//! Engine commands are queued on the session and the controller then
//! settles: it waits until the queue drains, or until the worker parks on
//! a manual step, whichever comes first. `next` releases one parked step
//! and settles again.

use std::collections::VecDeque;
use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::mpsc::Receiver;

use bstviz_core::{Discipline, EngineEvent, Key, StepMode, TraversalOrder, parse_key};
use bstviz_runtime::{Command, DEFAULT_FILL_COUNT, Outcome, Session, Ticket};
use web_time::Duration;

use crate::error::{CliError, Result};
use crate::render;

const SETTLE_POLL: Duration = Duration::from_millis(20);

pub const HELP: &str = "\
commands:
  insert N | delete N | search N    tree operations
  pre | in | post                   traversals
  balance | clear                   rebuild balanced / remove everything
  random [COUNT]                    clear, then insert COUNT random keys (default 15)
  avl | bst                         switch discipline (clears the tree)
  auto | manual                     step mode
  next                              advance one manual step
  show | stats                      print the tree / the readout
  help | quit";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Insert(Key),
    Delete(Key),
    Search(Key),
    Traverse(TraversalOrder),
    Balance,
    Clear,
    Random(usize),
    Discipline(Discipline),
    Mode(StepMode),
    Next,
    Show,
    Stats,
    Help,
    Quit,
}

/// Parse one line. Blank lines and `#` comments yield `None`.
pub fn parse_line(input: &str) -> Result<Option<Line>> {
    let input = input.trim();
    if input.is_empty() || input.starts_with('#') {
        return Ok(None);
    }
    let mut words = input.split_whitespace();
    let verb = words.next().unwrap_or_default().to_ascii_lowercase();
    let arg = words.next();
    if let Some(extra) = words.next() {
        return Err(CliError::invalid(format!("unexpected `{extra}` after {verb}")));
    }

    let key = |verb: &str| -> Result<Key> {
        let arg = arg.ok_or_else(|| CliError::invalid(format!("{verb} needs a key")))?;
        Ok(parse_key(arg)?)
    };

    let line = match verb.as_str() {
        "insert" | "i" => Line::Insert(key("insert")?),
        "delete" | "d" => Line::Delete(key("delete")?),
        "search" | "s" => Line::Search(key("search")?),
        "pre" => Line::Traverse(TraversalOrder::PreOrder),
        "in" => Line::Traverse(TraversalOrder::InOrder),
        "post" => Line::Traverse(TraversalOrder::PostOrder),
        "balance" => Line::Balance,
        "clear" => Line::Clear,
        "random" => Line::Random(match arg {
            Some(count) => count
                .parse()
                .map_err(|_| CliError::invalid(format!("random count {count:?} is not a number")))?,
            None => DEFAULT_FILL_COUNT,
        }),
        "avl" => Line::Discipline(Discipline::Avl),
        "bst" => Line::Discipline(Discipline::Bst),
        "auto" => Line::Mode(StepMode::Auto),
        "manual" => Line::Mode(StepMode::Manual),
        "next" | "n" => Line::Next,
        "show" => Line::Show,
        "stats" => Line::Stats,
        "help" | "?" => Line::Help,
        "quit" | "exit" | "q" => Line::Quit,
        _ => {
            return Err(CliError::UnknownCommand {
                input: input.to_string(),
            });
        }
    };
    if arg.is_some() && !matches!(line, Line::Insert(_) | Line::Delete(_) | Line::Search(_) | Line::Random(_)) {
        return Err(CliError::invalid(format!("{verb} takes no argument")));
    }
    Ok(Some(line))
}

/// Whether to keep reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Drives a [`Session`] from parsed lines and writes what happened.
pub struct Controller<W: Write> {
    session: Session,
    events: Receiver<EngineEvent>,
    in_flight: VecDeque<Ticket>,
    out: W,
}

impl<W: Write> Controller<W> {
    pub fn new(session: Session, events: Receiver<EngineEvent>, out: W) -> Self {
        Self {
            session,
            events,
            in_flight: VecDeque::new(),
            out,
        }
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The writer output goes to.
    pub fn output(&mut self) -> &mut W {
        &mut self.out
    }

    /// Run one line.
    pub fn execute(&mut self, line: Line) -> Result<Flow> {
        tracing::debug!(?line, "execute");
        match line {
            Line::Insert(key) => self.submit(Command::Insert(key))?,
            Line::Delete(key) => self.submit(Command::Delete(key))?,
            Line::Search(key) => self.submit(Command::Search(key))?,
            Line::Traverse(order) => self.submit(Command::Traverse(order))?,
            Line::Balance => self.submit(Command::Balance)?,
            Line::Clear => self.submit(Command::Clear)?,
            Line::Discipline(discipline) => self.submit(Command::SetDiscipline(discipline))?,
            Line::Random(count) => {
                let (keys, ticket) = self.session.random_fill(count, None)?;
                writeln!(self.out, "random keys: {keys:?}")?;
                self.in_flight.push_back(ticket);
                self.settle()?;
            }
            Line::Mode(mode) => {
                self.session.set_step_mode(mode);
                writeln!(self.out, "step mode: {}", mode_name(mode))?;
                self.settle()?;
            }
            Line::Next => {
                if self.session.advance() {
                    self.settle()?;
                } else {
                    writeln!(self.out, "nothing to advance")?;
                }
            }
            Line::Show => self.show()?,
            Line::Stats => {
                let readout = self.session.board().snapshot();
                write!(self.out, "{}", render::render_readout(&readout))?;
            }
            Line::Help => writeln!(self.out, "{HELP}")?,
            Line::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Parse and run every line of `input`. Interactive mode reports a bad
    /// line and keeps going; otherwise the first error is returned with its
    /// line number.
    pub fn run_lines(&mut self, input: impl BufRead, source: Option<&Path>) -> Result<()> {
        let interactive = source.is_none();
        for (index, text) in input.lines().enumerate() {
            let text = text?;
            let result = parse_line(&text).and_then(|line| match line {
                Some(line) => self.execute(line),
                None => Ok(Flow::Continue),
            });
            match result {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(error) if interactive => {
                    tracing::debug!(%error, "line rejected");
                    writeln!(self.out, "error: {error}")?;
                }
                Err(error) => {
                    return Err(CliError::Script {
                        path: source.map(Path::to_path_buf).unwrap_or_default(),
                        line: index + 1,
                        source: Box::new(error),
                    });
                }
            }
            if interactive {
                self.out.flush()?;
            }
        }
        self.finish()
    }

    /// Let queued work finish in auto mode, then print the final state.
    pub fn finish(&mut self) -> Result<()> {
        if !self.in_flight.is_empty() {
            self.session.set_step_mode(StepMode::Auto);
            self.settle()?;
        }
        self.show()
    }

    pub fn show(&mut self) -> Result<()> {
        let tree = render::render_tree(&self.session.engine().lock_tree());
        let readout = self.session.board().snapshot();
        write!(self.out, "{tree}{}", render::render_readout(&readout))?;
        Ok(())
    }

    /// Stop the worker and hand back the writer.
    pub fn into_output(self) -> W {
        self.session.shutdown();
        self.out
    }

    fn submit(&mut self, command: Command) -> Result<()> {
        let ticket = self.session.submit(command)?;
        self.in_flight.push_back(ticket);
        self.settle()
    }

    /// Wait until nothing is in flight or the worker parks on a step.
    fn settle(&mut self) -> Result<()> {
        loop {
            while let Some(outcome) = self.in_flight.front().and_then(Ticket::try_outcome) {
                self.in_flight.pop_front();
                self.report_events()?;
                self.report(outcome)?;
            }
            if self.in_flight.is_empty() {
                return Ok(());
            }
            if self.session.wait_until_awaiting(SETTLE_POLL) {
                self.report_events()?;
                self.show()?;
                writeln!(self.out, "-- step ready: `next` to advance, `auto` to finish --")?;
                return Ok(());
            }
        }
    }

    fn report(&mut self, outcome: Outcome) -> Result<()> {
        match outcome {
            Outcome::Inserted(false) => writeln!(self.out, "duplicate ignored")?,
            Outcome::Deleted(false) => writeln!(self.out, "not in tree")?,
            Outcome::Traversed(keys) => {
                let keys: Vec<String> = keys.iter().map(Key::to_string).collect();
                writeln!(self.out, "{}", keys.join(" "))?;
            }
            Outcome::Inserted(true) | Outcome::Deleted(true) | Outcome::Searched(_) | Outcome::Done => {}
        }
        Ok(())
    }

    fn report_events(&mut self) -> Result<()> {
        while let Ok(event) = self.events.try_recv() {
            match event {
                EngineEvent::RotationStarted { rotation, pivot } => {
                    writeln!(self.out, "Performing {rotation} on Node {pivot}")?;
                }
                EngineEvent::NotFound(key) => writeln!(self.out, "{key} not found")?,
                _ => {}
            }
        }
        Ok(())
    }
}

fn mode_name(mode: StepMode) -> &'static str {
    match mode {
        StepMode::Auto => "auto",
        StepMode::Manual => "manual",
    }
}
