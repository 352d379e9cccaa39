//! Interactive authoring shell.
//!
//! The shell owns everything a session borrows: the task counter, the subtask
//! registry and the compiled script store. Each typed line becomes one
//! [`ShellCommand`]; failures are reported and the loop keeps going.

mod command;
mod console;


pub use command::{HELP_TEXT, ShellCommand};
pub use console::{Console, Palette, Terminal};

use crate::config::Config;
use crate::error::{DeskError, Result};
use crate::events::{Event, EventAction, EventLog};
use crate::script::{SubtaskRegistry, template};
use crate::session::{CaptureOutcome, CredentialView, Session, TaskCounter};
use crate::store::ScriptStore;
use serde_json::json;
use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info, warn};

const INTRODUCTION: &str = "\
----------------------------------
[!] RemoteDesktop Interaction.
Type help or ? to list commands.
----------------------------------
1: Start a new block using 'new'
2: Assign subtasks using 'subtask'
3: Complete the interaction using 'complete'
";

/// Whether the loop keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Shell state plus the terminal it talks to.
pub struct Shell<T, W> {
    terminal: T,
    out: W,
    config: Config,
    palette: Palette,
    session: Session,
    subtasks: SubtaskRegistry,
    counter: TaskCounter,
    store: ScriptStore,
    events: Option<EventLog>,
    written: BTreeSet<String>,
}

impl<T: Terminal, W: Write> Shell<T, W> {
    pub fn new(terminal: T, out: W, config: Config, color: bool) -> Self {
        let events = config.events_file.as_ref().map(EventLog::new);
        Self {
            terminal,
            out,
            counter: TaskCounter::starting_at(config.first_task_index),
            palette: Palette::new(color),
            config,
            session: Session::new(),
            subtasks: SubtaskRegistry::new(),
            store: ScriptStore::new(),
            events,
            written: BTreeSet::new(),
        }
    }

    /// Prompt shown before each command line.
    pub fn prompt(&self) -> String {
        let base = self.palette.yellow(&format!(
            "{} >: remotedesktop :> ",
            self.config.operator_name.to_lowercase()
        ));
        match self.session.task_key() {
            Some(key) if self.session.is_active() => {
                format!("{}\n{}", self.palette.blue(&format!("[*] {}", key)), base)
            }
            _ => base,
        }
    }

    /// Read and execute lines until `exit`, end of input or a failed read,
    /// then flush any scripts that were not written to the output directory.
    pub fn run(&mut self) -> Result<()> {
        self.emit(INTRODUCTION)?;

        loop {
            let prompt = self.prompt();
            let line = match self.terminal.read_command(&prompt) {
                Ok(Some(line)) => line,
                Ok(None) => {
                    debug!("end of input");
                    break;
                }
                Err(err) => {
                    warn!("command input failed: {}", err);
                    let message = self.palette.red(&format!("[!] <ERROR> {}", err));
                    self.emit_line(&message)?;
                    break;
                }
            };

            match self.handle_line(&line) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => break,
                Err(err) => {
                    let message = self.palette.red(&format!("[!] <ERROR> {}", err));
                    self.emit_line(&message)?;
                }
            }
        }

        self.finish()
    }

    /// Execute one typed line.
    pub fn handle_line(&mut self, line: &str) -> Result<Flow> {
        match ShellCommand::parse(line)? {
            Some(command) => self.execute(command),
            None => Ok(Flow::Continue),
        }
    }

    fn execute(&mut self, command: ShellCommand) -> Result<Flow> {
        debug!(?command, "shell command");
        match command {
            ShellCommand::New => self.cmd_new()?,
            ShellCommand::Credentials => self.cmd_credentials()?,
            ShellCommand::ShowCredentials => self.cmd_show_credentials()?,
            ShellCommand::Subtask { id, path } => self.cmd_subtask(&id, &path)?,
            ShellCommand::SubtaskDir { dir } => self.cmd_subtask_dir(&dir)?,
            ShellCommand::Assigned => self.cmd_assigned()?,
            ShellCommand::Complete => self.cmd_complete()?,
            ShellCommand::Discard => self.cmd_discard()?,
            ShellCommand::Tasks => self.cmd_tasks()?,
            ShellCommand::Help => self.emit(HELP_TEXT)?,
            ShellCommand::Exit => return Ok(Flow::Exit),
            ShellCommand::Unknown(word) => {
                let message = self.palette.yellow(&format!(
                    "[!] Unknown command '{}'. Type help or ? to list commands.",
                    word
                ));
                self.emit_line(&message)?;
            }
        }
        Ok(Flow::Continue)
    }

    fn cmd_new(&mut self) -> Result<()> {
        let index = self.session.start(&self.counter)?;
        let key = template::function_name(index);
        self.record(Event::new(EventAction::Start).with_task(key.as_str()));
        self.emit_line(&format!("[!] Starting : '{}'\n", key))
    }

    fn cmd_credentials(&mut self) -> Result<()> {
        let outcome = self.session.capture_credentials(&mut self.terminal)?;

        if outcome != CaptureOutcome::Kept
            && let Some(credentials) = self.session.credentials()
        {
            let event = Event::new(EventAction::Credentials).with_details(json!({
                "computer": credentials.computer,
                "username": credentials.username,
                "overwrite": outcome == CaptureOutcome::Overwritten,
            }));
            let event = match self.session.task_key() {
                Some(key) => event.with_task(key),
                None => event,
            };
            self.record(event);
        }

        if outcome != CaptureOutcome::Captured
            && let Some(view) = self.session.show_credentials()
        {
            let lines = self.credential_lines(view);
            self.emit_line("[!] RemoteDesktop Details")?;
            self.emit(&lines)?;
        }
        Ok(())
    }

    fn cmd_show_credentials(&mut self) -> Result<()> {
        match self.session.show_credentials() {
            Some(view) => {
                let lines = self.credential_lines(view);
                self.emit_line("[!] The following Remote Desktop configuration is in place")?;
                self.emit(&lines)
            }
            None => {
                let message = self
                    .palette
                    .red("[!] There are currently no credentials assigned");
                self.emit_line(&message)
            }
        }
    }

    fn credential_lines(&self, view: CredentialView<'_>) -> String {
        format!(
            "[*] The target IP address is :   {}\n\
             [*] The Username is set to :     {}\n\
             [*] The Pasword is set to :      {}\n",
            self.palette.green(view.computer),
            self.palette.green(view.username),
            self.palette.green(view.password),
        )
    }

    fn cmd_subtask(&mut self, id: &str, path: &Path) -> Result<()> {
        self.subtasks.load_file(id, path)?;
        self.record_subtask(id, path);
        self.emit_line(&format!("[+] Subtask '{}' assigned", id))
    }

    fn cmd_subtask_dir(&mut self, dir: &Path) -> Result<()> {
        let loaded = self.subtasks.load_dir(dir, &self.config.fragment_glob)?;
        if loaded.is_empty() {
            let message = self.palette.yellow(&format!(
                "[!] No files matching '{}' in {}",
                self.config.fragment_glob,
                dir.display()
            ));
            return self.emit_line(&message);
        }
        for id in &loaded {
            self.record_subtask(id, dir);
            self.emit_line(&format!("[+] Subtask '{}' assigned", id))?;
        }
        Ok(())
    }

    fn record_subtask(&self, id: &str, source: &Path) {
        self.record(Event::new(EventAction::SubtaskAdd).with_details(json!({
            "subtask": id,
            "source": source.display().to_string(),
        })));
    }

    fn cmd_assigned(&mut self) -> Result<()> {
        let mut listing = self.palette.green("[?] Currently Assigned Commands ");
        listing.push('\n');
        for id in self.subtasks.ids() {
            listing.push_str("[>] ");
            listing.push_str(id);
            listing.push('\n');
        }
        self.emit(&listing)
    }

    fn cmd_complete(&mut self) -> Result<()> {
        let options = self.config.assemble_options();
        let completed = self
            .session
            .complete(&mut self.subtasks, &mut self.store, options)?;
        self.counter.advance();

        let key = completed.script.key.clone();
        self.record(
            Event::new(EventAction::Complete)
                .with_task(key.as_str())
                .with_details(json!({ "subtasks": completed.subtasks })),
        );

        if let Some(dir) = self.config.output_dir.clone()
            && let Some(path) = self
                .store
                .write_one(&key, &dir, &self.config.script_extension)?
        {
            self.written.insert(key.clone());
            self.emit_line(&format!("[+] Wrote {}", path.display()))?;
        }

        let message = self.palette.green(&format!("[+] Completed : '{}'", key));
        self.emit_line(&message)
    }

    fn cmd_discard(&mut self) -> Result<()> {
        let index = self.session.discard()?;
        let key = template::function_name(index);
        self.record(Event::new(EventAction::Discard).with_task(key.as_str()));
        self.emit_line(&format!("[!] Discarded : '{}'", key))
    }

    fn cmd_tasks(&mut self) -> Result<()> {
        if self.store.is_empty() {
            return self.emit_line("[!] No tasks have been completed");
        }
        let mut listing = self.palette.green("[?] Completed Tasks ");
        listing.push('\n');
        for key in self.store.keys() {
            listing.push_str("[>] ");
            listing.push_str(key);
            listing.push('\n');
        }
        self.emit(&listing)
    }

    /// Print every compiled script that has not been written to disk.
    fn finish(&mut self) -> Result<()> {
        if self.session.is_active() {
            info!("leaving shell with an unfinished task");
        }

        let pending: Vec<String> = self
            .store
            .keys()
            .filter(|key| !self.written.contains(*key))
            .map(str::to_string)
            .collect();
        for key in pending {
            if let Some(script) = self.store.get(&key) {
                let script = script.to_string();
                self.emit(&script)?;
            }
        }
        Ok(())
    }

    fn record(&self, event: Event) {
        if let Some(log) = &self.events {
            log.record(&event);
        }
    }

    fn emit(&mut self, text: &str) -> Result<()> {
        self.out
            .write_all(text.as_bytes())
            .map_err(|e| DeskError::IoError(format!("failed to write output: {}", e)))
    }

    fn emit_line(&mut self, text: &str) -> Result<()> {
        self.emit(text)?;
        self.emit("\n")
    }
}
