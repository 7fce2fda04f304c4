//! # Session Controller
//!
//! Orchestrates one interactive session: reads lines, classifies them, runs
//! requests through the pipeline and the executor, renders the result and
//! persists history, presets and configuration.
//!
//! ```text
//! LineSource ─▶ InputLine ─┬─▶ ExCommandRegistry ─▶ CommandEvent ─▶ state / views
//!                          └─▶ prepare_request ─▶ Executor ─▶ decode_response
//!                                 ─▶ ResponseRecord ─▶ TerminalRenderer + History
//! ```
//!
//! All state lives in one [`SessionState`] owned here and threaded through
//! each step; storage is written after a step completes, never during.

use anyhow::Result;
use std::io::Write;

use crate::repl::commands::{CommandEvent, ExCommandRegistry, InputLine, EXECUTE_LOADED};
use crate::repl::errors::SessionError;
use crate::repl::io::LineSource;
use crate::repl::models::{now_timestamp, HistoryEntry, ResponseRecord, SessionState};
use crate::repl::pipeline::{
    collapse_pasted_lines, decode_response, is_paste_terminator, prepare_request, QuoteStyle,
    SecretMasker,
};
use crate::repl::services::{ExecutionOutput, Executor, SessionStorage, StoreError};
use crate::repl::views::TerminalRenderer;

/// Main prompt
pub const PROMPT: &str = "curl> ";

/// Prompt for continuation lines in paste mode
pub const PASTE_PROMPT: &str = "... ";

/// Drives the read, classify, execute and render loop
pub struct SessionController<E: Executor, L: LineSource, W: Write> {
    state: SessionState,
    storage: Box<dyn SessionStorage>,
    executor: E,
    lines: L,
    renderer: TerminalRenderer<W>,
    registry: ExCommandRegistry,
    masker: SecretMasker,
    quoting: QuoteStyle,
    last_command: Option<String>,
    loaded_preset: Option<String>,
    should_quit: bool,
}

impl<E: Executor, L: LineSource, W: Write> SessionController<E, L, W> {
    /// Create a controller, loading state from `storage`
    pub fn new(
        storage: Box<dyn SessionStorage>,
        executor: E,
        lines: L,
        renderer: TerminalRenderer<W>,
        quoting: QuoteStyle,
    ) -> Self {
        let state = storage.load();
        tracing::debug!(
            "session: loaded {} history entries, {} presets, {} variables",
            state.history.len(),
            state.presets.len(),
            state.config.vars.len()
        );

        Self {
            state,
            storage,
            executor,
            lines,
            renderer,
            registry: ExCommandRegistry::new(),
            masker: SecretMasker::default(),
            quoting,
            last_command: None,
            loaded_preset: None,
            should_quit: false,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn last_command(&self) -> Option<&str> {
        self.last_command.as_deref()
    }

    pub fn loaded_preset(&self) -> Option<&str> {
        self.loaded_preset.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn lines(&self) -> &L {
        &self.lines
    }

    /// Run until quit, end of input or Ctrl-C at the prompt
    pub async fn run(&mut self) -> Result<()> {
        self.renderer.render_banner()?;

        while !self.should_quit {
            match self.lines.read_line(PROMPT).await? {
                Some(line) => self.handle_line(&line).await?,
                None => {
                    tracing::debug!("session: input closed");
                    self.quit()?;
                }
            }
        }

        Ok(())
    }

    /// Handle one line of prompt input
    ///
    /// Input errors are rendered and leave state untouched; only rendering
    /// failures are returned.
    pub async fn handle_line(&mut self, line: &str) -> Result<()> {
        // An armed preset only survives until the next line
        if let Some(preset) = self.loaded_preset.take() {
            if line.trim().eq_ignore_ascii_case(EXECUTE_LOADED) {
                self.execute(&preset).await?;
                self.last_command = Some(preset);
                return Ok(());
            }
            tracing::debug!("session: loaded preset discarded");
        }

        let input = match InputLine::parse(line) {
            Ok(input) => input,
            Err(e) => return self.report(e),
        };

        match input {
            InputLine::RepeatLast => match self.last_command.clone() {
                Some(command) => self.execute(&command).await,
                None => self.report(SessionError::NoLastCommand),
            },
            InputLine::HistoryRecall(id) => {
                let Some(entry) = self.state.history.get(id) else {
                    let len = self.state.history.len();
                    return self.report(SessionError::HistoryIndexOutOfRange { id, len });
                };
                let Some(selected) = entry.replay_input().map(str::to_string) else {
                    return self.report(SessionError::RedactedHistoryEntry { id });
                };
                self.execute(&selected).await?;
                self.last_command = Some(selected);
                Ok(())
            }
            InputLine::Command(command) => match self.registry.execute_command(&command) {
                Ok(event) => self.apply_event(event).await,
                Err(e) => self.report(e),
            },
            InputLine::Url(command) | InputLine::Request(command) => {
                self.execute(&command).await?;
                self.last_command = Some(command);
                Ok(())
            }
        }
    }

    async fn apply_event(&mut self, event: CommandEvent) -> Result<()> {
        match event {
            CommandEvent::QuitRequested => self.quit(),
            CommandEvent::HelpRequested => self.renderer.render_help(),
            CommandEvent::ShowHistoryRequested => self
                .renderer
                .render_history(&self.state.history, &self.masker),
            CommandEvent::ShowPresetsRequested => self
                .renderer
                .render_presets(&self.state.presets, &self.masker),
            CommandEvent::ShowDefaultsRequested => {
                self.renderer.render_defaults(&self.state.config.defaults)
            }
            CommandEvent::ShowVariablesRequested => {
                self.renderer.render_variables(&self.state.config.vars)
            }
            CommandEvent::PasteModeRequested => self.paste().await,
            CommandEvent::SavePresetRequested { name } => {
                let Some(command) = self.last_command.clone() else {
                    return self.report(SessionError::NothingToSave);
                };
                self.state.presets.insert(name.clone(), command);
                if let Err(e) = self.storage.save_presets(&self.state.presets) {
                    return self.report_store_error(e);
                }
                self.renderer.render_success(&format!("Saved preset {name}."))
            }
            CommandEvent::LoadPresetRequested { name } => {
                let Some(command) = self.state.presets.get(&name).cloned() else {
                    return self.report(SessionError::PresetNotFound(name));
                };
                let masked = self.masker.mask(&command);
                self.loaded_preset = Some(command);
                self.renderer.render_loaded_preset(&name, &masked)
            }
            CommandEvent::DefaultHeaderChangeRequested { header, value } => {
                self.state.config.defaults.set(header, value);
                self.persist_config(&format!("{header} default updated."))
            }
            CommandEvent::SetVariableRequested { key, value } => {
                let message = format!("Set {key} = {value}");
                self.state.config.vars.insert(key, value);
                self.persist_config(&message)
            }
            CommandEvent::UnsetVariableRequested { key } => {
                if self.state.config.vars.remove(&key).is_none() {
                    return self.report(SessionError::UnknownVariable(key));
                }
                self.persist_config(&format!("Unset {key}"))
            }
        }
    }

    /// Collect pasted lines until the terminator and run them as one command
    async fn paste(&mut self) -> Result<()> {
        self.renderer.render_paste_intro()?;

        let mut pasted = Vec::new();
        while let Some(line) = self.lines.read_line(PASTE_PROMPT).await? {
            if is_paste_terminator(&line) {
                break;
            }
            pasted.push(line);
        }

        let command = collapse_pasted_lines(&pasted);
        if command.is_empty() {
            return self.renderer.render_warning("Nothing pasted.");
        }

        tracing::debug!("session: pasted {} lines", pasted.len());
        self.execute(&command).await?;
        self.last_command = Some(command);
        Ok(())
    }

    /// Run `input` through the full pipeline, render it and record it in history
    async fn execute(&mut self, input: &str) -> Result<()> {
        let prepared = prepare_request(input, &self.state.config, self.quoting);
        tracing::info!("executing: {}", self.masker.mask(&prepared.command));

        let executed_at = now_timestamp();
        let output = match self.executor.execute(&prepared.executable).await {
            Ok(output) => output,
            Err(e) => {
                tracing::error!("executor failed: {:#}", e);
                ExecutionOutput {
                    exit_code: -1,
                    stderr: format!("{e:#}"),
                    ..Default::default()
                }
            }
        };
        if output.interrupted {
            tracing::warn!("request interrupted");
        }

        let decoded = decode_response(&output.stdout, prepared.markers);
        let record = ResponseRecord::new(
            &prepared.command,
            executed_at,
            &output,
            &decoded,
            &self.masker,
        );
        self.renderer.render_record(&record)?;

        self.state.history.push(HistoryEntry::masked(
            input,
            &record.command,
            record.status_code,
            &self.masker,
        ));
        if let Err(e) = self.storage.save_history(&self.state.history) {
            self.report_store_error(e)?;
        }
        Ok(())
    }

    fn persist_config(&mut self, message: &str) -> Result<()> {
        if let Err(e) = self.storage.save_config(&self.state.config) {
            return self.report_store_error(e);
        }
        self.renderer.render_success(message)
    }

    fn quit(&mut self) -> Result<()> {
        self.should_quit = true;
        if let Err(e) = self.storage.save_config(&self.state.config) {
            self.report_store_error(e)?;
        }
        self.renderer.render_plain("Bye!")
    }

    fn report(&mut self, error: SessionError) -> Result<()> {
        tracing::debug!("session: input error: {}", error);
        match error {
            SessionError::NoLastCommand
            | SessionError::NothingToSave
            | SessionError::UnknownCommand(_) => self.renderer.render_warning(&error.to_string()),
            _ => self.renderer.render_error(&error.to_string()),
        }
    }

    fn report_store_error(&mut self, error: StoreError) -> Result<()> {
        tracing::error!("{}", error);
        self.renderer.render_error(&error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repl::io::MockLineSource;
    use crate::repl::models::{DefaultHeaders, History, Presets, SessionConfig};
    use crate::repl::testing::{MockExecutor, MockWriter};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// In-memory storage that records what was saved
    #[derive(Clone, Default)]
    struct MemoryStorage {
        initial: SessionState,
        saved: Rc<RefCell<SessionState>>,
    }

    impl SessionStorage for MemoryStorage {
        fn load(&self) -> SessionState {
            self.initial.clone()
        }

        fn save_config(&self, config: &SessionConfig) -> Result<(), StoreError> {
            self.saved.borrow_mut().config = config.clone();
            Ok(())
        }

        fn save_history(&self, history: &History) -> Result<(), StoreError> {
            self.saved.borrow_mut().history = history.clone();
            Ok(())
        }

        fn save_presets(&self, presets: &Presets) -> Result<(), StoreError> {
            self.saved.borrow_mut().presets = presets.clone();
            Ok(())
        }
    }

    type TestController = SessionController<MockExecutor, MockLineSource, MockWriter>;

    fn controller(storage: MemoryStorage, lines: &[&str]) -> (TestController, MockWriter) {
        let writer = MockWriter::new();
        let controller = SessionController::new(
            Box::new(storage),
            MockExecutor::new(),
            MockLineSource::new(lines.iter().copied()),
            TerminalRenderer::new(writer.clone(), false),
            QuoteStyle::Native,
        );
        (controller, writer)
    }

    #[tokio::test]
    async fn request_should_execute_with_trailer_and_record_history() {
        let storage = MemoryStorage::default();
        let (mut controller, _) = controller(storage.clone(), &[]);

        controller.handle_line("https://x.io/a").await.unwrap();

        let commands = controller.executor().commands();
        assert_eq!(commands.len(), 1);
        assert!(commands[0].starts_with(r#"curl -s "https://x.io/a""#));
        assert!(commands[0].contains("__CURL_CODE__"));
        assert_eq!(controller.last_command(), Some(r#"curl -s "https://x.io/a""#));
        assert_eq!(storage.saved.borrow().history.len(), 1);
        assert_eq!(
            storage.saved.borrow().history.get(1).and_then(|e| e.status),
            Some(200)
        );
    }

    #[tokio::test]
    async fn empty_line_without_last_command_should_warn() {
        let (mut controller, writer) = controller(MemoryStorage::default(), &[]);

        controller.handle_line("").await.unwrap();

        assert!(controller.executor().commands().is_empty());
        assert!(writer.get_output().contains("No last command."));
    }

    #[tokio::test]
    async fn set_variable_should_persist_config() {
        let storage = MemoryStorage::default();
        let (mut controller, writer) = controller(storage.clone(), &[]);

        controller.handle_line(":set user 42").await.unwrap();

        assert_eq!(
            storage.saved.borrow().config.vars.get("user").map(String::as_str),
            Some("42")
        );
        assert!(writer.get_output().contains("Set user = 42"));
    }

    #[tokio::test]
    async fn unset_unknown_variable_should_report_error() {
        let (mut controller, writer) = controller(MemoryStorage::default(), &[]);

        controller.handle_line(":unset nope").await.unwrap();

        assert!(writer.get_output().contains("Variable 'nope' is not set."));
    }

    #[tokio::test]
    async fn token_command_should_update_defaults() {
        let storage = MemoryStorage::default();
        let (mut controller, _) = controller(storage.clone(), &[]);

        controller.handle_line(":token Bearer xyz").await.unwrap();

        assert_eq!(
            storage.saved.borrow().config.defaults,
            DefaultHeaders {
                authorization: "Bearer xyz".to_string(),
                ..Default::default()
            }
        );
    }

    #[tokio::test]
    async fn run_should_quit_and_save_config_at_end_of_input() {
        let storage = MemoryStorage::default();
        let (mut controller, writer) = controller(storage.clone(), &[":set a 1"]);

        controller.run().await.unwrap();

        assert!(controller.should_quit());
        assert!(writer.get_output().ends_with("Bye!\n"));
        assert!(storage.saved.borrow().config.vars.contains_key("a"));
    }
}
