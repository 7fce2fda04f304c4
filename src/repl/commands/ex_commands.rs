//! # Ex Commands Module
//!
//! `:` commands implemented with the command pattern. Each handler claims a
//! command string and turns it into a [`CommandEvent`] for the controller;
//! malformed arguments come back as [`SessionError`]s.

use crate::repl::commands::CommandEvent;
use crate::repl::errors::SessionError;
use crate::repl::models::DefaultHeader;

/// Trait for ex commands
pub trait ExCommand: Send {
    /// Check if this command can handle the given ex command string
    fn can_handle(&self, command: &str) -> bool;

    /// Parse arguments and produce the event
    fn execute(&self, command: &str) -> Result<CommandEvent, SessionError>;

    /// Get command name for debugging
    fn name(&self) -> &'static str;
}

/// Split `word rest` into the rest when `command` starts with `word`
fn arguments<'a>(command: &'a str, word: &str) -> Option<&'a str> {
    match command.strip_prefix(word) {
        Some("") => Some(""),
        Some(rest) if rest.starts_with(char::is_whitespace) => Some(rest.trim()),
        _ => None,
    }
}

/// Commands without arguments that map straight to one event
pub struct SimpleCommand {
    names: &'static [&'static str],
    event: CommandEvent,
    name: &'static str,
}

impl ExCommand for SimpleCommand {
    fn can_handle(&self, command: &str) -> bool {
        self.names.contains(&command)
    }

    fn execute(&self, _command: &str) -> Result<CommandEvent, SessionError> {
        Ok(self.event.clone())
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

/// Preset command handler (for :save NAME and :load NAME)
pub struct PresetCommand {
    word: &'static str,
}

impl ExCommand for PresetCommand {
    fn can_handle(&self, command: &str) -> bool {
        arguments(command, self.word).is_some()
    }

    fn execute(&self, command: &str) -> Result<CommandEvent, SessionError> {
        let name = arguments(command, self.word).unwrap_or_default();
        if name.is_empty() {
            return Err(SessionError::MissingPresetName { command: self.word });
        }
        let name = name.to_string();
        Ok(match self.word {
            "save" => CommandEvent::SavePresetRequested { name },
            _ => CommandEvent::LoadPresetRequested { name },
        })
    }

    fn name(&self) -> &'static str {
        "PresetCommand"
    }
}

/// Default header command handler (for :token, :accept and :ctype)
pub struct DefaultHeaderCommand {
    word: &'static str,
    header: DefaultHeader,
    allow_empty: bool,
}

impl ExCommand for DefaultHeaderCommand {
    fn can_handle(&self, command: &str) -> bool {
        arguments(command, self.word).is_some()
    }

    fn execute(&self, command: &str) -> Result<CommandEvent, SessionError> {
        let value = arguments(command, self.word).unwrap_or_default();
        if value.is_empty() && !self.allow_empty {
            return Err(SessionError::MissingValue { command: self.word });
        }
        Ok(CommandEvent::DefaultHeaderChangeRequested {
            header: self.header,
            value: value.to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "DefaultHeaderCommand"
    }
}

/// Set variable command handler (for :set KEY VALUE)
pub struct SetVariableCommand;

impl ExCommand for SetVariableCommand {
    fn can_handle(&self, command: &str) -> bool {
        arguments(command, "set").is_some()
    }

    fn execute(&self, command: &str) -> Result<CommandEvent, SessionError> {
        let args = arguments(command, "set").unwrap_or_default();
        let (key, value) = args
            .split_once(char::is_whitespace)
            .ok_or(SessionError::SetUsage)?;
        let value = value.trim();
        if !is_variable_name(key) || value.is_empty() {
            return Err(SessionError::SetUsage);
        }
        Ok(CommandEvent::SetVariableRequested {
            key: key.to_string(),
            value: value.to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "SetVariableCommand"
    }
}

/// Unset variable command handler (for :unset KEY)
pub struct UnsetVariableCommand;

impl ExCommand for UnsetVariableCommand {
    fn can_handle(&self, command: &str) -> bool {
        arguments(command, "unset").is_some()
    }

    fn execute(&self, command: &str) -> Result<CommandEvent, SessionError> {
        let key = arguments(command, "unset").unwrap_or_default();
        if !is_variable_name(key) {
            return Err(SessionError::UnsetUsage);
        }
        Ok(CommandEvent::UnsetVariableRequested {
            key: key.to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "UnsetVariableCommand"
    }
}

/// Names usable inside `{{...}}` placeholders
fn is_variable_name(key: &str) -> bool {
    !key.is_empty() && key.chars().all(|c| c.is_alphanumeric() || c == '_')
}

fn simple(
    names: &'static [&'static str],
    event: CommandEvent,
    name: &'static str,
) -> Box<dyn ExCommand + Send> {
    Box::new(SimpleCommand { names, event, name })
}

/// Type alias to reduce complexity for ex command collection
type ExCommandCollection = Vec<Box<dyn ExCommand + Send>>;

/// Registry for managing ex commands
pub struct ExCommandRegistry {
    commands: ExCommandCollection,
}

impl ExCommandRegistry {
    /// Create a new ex command registry with all default commands
    pub fn new() -> Self {
        let commands: ExCommandCollection = vec![
            simple(&["quit", "q"], CommandEvent::QuitRequested, "QuitCommand"),
            simple(&["help"], CommandEvent::HelpRequested, "HelpCommand"),
            simple(&["history"], CommandEvent::ShowHistoryRequested, "HistoryCommand"),
            simple(&["presets"], CommandEvent::ShowPresetsRequested, "PresetsCommand"),
            simple(&["headers"], CommandEvent::ShowDefaultsRequested, "HeadersCommand"),
            simple(&["vars"], CommandEvent::ShowVariablesRequested, "VarsCommand"),
            simple(&["paste"], CommandEvent::PasteModeRequested, "PasteCommand"),
            Box::new(PresetCommand { word: "save" }),
            Box::new(PresetCommand { word: "load" }),
            Box::new(DefaultHeaderCommand {
                word: "token",
                header: DefaultHeader::Authorization,
                allow_empty: false,
            }),
            Box::new(DefaultHeaderCommand {
                word: "accept",
                header: DefaultHeader::Accept,
                allow_empty: false,
            }),
            Box::new(DefaultHeaderCommand {
                word: "ctype",
                header: DefaultHeader::ContentType,
                allow_empty: true,
            }),
            Box::new(SetVariableCommand),
            Box::new(UnsetVariableCommand),
        ];

        Self { commands }
    }

    /// Parse and execute an ex command string (without the leading sigil)
    pub fn execute_command(&self, command_str: &str) -> Result<CommandEvent, SessionError> {
        let trimmed = command_str.trim();
        // Arguments may carry credentials, so only the command word is logged
        let word = trimmed.split_whitespace().next().unwrap_or_default();

        for command in &self.commands {
            if command.can_handle(trimmed) {
                tracing::debug!("Ex command '{}' handled by {}", word, command.name());
                return command.execute(trimmed);
            }
        }

        tracing::warn!("Unknown ex command: {}", word);
        Err(SessionError::UnknownCommand(trimmed.to_string()))
    }
}

impl Default for ExCommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(command: &str) -> Result<CommandEvent, SessionError> {
        ExCommandRegistry::new().execute_command(command)
    }

    #[test]
    fn quit_command_should_handle_both_spellings() {
        assert_eq!(run("q"), Ok(CommandEvent::QuitRequested));
        assert_eq!(run("quit"), Ok(CommandEvent::QuitRequested));
        assert!(run("quitter").is_err());
    }

    #[test]
    fn save_command_should_require_name() {
        assert_eq!(
            run("save users"),
            Ok(CommandEvent::SavePresetRequested {
                name: "users".to_string()
            })
        );
        assert_eq!(
            run("save"),
            Err(SessionError::MissingPresetName { command: "save" })
        );
    }

    #[test]
    fn load_command_should_keep_spaces_inside_name() {
        assert_eq!(
            run("load my preset"),
            Ok(CommandEvent::LoadPresetRequested {
                name: "my preset".to_string()
            })
        );
    }

    #[test]
    fn token_command_should_keep_full_value() {
        assert_eq!(
            run("token Bearer abc def"),
            Ok(CommandEvent::DefaultHeaderChangeRequested {
                header: DefaultHeader::Authorization,
                value: "Bearer abc def".to_string()
            })
        );
        assert_eq!(run("token"), Err(SessionError::MissingValue { command: "token" }));
    }

    #[test]
    fn ctype_command_should_allow_clearing() {
        assert_eq!(
            run("ctype"),
            Ok(CommandEvent::DefaultHeaderChangeRequested {
                header: DefaultHeader::ContentType,
                value: String::new()
            })
        );
    }

    #[test]
    fn set_command_should_split_key_and_value() {
        assert_eq!(
            run("set user 42 and more"),
            Ok(CommandEvent::SetVariableRequested {
                key: "user".to_string(),
                value: "42 and more".to_string()
            })
        );
    }

    #[test]
    fn set_command_should_reject_malformed_arguments() {
        assert_eq!(run("set"), Err(SessionError::SetUsage));
        assert_eq!(run("set user"), Err(SessionError::SetUsage));
        assert_eq!(run("set bad-key 1"), Err(SessionError::SetUsage));
    }

    #[test]
    fn unset_command_should_require_key() {
        assert_eq!(
            run("unset user"),
            Ok(CommandEvent::UnsetVariableRequested {
                key: "user".to_string()
            })
        );
        assert_eq!(run("unset"), Err(SessionError::UnsetUsage));
    }

    #[test]
    fn registry_should_reject_unknown_commands() {
        assert_eq!(
            run("frobnicate"),
            Err(SessionError::UnknownCommand("frobnicate".to_string()))
        );
        assert_eq!(run(""), Err(SessionError::UnknownCommand(String::new())));
    }

    #[test]
    fn settings_words_should_not_match_longer_words() {
        assert!(SetVariableCommand.can_handle("set a b"));
        assert!(!SetVariableCommand.can_handle("settings"));
    }
}
