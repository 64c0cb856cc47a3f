use std::process::{Command, Stdio};

use colored::Colorize;
use inquire::InquireError;
use log::{debug, warn};

use super::{ListenError, VoiceIo};

/// Voice over the terminal.
///
/// Everything spoken is printed, and also piped to an external speech
/// synthesizer when one is configured (for example `["espeak", "-s", "150"]`;
/// the text is appended as the last argument). Answers are typed.
#[derive(Debug, Clone, Default)]
pub struct TerminalVoice {
    tts_command: Option<Vec<String>>,
}

impl TerminalVoice {
    pub fn new(tts_command: Option<Vec<String>>) -> Self {
        Self {
            tts_command: tts_command.filter(|cmd| !cmd.is_empty()),
        }
    }

    fn synthesize(&self, text: &str) {
        let Some((program, args)) = self.tts_command.as_ref().and_then(|c| c.split_first()) else {
            return;
        };
        debug!("Speaking via {program}");
        let status = Command::new(program)
            .args(args)
            .arg(text)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        match status {
            Ok(status) if status.success() => {}
            Ok(status) => warn!("Speech command {program} exited with {status}"),
            Err(e) => warn!("Failed to run speech command {program}: {e}"),
        }
    }
}

impl VoiceIo for TerminalVoice {
    fn speak(&mut self, text: &str) {
        println!("{}", text.cyan());
        self.synthesize(text);
    }

    fn display(&mut self, text: &str) {
        println!("{}", text.bold());
    }

    fn listen(&mut self) -> Result<String, ListenError> {
        match inquire::Text::new(">").prompt() {
            Ok(answer) if answer.trim().is_empty() => {
                println!("{}", "Could not understand audio.".yellow());
                Err(ListenError::Unrecognized)
            }
            Ok(answer) => Ok(answer),
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                Err(ListenError::ServiceUnavailable("input cancelled".to_string()))
            }
            Err(e) => {
                println!("{}", "Speech service is unavailable.".red());
                Err(ListenError::ServiceUnavailable(e.to_string()))
            }
        }
    }
}
