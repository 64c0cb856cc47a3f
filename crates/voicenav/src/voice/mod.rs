//! Spoken prompts and answers.
//!
//! The session only talks to [`VoiceIo`]. Recognition failures come back as
//! [`ListenError`]; [`ask`] turns them into a bounded re-prompt loop.

pub mod terminal;

use log::{info, warn};
use thiserror::Error;

pub use terminal::TerminalVoice;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListenError {
    /// Speech was captured but could not be understood. Safe to ask again.
    #[error("Could not understand audio")]
    Unrecognized,
    /// The recognizer itself is unavailable.
    #[error("Speech service is unavailable: {0}")]
    ServiceUnavailable(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PromptError {
    #[error("Speech service is unavailable: {0}")]
    Unavailable(String),
    #[error("No answer understood after {0} attempts")]
    AttemptsExhausted(u32),
}

/// Blocking speech output and input.
pub trait VoiceIo {
    /// Say `text`, returning once it has been delivered.
    fn speak(&mut self, text: &str);

    /// Wait for one answer from the user.
    fn listen(&mut self) -> Result<String, ListenError>;

    /// Show `text` without speaking it.
    fn display(&mut self, text: &str) {
        println!("{text}");
    }
}

/// Speak `question` and wait for an answer, asking again on unrecognized speech.
///
/// At most `max_attempts` questions are asked (at least one). Answers are
/// trimmed and title-cased.
pub fn ask<V: VoiceIo + ?Sized>(
    voice: &mut V,
    question: &str,
    max_attempts: u32,
) -> Result<String, PromptError> {
    let attempts = max_attempts.max(1);
    for attempt in 1..=attempts {
        voice.speak(question);
        match voice.listen() {
            Ok(text) => {
                let answer = title_case(&text);
                info!("Heard {answer:?} for {question:?}");
                return Ok(answer);
            }
            Err(ListenError::Unrecognized) => {
                warn!("Unrecognized answer to {question:?} (attempt {attempt}/{attempts})");
            }
            Err(ListenError::ServiceUnavailable(reason)) => {
                warn!("Speech service unavailable: {reason}");
                return Err(PromptError::Unavailable(reason));
            }
        }
    }
    Err(PromptError::AttemptsExhausted(attempts))
}

/// Capitalize the first letter of each word and lowercase the rest.
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether an answer contains `word`, ignoring case.
pub fn mentions(answer: &str, word: &str) -> bool {
    answer.to_lowercase().contains(&word.to_lowercase())
}
