//! Study assistant over a resolved report
//!
//! Summaries, quizzes and follow-up chat are plain prompt/response calls to
//! a [`ChatModel`]. All conversation state lives in [`StudySession`], which
//! the caller owns.

mod openai;
mod prompts;
mod session;

pub use openai::{OpenAiChat, DEFAULT_MODEL, OPENAI_API_URL};
pub use prompts::{chat_system_prompt, quiz_prompt, summary_prompt};
pub use session::StudySession;

use crate::error::ChatError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Persona the model answers as
pub const DEFAULT_PERSONA: &str = "물관리 전문 K-water연구원";

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Output language for generated text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Korean,
    English,
}

impl Language {
    /// Name used inside prompts
    pub fn label(&self) -> &'static str {
        match self {
            Language::Korean => "한국어",
            Language::English => "영어",
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ko" | "korean" | "한국어" => Ok(Language::Korean),
            "en" | "english" | "영어" => Ok(Language::English),
            _ => Err(format!("Unknown language: {}", s)),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Generation settings shared by summary, quiz and chat prompts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudySettings {
    pub persona: String,
    pub language: Language,
    max_bullets: usize,
    question_count: usize,
}

impl Default for StudySettings {
    fn default() -> Self {
        Self {
            persona: DEFAULT_PERSONA.to_string(),
            language: Language::default(),
            max_bullets: 5,
            question_count: 5,
        }
    }
}

impl StudySettings {
    pub const BULLET_RANGE: (usize, usize) = (3, 10);
    pub const QUESTION_RANGE: (usize, usize) = (3, 8);

    /// Set the persona
    pub fn persona(mut self, persona: impl Into<String>) -> Self {
        self.persona = persona.into();
        self
    }

    /// Set the output language
    pub fn language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Number of summary bullet points, clamped to 3..=10
    pub fn max_bullets(mut self, n: usize) -> Self {
        self.max_bullets = n.clamp(Self::BULLET_RANGE.0, Self::BULLET_RANGE.1);
        self
    }

    /// Number of quiz questions, clamped to 3..=8
    pub fn question_count(mut self, n: usize) -> Self {
        self.question_count = n.clamp(Self::QUESTION_RANGE.0, Self::QUESTION_RANGE.1);
        self
    }

    pub fn bullets(&self) -> usize {
        self.max_bullets
    }

    pub fn questions(&self) -> usize {
        self.question_count
    }
}

/// A chat-completion backend: messages in, reply text out
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, messages: &[Message]) -> Result<String, ChatError>;
}

#[async_trait]
impl<T: ChatModel + ?Sized> ChatModel for Arc<T> {
    async fn complete(&self, messages: &[Message]) -> Result<String, ChatError> {
        (**self).complete(messages).await
    }
}
