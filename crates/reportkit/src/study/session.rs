//! Per-user study session state

use super::prompts::{chat_system_prompt, quiz_prompt, summary_prompt};
use super::{ChatModel, Message, StudySettings};
use crate::error::{ChatError, ResolveError};
use crate::fetchers::Fetcher;
use crate::resolver::SourceResolver;
use crate::search::SearchProvider;
use crate::types::ResolvedSource;

/// Everything a user has loaded and generated so far
///
/// The resolver stays stateless; callers keep one session per user and pass
/// it into each operation.
#[derive(Debug, Clone, Default)]
pub struct StudySession {
    source: Option<ResolvedSource>,
    document_links: Vec<String>,
    candidates: Vec<String>,
    summary: Option<String>,
    quiz: Option<String>,
    history: Vec<Message>,
}

impl StudySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a report from a portal URL and make it the current source
    ///
    /// Listing candidates are recorded before resolution and kept on
    /// failure, so the caller can offer them for manual selection.
    pub async fn load<F, S>(
        &mut self,
        resolver: &SourceResolver<F, S>,
        url: &str,
        fallback_query: &str,
    ) -> Result<&ResolvedSource, ResolveError>
    where
        F: Fetcher,
        S: SearchProvider,
    {
        self.candidates = resolver.listing_candidates(url).await;
        let source = resolver
            .resolve_with_candidates(url, &self.candidates, fallback_query)
            .await?;
        Ok(self.apply(resolver, source).await)
    }

    /// Load one of the recorded listing candidates (or any specific report URL)
    pub async fn load_selected<F, S>(
        &mut self,
        resolver: &SourceResolver<F, S>,
        url: &str,
        fallback_query: &str,
    ) -> Result<&ResolvedSource, ResolveError>
    where
        F: Fetcher,
        S: SearchProvider,
    {
        let source = resolver.resolve_selected(url, fallback_query).await?;
        Ok(self.apply(resolver, source).await)
    }

    async fn apply<F, S>(
        &mut self,
        resolver: &SourceResolver<F, S>,
        source: ResolvedSource,
    ) -> &ResolvedSource
    where
        F: Fetcher,
        S: SearchProvider,
    {
        self.document_links = resolver.document_links(&source.url).await;
        self.summary = None;
        self.quiz = None;
        self.history.clear();
        self.source.insert(source)
    }

    /// Summarize the current report
    pub async fn summarize<M>(&mut self, model: &M, settings: &StudySettings) -> Result<&str, ChatError>
    where
        M: ChatModel + ?Sized,
    {
        let messages = summary_prompt(self.report_text()?, settings);
        let summary = model.complete(&messages).await?;
        Ok(self.summary.insert(summary).as_str())
    }

    /// Generate a quiz for the current report; resets the chat history
    pub async fn quiz<M>(&mut self, model: &M, settings: &StudySettings) -> Result<&str, ChatError>
    where
        M: ChatModel + ?Sized,
    {
        let messages = quiz_prompt(self.report_text()?, settings);
        let quiz = model.complete(&messages).await?;
        self.history.clear();
        Ok(self.quiz.insert(quiz).as_str())
    }

    /// Ask a follow-up question about the current report
    ///
    /// The question and reply are appended to the history only when the
    /// model answers.
    pub async fn ask<M>(
        &mut self,
        model: &M,
        settings: &StudySettings,
        question: &str,
    ) -> Result<&str, ChatError>
    where
        M: ChatModel + ?Sized,
    {
        let mut messages = Vec::with_capacity(self.history.len() + 2);
        messages.push(chat_system_prompt(settings, self.report_text()?));
        messages.extend(self.history.iter().cloned());
        messages.push(Message::user(question));

        let reply = model.complete(&messages).await?;

        self.history.push(Message::user(question));
        self.history.push(Message::assistant(reply));
        Ok(self.history[self.history.len() - 1].content.as_str())
    }

    fn report_text(&self) -> Result<&str, ChatError> {
        self.source
            .as_ref()
            .map(|source| source.text.as_str())
            .ok_or(ChatError::NoReport)
    }

    pub fn source(&self) -> Option<&ResolvedSource> {
        self.source.as_ref()
    }

    pub fn document_links(&self) -> &[String] {
        &self.document_links
    }

    /// Report-detail links from the last listing page loaded
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn quiz_text(&self) -> Option<&str> {
        self.quiz.as_deref()
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }
}
