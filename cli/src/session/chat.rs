//! Support chat commands
//!
//! The chat talks to its own origin, separate from the API server, and is
//! reachable from any screen once signed in. Agent presence is simulated
//! client-side on a fixed rotation, the same way the browser widget fakes
//! it.

use std::time::Instant;

use colored::*;
use moneta_link::{AgentPresence, ChatClient, ChatMessage, ChatSender};

use crate::error::{CliError, Result};

use super::CliSession;

impl CliSession {
    /// Open the chat screen: connect, show presence, render the transcript
    pub(super) async fn open_chat(&mut self) -> Result<()> {
        self.ensure_chat()?;
        self.print_presence();
        self.render_transcript().await?;
        println!("{}", "Talk to us with: say <message>".dimmed());
        Ok(())
    }

    /// Send a message to support
    pub(super) async fn chat_send(&mut self, body: &str) -> Result<()> {
        self.require_signed_in()?;
        self.ensure_chat()?;

        let pb = self.spinner("Sending...");
        let result = self.chat_ref()?.send(body).await;
        if let Some(pb) = pb {
            pb.finish_and_clear();
        }
        let message = result?;

        self.print_chat_message(&message);
        self.last_seen_chat_id = Some(message.id);
        if self.presence_now() == AgentPresence::Away {
            println!(
                "{}",
                "Support is away right now; run history later for the reply".dimmed()
            );
        }
        Ok(())
    }

    /// Show the conversation tail
    pub(super) async fn chat_history(&mut self) -> Result<()> {
        self.require_signed_in()?;
        self.ensure_chat()?;
        self.render_transcript().await
    }

    /// Show whether an agent is around
    pub(super) fn chat_status(&mut self) -> Result<()> {
        self.require_signed_in()?;
        self.ensure_chat()?;
        self.print_presence();
        Ok(())
    }

    /// Fetch the conversation and render the last panel's worth of rows
    async fn render_transcript(&mut self) -> Result<()> {
        let pb = self.spinner("Loading chat...");
        let result = self.chat_ref()?.history(None).await;
        if let Some(pb) = pb {
            pb.finish_and_clear();
        }
        let messages = result?;

        if messages.is_empty() {
            println!(
                "{}",
                "No messages yet. Say hello with: say <message>".dimmed()
            );
            return Ok(());
        }

        let new_count = match self.last_seen_chat_id {
            Some(last) => messages.iter().filter(|m| m.id > last).count(),
            None => 0,
        };
        if new_count > 0 {
            println!("{}", format!("({} new)", new_count).green());
        }

        let rows = usize::from(self.prefs.chat_panel_rows.max(1));
        let hidden = messages.len().saturating_sub(rows);
        if hidden > 0 {
            println!(
                "{}",
                format!(
                    "({} earlier messages hidden; \\chat-rows <n> shows more)",
                    hidden
                )
                .dimmed()
            );
        }
        for message in &messages[hidden..] {
            self.print_chat_message(message);
        }
        self.last_seen_chat_id = messages.last().map(|m| m.id);
        Ok(())
    }

    /// Connect the chat client on first use, on its own origin when one is
    /// configured
    fn ensure_chat(&mut self) -> Result<()> {
        if self.chat.is_none() {
            let url = self
                .chat_url
                .clone()
                .unwrap_or_else(|| self.session.client().base_url().to_string());
            self.chat = Some(ChatClient::new(url)?);
            self.chat_opened_at = Some(Instant::now());
        }
        Ok(())
    }

    fn chat_ref(&self) -> Result<&ChatClient> {
        self.chat
            .as_ref()
            .ok_or_else(|| CliError::Validation("open the chat screen first".to_string()))
    }

    /// Presence at this point of the simulated rotation
    fn presence_now(&self) -> AgentPresence {
        let elapsed = self
            .chat_opened_at
            .map(|opened| opened.elapsed())
            .unwrap_or_default();
        self.presence.status_at(elapsed)
    }

    fn print_presence(&self) {
        match self.presence_now() {
            AgentPresence::Online => println!("{} Support is online", "●".green()),
            AgentPresence::Away => {
                println!("{} Support is away; replies may take a while", "○".yellow())
            }
        }
    }

    fn print_chat_message(&self, message: &ChatMessage) {
        let who = match message.sender {
            ChatSender::Visitor => format!("{:>7}", "you").cyan(),
            ChatSender::Agent => format!("{:>7}", "support").green(),
        };
        println!("{} {}  {}", message.sent_at.dimmed(), who, message.body);
    }
}
