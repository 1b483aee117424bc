//! Support chat client and the simulated agent-presence ticker.
//!
//! The chat service lives on its own origin, separate from the main API, and
//! identifies visitors by a locally generated id rather than the bearer
//! token. Only the widget-facing surface is covered here; the chat backend
//! itself belongs to a third party.

use crate::{
    error::{LinkError, Result},
    models::ChatMessage,
};
use log::debug;
use serde::Serialize;
use std::time::Duration;

/// Client for the support chat origin.
pub struct ChatClient {
    base_url: String,
    http_client: reqwest::Client,
    visitor_id: String,
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    visitor_id: &'a str,
    body: &'a str,
}

impl ChatClient {
    /// Create a chat client for the given origin.
    ///
    /// The visitor id is generated fresh per client, so chat identity never
    /// outlives the process.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        if base_url.is_empty() {
            return Err(LinkError::Configuration("chat url is required".into()));
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| LinkError::Configuration(e.to_string()))?;

        // Timestamp-based id, unique enough for an ephemeral chat identity.
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let visitor_id = format!("visitor_{}", nanos);

        Ok(Self {
            base_url,
            http_client,
            visitor_id,
        })
    }

    /// The generated visitor id for this client.
    pub fn visitor_id(&self) -> &str {
        &self.visitor_id
    }

    /// Send a message to the support team.
    ///
    /// Returns the stored message as the server echoes it back, id and
    /// timestamp included.
    pub async fn send(&self, body: &str) -> Result<ChatMessage> {
        let url = format!("{}/widget/messages", self.base_url);
        debug!("[CHAT] POST {} visitor={}", url, self.visitor_id);

        let request = SendMessageRequest {
            visitor_id: &self.visitor_id,
            body,
        };
        let response = self.http_client.post(&url).json(&request).send().await?;
        crate::client::MonetaClient::decode(response).await
    }

    /// Fetch this visitor's messages, optionally only those after a known id.
    pub async fn history(&self, after_id: Option<u64>) -> Result<Vec<ChatMessage>> {
        let url = format!("{}/widget/messages", self.base_url);
        debug!("[CHAT] GET {} visitor={} after={:?}", url, self.visitor_id, after_id);

        let mut query = vec![("visitor_id", self.visitor_id.clone())];
        if let Some(after) = after_id {
            query.push(("after", after.to_string()));
        }
        let response = self.http_client.get(&url).query(&query).send().await?;
        crate::client::MonetaClient::decode(response).await
    }
}

/// Simulated agent availability shown in the chat widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentPresence {
    Online,
    Away,
}

impl AgentPresence {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentPresence::Online => "online",
            AgentPresence::Away => "away",
        }
    }
}

/// Fake agent-status ticker for the chat widget.
///
/// The widget shows agents flipping between online and away on a fixed
/// period. That is all it ever was: a timer, not a health check against any
/// backend. Keeping it a pure function of elapsed time makes the flip
/// schedule deterministic and testable.
#[derive(Debug, Clone, Copy)]
pub struct PresenceSim {
    period: Duration,
}

impl PresenceSim {
    /// How long each online/away phase lasts by default.
    pub const DEFAULT_PERIOD: Duration = Duration::from_secs(45);

    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_secs(1)),
        }
    }

    /// Status after `elapsed` time: online for one period, away for the
    /// next, repeating.
    pub fn status_at(&self, elapsed: Duration) -> AgentPresence {
        let phase = (elapsed.as_secs() / self.period.as_secs()) % 2;
        if phase == 0 {
            AgentPresence::Online
        } else {
            AgentPresence::Away
        }
    }
}

impl Default for PresenceSim {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PERIOD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presence_flips_each_period() {
        let sim = PresenceSim::new(Duration::from_secs(30));

        assert_eq!(sim.status_at(Duration::from_secs(0)), AgentPresence::Online);
        assert_eq!(sim.status_at(Duration::from_secs(29)), AgentPresence::Online);
        assert_eq!(sim.status_at(Duration::from_secs(30)), AgentPresence::Away);
        assert_eq!(sim.status_at(Duration::from_secs(59)), AgentPresence::Away);
        assert_eq!(sim.status_at(Duration::from_secs(60)), AgentPresence::Online);
    }

    #[test]
    fn test_presence_zero_period_clamps() {
        // A zero period would divide by zero; it clamps to one second.
        let sim = PresenceSim::new(Duration::from_secs(0));
        assert_eq!(sim.status_at(Duration::from_secs(0)), AgentPresence::Online);
        assert_eq!(sim.status_at(Duration::from_secs(1)), AgentPresence::Away);
    }

    #[test]
    fn test_visitor_id_is_generated() {
        let client = ChatClient::new("http://chat.example.com/").unwrap();
        assert!(client.visitor_id().starts_with("visitor_"));
        assert_eq!(client.base_url, "http://chat.example.com");
    }

    #[test]
    fn test_empty_chat_url_rejected() {
        assert!(ChatClient::new("").is_err());
        assert!(ChatClient::new("///").is_err());
    }
}
