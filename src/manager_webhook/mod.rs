pub mod errors;

use std::time::Duration;
use log::{error, info};
use ureq::Agent;
use crate::manager_webhook::errors::WebhookError;
use crate::models::discord::{Embed, WebhookMessage};

/// Posts messages to a chat webhook, e.g. a Discord channel webhook
pub struct Webhook {
    agent: Agent,
    url: String,
    username: String,
}

impl Webhook {
    /// Returns a new instance of the Webhook struct
    ///
    /// # Arguments
    ///
    /// * 'url' - the webhook url
    /// * 'username' - name the messages are posted as
    pub fn new(url: &str, username: &str) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(30)))
            .build();

        let agent = config.into();

        Self { agent, url: url.to_string(), username: username.to_string() }
    }

    /// Sends a message with an optional embed.
    /// A failed delivery is logged and otherwise ignored.
    ///
    /// # Arguments
    ///
    /// * 'content' - message text
    /// * 'embed' - optional embed shown below the text
    pub fn send(&self, content: String, embed: Option<Embed>) {
        match self.post_message(self.build_message(content, embed)) {
            Ok(()) => info!("message delivered to webhook"),
            Err(e) => error!("message not delivered: {}", e),
        }
    }

    fn build_message(&self, content: String, embed: Option<Embed>) -> WebhookMessage {
        WebhookMessage {
            content,
            username: self.username.clone(),
            embeds: embed.map(|e| vec![e]),
        }
    }

    fn post_message(&self, message: WebhookMessage) -> Result<(), WebhookError> {
        let json = serde_json::to_string(&message)?;

        let _ = self.agent
            .post(self.url.as_str())
            .content_type("application/json")
            .send(json)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_message_wraps_embed() {
        let webhook = Webhook::new("http://localhost/webhook", "myair");
        let embed = Embed { title: "t".to_string(), description: "d".to_string(), color: 1 };

        let message = webhook.build_message("summary".to_string(), Some(embed.clone()));

        assert_eq!(message.username, "myair");
        assert_eq!(message.content, "summary");
        assert_eq!(message.embeds, Some(vec![embed]));
    }
}
