use serde::{Serialize};
use crate::manager_webhook::errors::WebhookError;
use crate::weather::HealthIndex;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
}

#[derive(Serialize, Debug)]
pub struct WebhookMessage {
    pub content: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embeds: Option<Vec<Embed>>,
}

impl Embed {
    /// Returns an embed with the color given as a `#RRGGBB` string
    ///
    /// # Arguments
    ///
    /// * 'title' - embed title
    /// * 'description' - embed text
    /// * 'color' - hex color, e.g. "#6BC926"
    pub fn new(title: String, description: String, color: &str) -> Result<Embed, WebhookError> {
        Ok(Embed { title, description, color: parse_hex_color(color)? })
    }

    /// Builds an embed presenting a health index
    ///
    /// # Arguments
    ///
    /// * 'index' - the index to present
    pub fn from_index(index: &HealthIndex) -> Result<Embed, WebhookError> {
        let title = match index.value {
            Some(v) => format!("{} {:.0} ({})", index.name, v, index.level),
            None => format!("{} ({})", index.name, index.level),
        };

        Embed::new(title, index.description.clone(), &index.color)
    }
}

/// Parses a `#RRGGBB` color into its integer value
fn parse_hex_color(color: &str) -> Result<u32, WebhookError> {
    let hex = color.trim().strip_prefix('#')
        .ok_or(WebhookError::InvalidColor(color.to_string()))?;

    if hex.len() != 6 {
        return Err(WebhookError::InvalidColor(color.to_string()));
    }

    u32::from_str_radix(hex, 16).map_err(|_| WebhookError::InvalidColor(color.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#6BC926").unwrap(), 0x6BC926);
        assert_eq!(parse_hex_color("#ffffff").unwrap(), 16777215);
        assert!(parse_hex_color("6BC926").is_err());
        assert!(parse_hex_color("#6BC9").is_err());
        assert!(parse_hex_color("#GGGGGG").is_err());
    }

    #[test]
    fn test_embed_from_index() {
        let index = HealthIndex {
            name: "AIRLY_CAQI".to_string(),
            value: Some(35.53),
            level: "LOW".to_string(),
            description: "Air is quite good.".to_string(),
            color: "#D1CF1E".to_string(),
        };
        let embed = Embed::from_index(&index).unwrap();

        assert_eq!(embed.title, "AIRLY_CAQI 36 (LOW)");
        assert_eq!(embed.description, "Air is quite good.");
        assert_eq!(embed.color, 0xD1CF1E);
    }

    #[test]
    fn test_message_without_embeds_omits_field() {
        let message = WebhookMessage {
            content: "hello".to_string(),
            username: "myair".to_string(),
            embeds: None,
        };
        let json = serde_json::to_value(&message).unwrap();

        assert_eq!(json, serde_json::json!({"content": "hello", "username": "myair"}));
    }

    #[test]
    fn test_message_with_embed() {
        let message = WebhookMessage {
            content: "hello".to_string(),
            username: "myair".to_string(),
            embeds: Some(vec![Embed::new("t".to_string(), "d".to_string(), "#000010").unwrap()]),
        };
        let json = serde_json::to_value(&message).unwrap();

        assert_eq!(json["embeds"], serde_json::json!([{"title": "t", "description": "d", "color": 16}]));
    }
}
