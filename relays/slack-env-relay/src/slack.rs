//! Slack wire types: the Block Kit subset posted to the webhook and the ephemeral
//! slash-command reply.

use crate::model::Id;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Message posted through the incoming webhook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlackMessage {
    pub channel: String,
    /// Notification fallback when blocks can't be shown.
    pub text: String,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Header { text: TextObject },
    Section { text: TextObject },
    Actions { elements: Vec<Element> },
}

impl Block {
    pub fn header(text: impl Into<String>) -> Self {
        Self::Header {
            text: TextObject::PlainText {
                text: text.into(),
                emoji: true,
            },
        }
    }

    pub fn section(markdown: impl Into<String>) -> Self {
        Self::Section {
            text: TextObject::Mrkdwn {
                text: markdown.into(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextObject {
    PlainText { text: String, emoji: bool },
    Mrkdwn { text: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    Button {
        text: TextObject,
        value: String,
        action_id: String,
        style: ButtonStyle,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonStyle {
    Primary,
    Danger,
}

/// What a "Get Logs" button carries back to the app when clicked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonValue {
    /// Environment id.
    pub id: Id,
    pub region: String,
    /// Deployment id; `null` when the API omitted it.
    pub deployment: Option<Id>,
}

impl ButtonValue {
    /// JSON text stored in the button's `value`.
    pub fn encode(&self) -> String {
        json!({
            "id": self.id,
            "region": self.region,
            "deployment": self.deployment,
        })
        .to_string()
    }

    pub fn decode(value: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    Ephemeral,
}

/// Synchronous reply to the slash command, visible only to the invoking user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlashResponse {
    pub response_type: ResponseType,
    pub text: String,
}

impl SlashResponse {
    pub fn ephemeral(text: impl Into<String>) -> Self {
        Self {
            response_type: ResponseType::Ephemeral,
            text: text.into(),
        }
    }

    pub fn usage() -> Self {
        Self::ephemeral(
            "Please provide an environment name to search for. Usage: `/your-command <env-name>`",
        )
    }

    pub fn no_results(query: &str) -> Self {
        Self::ephemeral(format!("No results found for '{query}' in any region."))
    }

    pub fn misconfigured() -> Self {
        Self::ephemeral("Error: The Slack webhook is not configured on the server.")
    }

    pub fn sent(count: usize) -> Self {
        Self::ephemeral(format!(
            "Found {count} matching environments. Details sent to the designated channel."
        ))
    }

    pub fn failure() -> Self {
        Self::ephemeral("A critical error occurred while processing your request.")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn button_value_round_trips() {
        for value in [
            ButtonValue {
                id: "env-1".into(),
                region: "us-east1".into(),
                deployment: Some("dep-9".into()),
            },
            ButtonValue {
                id: "Unknown ID".into(),
                region: "eu-west12".into(),
                deployment: None,
            },
            ButtonValue {
                id: "quote\"and\\slash".into(),
                region: "r".into(),
                deployment: Some("".into()),
            },
            ButtonValue {
                id: 42_u64.into(),
                region: "r".into(),
                deployment: Some(7_u64.into()),
            },
        ] {
            assert_eq!(ButtonValue::decode(&value.encode()).unwrap(), value);
        }
    }

    #[test]
    fn button_value_has_exactly_three_keys() {
        let value = ButtonValue {
            id: "e".into(),
            region: "r".into(),
            deployment: None,
        };
        let decoded: serde_json::Value = serde_json::from_str(&value.encode()).unwrap();

        assert_eq!(decoded, json!({"id": "e", "region": "r", "deployment": null}));
    }

    #[test]
    fn numeric_ids_stay_numbers() {
        let value = ButtonValue {
            id: 42_u64.into(),
            region: "us-east1".into(),
            deployment: Some(7_u64.into()),
        };
        let decoded: serde_json::Value = serde_json::from_str(&value.encode()).unwrap();

        assert_eq!(decoded, json!({"id": 42, "region": "us-east1", "deployment": 7}));
    }

    #[test]
    fn blocks_serialize_to_block_kit_shape() {
        let blocks = vec![
            Block::header("Title"),
            Block::section("*bold*"),
            Block::Actions {
                elements: vec![Element::Button {
                    text: TextObject::PlainText {
                        text: "Go".into(),
                        emoji: true,
                    },
                    value: "v".into(),
                    action_id: "get_logs".into(),
                    style: ButtonStyle::Danger,
                }],
            },
        ];

        assert_eq!(
            serde_json::to_value(&blocks).unwrap(),
            json!([
                {"type": "header", "text": {"type": "plain_text", "text": "Title", "emoji": true}},
                {"type": "section", "text": {"type": "mrkdwn", "text": "*bold*"}},
                {"type": "actions", "elements": [{
                    "type": "button",
                    "text": {"type": "plain_text", "text": "Go", "emoji": true},
                    "value": "v",
                    "action_id": "get_logs",
                    "style": "danger"
                }]}
            ])
        );
    }

    #[test]
    fn slash_response_is_ephemeral() {
        assert_eq!(
            serde_json::to_value(SlashResponse::sent(3)).unwrap(),
            json!({
                "response_type": "ephemeral",
                "text": "Found 3 matching environments. Details sent to the designated channel."
            })
        );
    }
}
