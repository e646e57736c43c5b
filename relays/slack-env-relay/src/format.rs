//! Builds the channel message: one section per environment followed by a "Get Logs"
//! button per deployment.

use crate::{
    api::ApiClient,
    model::{Deployment, DeploymentsPage, TaggedEnvironment},
    slack::{Block, ButtonStyle, ButtonValue, Element, SlackMessage, TextObject},
};
use reqwest::header::HeaderValue;

pub const HEADER_TEXT: &str = "Select Environment to pull logs";
pub const FALLBACK_TEXT: &str = "Get Support Details";
pub const DEPLOYMENTS_PATH: &str = "/deployments";
pub const GET_LOGS_ACTION: &str = "get_logs";

pub const FETCH_ERROR_TEXT: &str = "*Error fetching deployments.*";
pub const NO_DEPLOYMENTS_TEXT: &str = "*No deployments found.*";
pub const EMPTY_DEPLOYMENTS_TEXT: &str = "_No deployments found for this environment._";

const ENV_ID_HEADER: &str = "zn-env-id";
const HOME_REGION: &str = "us-east1";

/// Fetches deployments for every environment, in order, and assembles the message.
///
/// A failure for one environment shows up as a section in the message; it never
/// stops the remaining environments.
pub async fn build_message(
    api: &ApiClient,
    channel: &str,
    environments: &[TaggedEnvironment],
) -> SlackMessage {
    let mut blocks = vec![Block::header(HEADER_TEXT)];

    for env in environments {
        blocks.push(environment_section(env));

        let deployments = fetch_deployments(api, env).await;
        blocks.extend(deployment_blocks(env, deployments));
    }

    SlackMessage {
        channel: channel.to_string(),
        text: FALLBACK_TEXT.to_string(),
        blocks,
    }
}

/// `None` means the call failed.
async fn fetch_deployments(api: &ApiClient, env: &TaggedEnvironment) -> Option<DeploymentsPage> {
    let env_id = env.environment.display_id();

    let mut headers = env.headers.clone();
    match HeaderValue::from_str(&env_id) {
        Ok(value) => {
            headers.insert(ENV_ID_HEADER, value);
        }
        Err(e) => {
            tracing::error!(env_id = %env_id, error = %e, "environment id is not a valid header value");
            return None;
        }
    }

    api.get_json(&env.base_url, DEPLOYMENTS_PATH, &headers).await
}

fn region_marker(region: &str) -> &'static str {
    if region == HOME_REGION {
        ":football:"
    } else {
        ":soccer:"
    }
}

pub fn environment_section(env: &TaggedEnvironment) -> Block {
    Block::section(format!(
        "{} `{} : {}`",
        region_marker(&env.region),
        env.environment.display_name(),
        env.environment.display_id(),
    ))
}

/// Blocks shown under an environment for the outcome of its deployments call.
pub fn deployment_blocks(env: &TaggedEnvironment, page: Option<DeploymentsPage>) -> Vec<Block> {
    let Some(page) = page else {
        return vec![Block::section(FETCH_ERROR_TEXT)];
    };

    // A `null` list reads the same as an empty one.
    let deployments = match page.deployments {
        None => return vec![Block::section(NO_DEPLOYMENTS_TEXT)],
        Some(deployments) => deployments.unwrap_or_default(),
    };

    if deployments.is_empty() {
        return vec![Block::section(EMPTY_DEPLOYMENTS_TEXT)];
    }

    deployments
        .iter()
        .map(|deployment| deployment_actions(env, deployment))
        .collect()
}

fn deployment_actions(env: &TaggedEnvironment, deployment: &Deployment) -> Block {
    let value = ButtonValue {
        id: env.environment.id_or_unknown(),
        region: env.region.clone(),
        deployment: deployment.id.clone(),
    };

    let style = if deployment.is_primary() {
        ButtonStyle::Primary
    } else {
        ButtonStyle::Danger
    };

    Block::Actions {
        elements: vec![Element::Button {
            text: TextObject::PlainText {
                text: format!("Get Logs for {}", deployment.display_name()),
                emoji: true,
            },
            value: value.encode(),
            action_id: GET_LOGS_ACTION.to_string(),
            style,
        }],
    }
}
