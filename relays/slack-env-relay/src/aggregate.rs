//! Cross-region environment search.

use crate::{
    api::{ApiClient, region_headers},
    config::Region,
    model::{EnvironmentPage, TaggedEnvironment},
};
use serde_json::json;

/// Maximum environments requested from each region.
pub const SEARCH_LIMIT: u32 = 5;

/// Path (with query) that searches for environments whose name includes `text`.
pub fn environment_search_path(text: &str) -> String {
    let filters = json!([{
        "id": "name",
        "includeValues": [text],
        "excludeValues": [],
    }]);

    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("_filters", &filters.to_string())
        .append_pair("_limit", &SEARCH_LIMIT.to_string())
        .finish();

    format!("/provisioning/environments/?{query}")
}

/// Searches every region in order and returns all matches, tagged with their region.
///
/// Regions without a usable credential are skipped without a request. A failed or
/// empty region contributes nothing.
pub async fn search_environments(
    api: &ApiClient,
    regions: &[Region],
    text: &str,
) -> Vec<TaggedEnvironment> {
    let path = environment_search_path(text);
    let mut results = Vec::new();

    for region in regions {
        let Some(credential) = region.credential.as_deref() else {
            tracing::warn!(
                region = %region.label,
                key = %region.key_name,
                "credential not set, skipping region"
            );
            continue;
        };

        let headers = match region_headers(credential) {
            Ok(headers) => headers,
            Err(e) => {
                tracing::warn!(region = %region.label, error = %e, "credential is not a valid header value, skipping region");
                continue;
            }
        };

        let Some(page) = api
            .get_json::<EnvironmentPage>(&region.base_url, &path, &headers)
            .await
        else {
            continue;
        };

        let items = page.items.unwrap_or_default();
        tracing::debug!(region = %region.label, count = items.len(), "region search complete");

        results.extend(
            items
                .into_iter()
                .map(|environment| TaggedEnvironment::new(environment, region, &headers)),
        );
    }

    tracing::info!(query = %text, count = results.len(), "environment search complete");
    results
}
