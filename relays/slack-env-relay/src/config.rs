//! Relay configuration.
//!
//! All flags are env-backed so the relay runs unchanged under a container platform.
//! Region credentials are resolved once, when [`Args::relay_config`] builds the
//! [`RelayConfig`]; request handling never reads the process environment.

use crate::error::ConfigError;
use clap::Parser;
use std::str::FromStr;

/// Regions queried when no `--region` is given: label, base URL, credential variable.
pub const DEFAULT_REGIONS: &[(&str, &str, &str)] = &[
    (
        "us-east1",
        "https://partners-us-east1.zeronetworks.com/api/v1/internal",
        "us_east1_key",
    ),
    (
        "eu-west12",
        "https://partners-eu-west12.zeronetworks.com/api/v1/internal",
        "eu_west12_key",
    ),
];

/// Slack slash-command relay for partner environment lookups.
#[derive(Parser, Debug, Clone)]
#[command(name = "slack-env-relay")]
#[command(about = "Looks up partner environments from a Slack slash command")]
pub struct Args {
    /// Host to bind to.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, env = "PORT", default_value = "8080")]
    pub port: u16,

    /// Slack channel the environment report is posted to.
    #[arg(short, long, env = "SLACK_CHANNEL", default_value = "C123ABC456")]
    pub channel: String,

    /// Slack incoming webhook URL.
    #[arg(short, long, env = "SLACK_WEBHOOK_URL")]
    pub webhook_url: Option<String>,

    /// Partner region as LABEL=BASE_URL=KEY_NAME, where KEY_NAME is the variable
    /// holding that region's API secret. Repeatable; defaults to the built-in regions.
    #[arg(short, long = "region", env = "RELAY_REGIONS", value_delimiter = ',')]
    pub regions: Vec<RegionSpec>,

    /// Outbound request timeout in seconds. Unset keeps the client default.
    #[arg(short, long, env = "RELAY_HTTP_TIMEOUT")]
    pub timeout: Option<u64>,
}

impl Args {
    /// Builds the runtime configuration, resolving each region's credential through
    /// `lookup` (normally `std::env::var`).
    pub fn relay_config<F>(&self, lookup: F) -> RelayConfig
    where
        F: Fn(&str) -> Option<String>,
    {
        let specs = if self.regions.is_empty() {
            RegionSpec::defaults()
        } else {
            self.regions.clone()
        };

        RelayConfig {
            channel: self.channel.clone(),
            webhook_url: self.webhook_url.clone().filter(|url| !url.is_empty()),
            regions: specs.into_iter().map(|spec| spec.resolve(&lookup)).collect(),
        }
    }
}

/// Unresolved region entry as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionSpec {
    pub label: String,
    pub base_url: String,
    pub key_name: String,
}

impl RegionSpec {
    /// The built-in region table.
    pub fn defaults() -> Vec<Self> {
        DEFAULT_REGIONS
            .iter()
            .map(|(label, base_url, key_name)| Self {
                label: (*label).to_string(),
                base_url: (*base_url).to_string(),
                key_name: (*key_name).to_string(),
            })
            .collect()
    }

    /// Attaches the credential found under `key_name`. Empty values count as unset.
    pub fn resolve<F>(self, lookup: F) -> Region
    where
        F: Fn(&str) -> Option<String>,
    {
        let credential = lookup(&self.key_name).filter(|value| !value.is_empty());

        Region {
            base_url: self.base_url.trim_end_matches('/').to_string(),
            label: self.label,
            key_name: self.key_name,
            credential,
        }
    }
}

impl FromStr for RegionSpec {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = |reason| ConfigError::InvalidRegion {
            value: value.to_string(),
            reason,
        };

        // Base URLs may carry '=' in a query string, so split from both ends.
        let (label, rest) = value
            .split_once('=')
            .ok_or_else(|| invalid("expected LABEL=BASE_URL=KEY_NAME"))?;
        let (base_url, key_name) = rest
            .rsplit_once('=')
            .ok_or_else(|| invalid("expected LABEL=BASE_URL=KEY_NAME"))?;

        let (label, base_url, key_name) = (label.trim(), base_url.trim(), key_name.trim());

        if label.is_empty() {
            return Err(invalid("label is empty"));
        }
        if key_name.is_empty() {
            return Err(invalid("credential variable name is empty"));
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(invalid("base URL must start with http:// or https://"));
        }

        Ok(Self {
            label: label.to_string(),
            base_url: base_url.to_string(),
            key_name: key_name.to_string(),
        })
    }
}

/// One partner API deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub label: String,
    /// Base URL without a trailing slash; request paths are appended verbatim.
    pub base_url: String,
    pub key_name: String,
    pub credential: Option<String>,
}

#[cfg(test)]
impl Region {
    pub fn new(label: &str, base_url: &str, credential: Option<&str>) -> Self {
        Self {
            label: label.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            key_name: format!("{label}_key"),
            credential: credential.map(str::to_string),
        }
    }
}

/// Immutable runtime configuration shared by every request.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub channel: String,
    pub webhook_url: Option<String>,
    /// Queried in this order; results keep it.
    pub regions: Vec<Region>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["slack-env-relay", "--channel", "C42"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn parses_region_spec() {
        let spec: RegionSpec = "ap-south1=https://partners.example.com/api=ap_key"
            .parse()
            .unwrap();

        assert_eq!(spec.label, "ap-south1");
        assert_eq!(spec.base_url, "https://partners.example.com/api");
        assert_eq!(spec.key_name, "ap_key");
    }

    #[test]
    fn region_spec_keeps_equals_inside_url() {
        let spec: RegionSpec = "lab=https://example.com/api?tenant=a=lab_key".parse().unwrap();

        assert_eq!(spec.base_url, "https://example.com/api?tenant=a");
        assert_eq!(spec.key_name, "lab_key");
    }

    #[test]
    fn rejects_malformed_region_specs() {
        for value in [
            "just-a-label",
            "label=https://example.com",
            "=https://example.com=key",
            "label=https://example.com=",
            "label=ftp://example.com=key",
        ] {
            assert!(value.parse::<RegionSpec>().is_err(), "{value} should be rejected");
        }
    }

    #[test]
    fn defaults_to_builtin_regions_in_order() {
        let config = args(&[]).relay_config(|key| (key == "us_east1_key").then(|| "s3cret".into()));

        let labels: Vec<_> = config.regions.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["us-east1", "eu-west12"]);
        assert_eq!(config.regions[0].credential.as_deref(), Some("s3cret"));
        assert_eq!(config.regions[1].credential, None);
        assert_eq!(config.channel, "C42");
    }

    #[test]
    fn explicit_regions_replace_defaults() {
        let config = args(&["--region", "lab=http://localhost:9000/api/=lab_key"])
            .relay_config(|_| Some("token".into()));

        assert_eq!(config.regions.len(), 1);
        assert_eq!(config.regions[0].base_url, "http://localhost:9000/api");
        assert_eq!(config.regions[0].key_name, "lab_key");
    }

    #[test]
    fn empty_values_count_as_unset() {
        let config = args(&["--webhook-url", ""]).relay_config(|_| Some(String::new()));

        assert!(config.webhook_url.is_none());
        assert!(config.regions.iter().all(|r| r.credential.is_none()));
    }
}
