use std::path::{Path, PathBuf};

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON5 parse error: {0}")]
    Json5(#[from] json5::Error),
    #[error("Config directory not found")]
    NoDirFound,
    #[error("Invalid value for {key}: {value:?}")]
    InvalidEnv { key: &'static str, value: String },
    #[error("UTC offset out of range: {0} hours")]
    InvalidOffset(i32),
}

/// Webhook server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 {
    8080
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

/// SeaTalk Open Platform app credentials and endpoints.
///
/// Endpoints left empty are derived from `api_url`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeaTalkConfig {
    #[serde(default)]
    pub app_id: String,
    #[serde(default)]
    pub app_secret: String,
    /// Base URL of the Open API.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// App access token endpoint.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub auth_url: String,
    /// Endpoint for 1:1 messages to bot subscribers.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub single_chat_url: String,
    /// Endpoint for group chat messages.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub group_chat_url: String,
    /// When set, inbound callbacks must carry a matching `Signature` header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing_secret: Option<String>,
}

fn default_api_url() -> String {
    "https://openapi.seatalk.io".to_string()
}

impl Default for SeaTalkConfig {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            app_secret: String::new(),
            api_url: default_api_url(),
            auth_url: String::new(),
            single_chat_url: String::new(),
            group_chat_url: String::new(),
            signing_secret: None,
        }
    }
}

impl SeaTalkConfig {
    pub fn auth_endpoint(&self) -> String {
        self.endpoint(&self.auth_url, "/auth/app_access_token")
    }

    pub fn single_chat_endpoint(&self) -> String {
        self.endpoint(&self.single_chat_url, "/messaging/v2/single_chat")
    }

    pub fn group_chat_endpoint(&self) -> String {
        self.endpoint(&self.group_chat_url, "/messaging/v2/group_chat")
    }

    fn endpoint(&self, explicit: &str, path: &str) -> String {
        if explicit.is_empty() {
            format!("{}{path}", self.api_url.trim_end_matches('/'))
        } else {
            explicit.to_string()
        }
    }
}

/// Duty roster file and the offset its weeks are computed in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterConfig {
    #[serde(default = "default_roster_file")]
    pub file: PathBuf,
    /// Hours east of UTC.
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
}

fn default_roster_file() -> PathBuf {
    PathBuf::from("stock_inventory_schedule.txt")
}

fn default_utc_offset_hours() -> i32 {
    7
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            file: default_roster_file(),
            utc_offset_hours: default_utc_offset_hours(),
        }
    }
}

/// What a scheduled job does when it fires.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JobKind {
    /// Post this week's PIC and the full roster, rotating the previous PIC.
    PicRoster,
    /// Post a fixed text.
    Reminder { text: String },
}

/// A scheduled job definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    pub name: String,
    /// Cron expression: `sec min hour day-of-month month day-of-week [year]`.
    pub schedule: String,
    pub kind: JobKind,
    /// Group chat to post into. Filled from `REGRESSION_GROUP_ID` when empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

/// Text of the default Friday reminder.
pub const RETURN_REFUND_REMINDER: &str =
    "Reminder: please run the return & refund regression tests before the weekend.";

fn default_jobs() -> Vec<JobConfig> {
    vec![
        JobConfig {
            name: "pic-roster".to_string(),
            schedule: "0 25 14 * * Wed".to_string(),
            kind: JobKind::PicRoster,
            group_id: None,
            enabled: true,
        },
        JobConfig {
            name: "return-refund-reminder".to_string(),
            schedule: "0 0 0 * * Fri".to_string(),
            kind: JobKind::Reminder {
                text: RETURN_REFUND_REMINDER.to_string(),
            },
            group_id: None,
            enabled: true,
        },
    ]
}

fn default_reply_text() -> String {
    "Message received. How can I help?".to_string()
}

/// Top-level dutybot configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DutyBotConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub seatalk: SeaTalkConfig,
    #[serde(default)]
    pub roster: RosterConfig,
    #[serde(default = "default_jobs")]
    pub jobs: Vec<JobConfig>,
    /// Canned reply to subscriber and group-mention messages.
    #[serde(default = "default_reply_text")]
    pub reply_text: String,
}

impl Default for DutyBotConfig {
    fn default() -> Self {
        Self {
            gateway: GatewayConfig::default(),
            seatalk: SeaTalkConfig::default(),
            roster: RosterConfig::default(),
            jobs: default_jobs(),
            reply_text: default_reply_text(),
        }
    }
}

impl DutyBotConfig {
    /// The fixed offset roster weeks and job schedules are evaluated in.
    pub fn utc_offset(&self) -> Result<FixedOffset, ConfigError> {
        let hours = self.roster.utc_offset_hours;
        hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .ok_or(ConfigError::InvalidOffset(hours))
    }

    /// Look up a job by name.
    pub fn job(&self, name: &str) -> Option<&JobConfig> {
        self.jobs.iter().find(|j| j.name == name)
    }

    /// Apply environment overrides on top of file values.
    ///
    /// `lookup` returns the value of a variable, or `None` when unset.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(v) = get("SEATALK_APP_ID") {
            self.seatalk.app_id = v;
        }
        if let Some(v) = get("SEATALK_APP_SECRET") {
            self.seatalk.app_secret = v;
        }
        if let Some(v) = get("SEATALK_API_URL") {
            self.seatalk.api_url = v;
        }
        if let Some(v) = get("SEATALK_AUTH_URL") {
            self.seatalk.auth_url = v;
        }
        if let Some(v) = get("SINGLE_CHAT_URL") {
            self.seatalk.single_chat_url = v;
        }
        if let Some(v) = get("SEATALK_SEND_GROUP_CHAT_URL") {
            self.seatalk.group_chat_url = v;
        }
        if let Some(v) = get("SEATALK_SIGNING_SECRET") {
            self.seatalk.signing_secret = Some(v);
        }
        if let Some(v) = get("PORT") {
            self.gateway.port = v
                .trim()
                .trim_start_matches(':')
                .parse()
                .map_err(|_| ConfigError::InvalidEnv { key: "PORT", value: v })?;
        }
        if let Some(v) = get("ROSTER_FILE") {
            self.roster.file = PathBuf::from(v);
        }
        if let Some(v) = get("UTC_OFFSET_HOURS") {
            self.roster.utc_offset_hours = v.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                key: "UTC_OFFSET_HOURS",
                value: v,
            })?;
        }
        if let Some(group) = get("REGRESSION_GROUP_ID") {
            for job in self.jobs.iter_mut().filter(|j| j.group_id.is_none()) {
                job.group_id = Some(group.clone());
            }
        }
        Ok(())
    }
}

/// Resolve the dutybot config directory (~/.dutybot/).
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|h| h.join(".dutybot"))
        .ok_or(ConfigError::NoDirFound)
}

/// Resolve the config file path: `DUTYBOT_CONFIG`, else ~/.dutybot/config.json5.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    match std::env::var_os("DUTYBOT_CONFIG") {
        Some(path) => Ok(PathBuf::from(path)),
        None => Ok(config_dir()?.join("config.json5")),
    }
}

/// Load configuration: `.env`, then the config file, then environment overrides.
pub fn load_config() -> Result<DutyBotConfig, ConfigError> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let path = config_file_path()?;
    let mut config = load_config_from(&path)?;
    config.apply_env(|key| std::env::var(key).ok())?;
    config.utc_offset()?;
    Ok(config)
}

/// Load configuration from a specific path, falling back to defaults if not found.
pub fn load_config_from(path: &Path) -> Result<DutyBotConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!("Config file not found at {}, using defaults", path.display());
        return Ok(DutyBotConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config: DutyBotConfig = json5::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = DutyBotConfig::default();
        assert_eq!(config.gateway.port, 8080);
        assert_eq!(config.roster.utc_offset_hours, 7);
        assert_eq!(config.jobs.len(), 2);
        assert_eq!(config.job("pic-roster").unwrap().kind, JobKind::PicRoster);
        assert_eq!(config.utc_offset().unwrap().local_minus_utc(), 7 * 3600);
    }

    #[test]
    fn test_json5_parse() {
        let json5_str = r#"{
            gateway: { port: 9000 },
            roster: { file: "/srv/roster.txt" },
            jobs: [
                {
                    name: "standup",
                    schedule: "0 0 9 * * Mon-Fri",
                    kind: { type: "reminder", text: "Standup!" },
                    group_id: "g-1",
                },
            ],
        }"#;
        let config: DutyBotConfig = json5::from_str(json5_str).unwrap();
        assert_eq!(config.gateway.port, 9000);
        assert_eq!(config.roster.file, PathBuf::from("/srv/roster.txt"));
        assert_eq!(config.roster.utc_offset_hours, 7);
        assert_eq!(config.jobs.len(), 1);
        assert!(config.jobs[0].enabled);
        assert_eq!(
            config.jobs[0].kind,
            JobKind::Reminder {
                text: "Standup!".into()
            }
        );
        assert_eq!(config.reply_text, "Message received. How can I help?");
    }

    #[test]
    fn test_env_overrides() {
        let mut config = DutyBotConfig::default();
        config
            .apply_env(env(&[
                ("SEATALK_APP_ID", "app"),
                ("SEATALK_APP_SECRET", "secret"),
                ("SEATALK_SEND_GROUP_CHAT_URL", "http://localhost/group"),
                ("PORT", ":8081"),
                ("REGRESSION_GROUP_ID", "grp"),
                ("UTC_OFFSET_HOURS", "8"),
            ]))
            .unwrap();
        assert_eq!(config.seatalk.app_id, "app");
        assert_eq!(config.seatalk.app_secret, "secret");
        assert_eq!(config.seatalk.group_chat_url, "http://localhost/group");
        assert_eq!(config.gateway.port, 8081);
        assert_eq!(config.roster.utc_offset_hours, 8);
        assert!(
            config
                .jobs
                .iter()
                .all(|j| j.group_id.as_deref() == Some("grp"))
        );
    }

    #[test]
    fn test_seatalk_endpoints_follow_api_url() {
        let config = DutyBotConfig::default();
        assert_eq!(
            config.seatalk.auth_endpoint(),
            "https://openapi.seatalk.io/auth/app_access_token"
        );

        let mut config = DutyBotConfig::default();
        config
            .apply_env(env(&[
                ("SEATALK_API_URL", "http://localhost:9000/"),
                ("SINGLE_CHAT_URL", "http://other/single"),
            ]))
            .unwrap();
        assert_eq!(
            config.seatalk.auth_endpoint(),
            "http://localhost:9000/auth/app_access_token"
        );
        assert_eq!(
            config.seatalk.group_chat_endpoint(),
            "http://localhost:9000/messaging/v2/group_chat"
        );
        assert_eq!(config.seatalk.single_chat_endpoint(), "http://other/single");
    }

    #[test]
    fn test_env_group_does_not_replace_explicit() {
        let mut config = DutyBotConfig::default();
        config.jobs[0].group_id = Some("explicit".into());
        config
            .apply_env(env(&[("REGRESSION_GROUP_ID", "grp")]))
            .unwrap();
        assert_eq!(config.jobs[0].group_id.as_deref(), Some("explicit"));
        assert_eq!(config.jobs[1].group_id.as_deref(), Some("grp"));
    }

    #[test]
    fn test_env_invalid_port() {
        let mut config = DutyBotConfig::default();
        let err = config.apply_env(env(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { key: "PORT", .. }));
    }

    #[test]
    fn test_invalid_offset() {
        let mut config = DutyBotConfig::default();
        config.roster.utc_offset_hours = 48;
        assert!(matches!(
            config.utc_offset(),
            Err(ConfigError::InvalidOffset(48))
        ));
    }

    #[test]
    fn test_load_config_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("none.json5")).unwrap();
        assert_eq!(config.gateway.port, 8080);
    }
}
