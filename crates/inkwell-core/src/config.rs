use chrono::FixedOffset;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_PORT: u16 = 8787;
pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_DISCORD_API: &str = "https://discord.com/api/v10";
pub const DEFAULT_GITHUB_API: &str = "https://api.github.com";
pub const DEFAULT_GITHUB_TIMEOUT_SECS: u64 = 30;

/// Top-level config (inkwell.toml + INKWELL_* env overrides).
///
/// Built once in `main` and handed to every component; nothing mutates it
/// after load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InkwellConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub discord: DiscordConfig,
    pub github: GitHubConfig,
    #[serde(default)]
    pub site: SiteConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordConfig {
    /// Application (client) ID, part of the follow-up webhook URL.
    pub application_id: String,
    /// Hex-encoded Ed25519 public key from the developer portal.
    pub public_key: String,
    /// Bot token, only needed for slash-command registration.
    #[serde(default)]
    pub bot_token: Option<String>,
    /// Discord user IDs allowed to publish. Empty denies everyone, `"*"`
    /// allows everyone.
    #[serde(default)]
    pub authorized_users: Vec<String>,
    #[serde(default = "default_discord_api")]
    pub api_base: String,
    /// Register the `/post` command on startup.
    #[serde(default)]
    pub register_commands: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    pub token: String,
    pub owner: String,
    pub repo: String,
    #[serde(default = "default_base_branch")]
    pub base_branch: String,
    #[serde(default = "default_github_api")]
    pub api_base: String,
    #[serde(default = "default_github_timeout")]
    pub timeout_secs: u64,
}

/// Settings describing the target site's content layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Offset applied to every generated timestamp, e.g. "-05:00".
    #[serde(default = "default_utc_offset")]
    pub utc_offset: String,
    /// File extension for generated documents, without the dot.
    #[serde(default = "default_extension")]
    pub extension: String,
    /// First segment of generated branch names.
    #[serde(default = "default_branch_source")]
    pub branch_source: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            utc_offset: default_utc_offset(),
            extension: default_extension(),
            branch_source: default_branch_source(),
        }
    }
}

impl SiteConfig {
    /// Parsed form of `utc_offset`. `load` rejects configs where this fails,
    /// so callers holding a loaded config can rely on it.
    pub fn offset(&self) -> crate::error::Result<FixedOffset> {
        parse_utc_offset(&self.utc_offset)
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}
fn default_discord_api() -> String {
    DEFAULT_DISCORD_API.to_string()
}
fn default_github_api() -> String {
    DEFAULT_GITHUB_API.to_string()
}
fn default_github_timeout() -> u64 {
    DEFAULT_GITHUB_TIMEOUT_SECS
}
fn default_base_branch() -> String {
    "main".to_string()
}
fn default_utc_offset() -> String {
    "+00:00".to_string()
}
fn default_extension() -> String {
    "md".to_string()
}
fn default_branch_source() -> String {
    "discord".to_string()
}

impl InkwellConfig {
    /// Load config from a TOML file with INKWELL_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. ~/.inkwell/inkwell.toml
    ///
    /// Nested keys use a double underscore: `INKWELL_GITHUB__TOKEN`.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);
        debug!(path = %path, "loading config");

        Self::from_figment(
            Figment::new()
                .merge(Toml::file(&path))
                .merge(Env::prefixed("INKWELL_").split("__")),
        )
    }

    /// Extract and validate a config from an already-assembled figment.
    pub fn from_figment(figment: Figment) -> crate::error::Result<Self> {
        let config: InkwellConfig = figment
            .extract()
            .map_err(|e| crate::error::InkwellError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> crate::error::Result<()> {
        let key = hex::decode(self.discord.public_key.trim()).map_err(|_| {
            crate::error::InkwellError::Config("discord.public_key is not valid hex".to_string())
        })?;
        if key.len() != 32 {
            return Err(crate::error::InkwellError::Config(format!(
                "discord.public_key must be 32 bytes, got {}",
                key.len()
            )));
        }
        self.site.offset()?;
        if self.site.extension.is_empty() || self.site.extension.contains(['/', '.']) {
            return Err(crate::error::InkwellError::Config(
                "site.extension must be a bare extension like \"md\"".to_string(),
            ));
        }
        Ok(())
    }
}

/// Parse `+HH:MM` / `-HH:MM` into a fixed offset.
pub fn parse_utc_offset(raw: &str) -> crate::error::Result<FixedOffset> {
    let invalid =
        || crate::error::InkwellError::Config(format!("site.utc_offset {raw:?} is not ±HH:MM"));

    let raw = raw.trim();
    let (sign, rest) = match raw.as_bytes().first() {
        Some(b'+') => (1, &raw[1..]),
        Some(b'-') => (-1, &raw[1..]),
        _ => return Err(invalid()),
    };
    let (hours, minutes) = rest.split_once(':').ok_or_else(invalid)?;
    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.inkwell/inkwell.toml", home)
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    const KEY: &str = "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a";

    #[test]
    fn offset_parses_both_signs() {
        assert_eq!(
            parse_utc_offset("-05:00").unwrap().local_minus_utc(),
            -5 * 3600
        );
        assert_eq!(
            parse_utc_offset("+05:30").unwrap().local_minus_utc(),
            5 * 3600 + 30 * 60
        );
        assert!(parse_utc_offset("05:00").is_err());
        assert!(parse_utc_offset("+25:00").is_err());
    }

    #[test]
    fn load_applies_defaults_and_env_overrides() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "inkwell.toml",
                &format!(
                    r#"
                    [discord]
                    application_id = "123"
                    public_key = "{KEY}"
                    authorized_users = ["42"]

                    [github]
                    token = "ghp_file"
                    owner = "me"
                    repo = "site"
                    "#
                ),
            )?;
            jail.set_env("INKWELL_GITHUB__TOKEN", "ghp_env");

            let config = InkwellConfig::load(Some("inkwell.toml")).unwrap();
            assert_eq!(config.github.token, "ghp_env");
            assert_eq!(config.github.base_branch, "main");
            assert_eq!(config.server.port, DEFAULT_PORT);
            assert_eq!(config.site.extension, "md");
            assert_eq!(config.discord.authorized_users, vec!["42".to_string()]);
            Ok(())
        });
    }

    #[test]
    fn load_rejects_short_public_key() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "inkwell.toml",
                r#"
                [discord]
                application_id = "123"
                public_key = "abcd"

                [github]
                token = "t"
                owner = "me"
                repo = "site"
                "#,
            )?;
            let err = InkwellConfig::load(Some("inkwell.toml")).unwrap_err();
            assert!(err.to_string().contains("32 bytes"));
            Ok(())
        });
    }
}
