/// Application configuration, persisted as TOML in the config directory.
///
/// Example:
///
///   feed_path          = "/var/lib/tibia-tracker/feed.jsonl"
///   announce_threshold = 30
///
///   [emojis]
///   level_up  = "🌟"
///   death     = "☠"
///   pvp_death = "💀"
///
///   [[guilds]]
///   id              = 1
///   world           = "Gladera"
///   channel         = "levels"
///   min_level       = 100
///   simple_messages = false
///
/// Every field has a serde default, so a partial (or empty) file is valid.
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "config.toml";

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

/// Announcement settings of one guild (chat server).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildConfig {
    pub id:              u64,
    /// Tibia world whose characters this guild tracks.
    pub world:           String,
    /// Channel announcements are posted to.
    #[serde(default = "default_channel")]
    pub channel:         String,
    /// Overrides `AppConfig::announce_threshold` for this guild.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_level:       Option<u32>,
    /// Post the fixed one-line messages instead of the flavor text.
    #[serde(default)]
    pub simple_messages: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Emojis {
    #[serde(default = "default_level_up_emoji")]
    pub level_up:  String,
    #[serde(default = "default_death_emoji")]
    pub death:     String,
    #[serde(default = "default_pvp_death_emoji")]
    pub pvp_death: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// JSON-lines file written by the character tracker.
    #[serde(default = "default_feed_path")]
    pub feed_path: PathBuf,

    /// Lowest level announced when a guild sets no `min_level`.
    #[serde(default = "default_announce_threshold")]
    pub announce_threshold: u32,

    /// Maximum characters per posted message.
    #[serde(default = "default_message_limit")]
    pub message_limit: usize,

    /// How many recently used templates are penalized.
    #[serde(default = "default_recent_capacity")]
    pub recent_capacity: usize,

    #[serde(default)]
    pub emojis: Emojis,

    #[serde(default)]
    pub guilds: Vec<GuildConfig>,
}

fn default_feed_path() -> PathBuf { PathBuf::from("feed.jsonl") }
fn default_announce_threshold() -> u32 { 30 }
fn default_message_limit() -> usize { 2000 }
fn default_recent_capacity() -> usize { crate::messages::recency::DEFAULT_CAPACITY }
fn default_channel() -> String { "level-ups".to_owned() }
fn default_level_up_emoji() -> String { "🌟".to_owned() }
fn default_death_emoji() -> String { "☠".to_owned() }
fn default_pvp_death_emoji() -> String { "💀".to_owned() }

impl Default for Emojis {
    fn default() -> Self {
        Self {
            level_up:  default_level_up_emoji(),
            death:     default_death_emoji(),
            pvp_death: default_pvp_death_emoji(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            feed_path:          default_feed_path(),
            announce_threshold: default_announce_threshold(),
            message_limit:      default_message_limit(),
            recent_capacity:    default_recent_capacity(),
            emojis:             Emojis::default(),
            guilds:             Vec::new(),
        }
    }
}

impl AppConfig {
    /// Minimum announced level for a guild.
    pub fn min_level(&self, guild: &GuildConfig) -> u32 {
        guild.min_level.unwrap_or(self.announce_threshold)
    }

    /// Guilds tracking the given world.
    pub fn guilds_for<'a>(&'a self, world: &'a str) -> impl Iterator<Item = &'a GuildConfig> + 'a {
        self.guilds.iter().filter(move |g| g.world.eq_ignore_ascii_case(world))
    }

    /// A relative feed path is taken relative to the config directory.
    pub fn resolved_feed_path(&self, config_dir: &Path) -> PathBuf {
        if self.feed_path.is_absolute() {
            self.feed_path.clone()
        } else {
            config_dir.join(&self.feed_path)
        }
    }
}

// ---------------------------------------------------------------------------
// Load / save
// ---------------------------------------------------------------------------

pub fn load_or_default(config_dir: &Path) -> Result<AppConfig> {
    let path = config_dir.join(CONFIG_FILE);
    if path.exists() {
        let raw = std::fs::read_to_string(&path)?;
        let cfg: AppConfig = toml::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("Config parse error: {}", e))?;
        Ok(cfg)
    } else {
        tracing::info!("No {} in {:?}, using defaults", CONFIG_FILE, config_dir);
        Ok(AppConfig::default())
    }
}

pub fn save(config: &AppConfig, config_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(config_dir)?;
    let raw = toml::to_string_pretty(config)
        .map_err(|e| anyhow::anyhow!("Config serialize error: {}", e))?;
    std::fs::write(config_dir.join(CONFIG_FILE), raw)?;
    Ok(())
}

/// Config directory from the first argument, then `TIBIA_ANNOUNCER_DIR`,
/// then the working directory.
pub fn config_dir_from(arg: Option<String>, env: Option<String>) -> PathBuf {
    arg.or(env)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn guild(id: u64, world: &str, min_level: Option<u32>) -> GuildConfig {
        GuildConfig {
            id,
            world: world.to_owned(),
            channel: "deaths".to_owned(),
            min_level,
            simple_messages: false,
        }
    }

    #[test]
    fn round_trips_config() {
        let dir = tempdir().unwrap();
        let mut cfg = AppConfig::default();
        cfg.announce_threshold = 80;
        cfg.emojis.death       = ":skull:".to_owned();
        cfg.guilds             = vec![guild(7, "Gladera", Some(200)), guild(8, "Antica", None)];

        save(&cfg, dir.path()).unwrap();

        let loaded = load_or_default(dir.path()).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn returns_default_when_missing() {
        let dir = tempdir().unwrap();
        let cfg = load_or_default(dir.path()).unwrap();
        assert_eq!(cfg.announce_threshold, 30);
        assert_eq!(cfg.message_limit,      2000);
        assert_eq!(cfg.recent_capacity,    50);
        assert_eq!(cfg.emojis.level_up,    "🌟");
        assert!(cfg.guilds.is_empty());
    }

    #[test]
    fn partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[[guilds]]\nid = 1\nworld = \"Gladera\"\n\n[emojis]\ndeath = \"x\"\n",
        )
        .unwrap();
        let cfg = load_or_default(dir.path()).unwrap();
        assert_eq!(cfg.guilds.len(), 1);
        assert_eq!(cfg.guilds[0].channel, "level-ups");
        assert!(!cfg.guilds[0].simple_messages);
        assert_eq!(cfg.emojis.death, "x");
        assert_eq!(cfg.emojis.pvp_death, "💀");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "announce_threshold = \"high\"").unwrap();
        let err = load_or_default(dir.path()).unwrap_err();
        assert!(err.to_string().starts_with("Config parse error"));
    }

    #[test]
    fn guild_threshold_overrides_global() {
        let mut cfg = AppConfig::default();
        cfg.guilds = vec![guild(1, "Gladera", Some(150)), guild(2, "gladera", None), guild(3, "Antica", None)];
        let ids: Vec<u64> = cfg.guilds_for("Gladera").map(|g| g.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(cfg.min_level(&cfg.guilds[0]), 150);
        assert_eq!(cfg.min_level(&cfg.guilds[1]), 30);
    }

    #[test]
    fn config_dir_precedence() {
        assert_eq!(config_dir_from(Some("a".into()), Some("b".into())), PathBuf::from("a"));
        assert_eq!(config_dir_from(None, Some("b".into())), PathBuf::from("b"));
        assert_eq!(config_dir_from(None, None), PathBuf::from("."));
    }

    #[test]
    fn relative_feed_path_is_under_config_dir() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.resolved_feed_path(Path::new("/etc/announcer")), PathBuf::from("/etc/announcer/feed.jsonl"));
    }
}
