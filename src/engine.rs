/// Announcement engine: turns tracker events into per-guild chat messages.
///
/// For every guild tracking the character's world:
///   level below the guild's minimum     → skipped
///   simple_messages                     → fixed one-liner
///   otherwise                           → weighted pick from the kind's pool
///
/// The result is formatted, prefixed with the kind's emoji and forwarded to
/// the sink. Arena and elemental deaths without a level lost are dropped
/// before any guild is considered; they are frequent and uninteresting.
///
/// A template that fails to resolve is logged and that guild's announcement
/// skipped; the engine itself never stops on bad content.
use crate::{
    config::{AppConfig, GuildConfig},
    feed::TrackerEvent,
    messages::{
        condition::{self, Condition},
        format, tables, Result as MessageResult,
        selector::Selector,
    },
};
use anyhow::Result;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{Receiver, Sender};

/// Killer names (article stripped, lower-cased) whose zero-loss deaths are
/// not announced.
const ARENA_KILLERS: &[&str] = &["death", "energy", "earth", "fire"];
const ARENA_PREFIX:  &str    = "pit ";

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnouncementKind {
    LevelUp,
    Death,
    PvpDeath,
}

impl AnnouncementKind {
    fn of(condition: &Condition) -> Self {
        match condition {
            Condition::LevelUp(_)      => Self::LevelUp,
            Condition::MonsterDeath(_) => Self::Death,
            Condition::PlayerDeath(_)  => Self::PvpDeath,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub guild_id: u64,
    pub channel:  String,
    pub kind:     AnnouncementKind,
    pub content:  String,
}

// ---------------------------------------------------------------------------
// Announcer
// ---------------------------------------------------------------------------

pub struct Announcer {
    config:   AppConfig,
    selector: Selector,
}

impl Announcer {
    pub fn new(config: AppConfig, selector: Selector) -> Self {
        Self { config, selector }
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Every announcement the event produces, one per interested guild.
    pub fn announce<R: Rng + ?Sized>(&self, event: &TrackerEvent, rng: &mut R) -> Vec<Announcement> {
        let character = event.character();
        let log_msg   = format!("[{}] {} | {}", character.world, character.name, event.level());

        match condition_for(event, self.config.announce_threshold) {
            Ok(c) if is_arena_death(&c) => {
                tracing::debug!("{} | Skipping arena death", log_msg);
                return Vec::new();
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!("{} | Unusable event: {}", log_msg, e);
                return Vec::new();
            }
        }

        let mut out = Vec::new();
        for guild in self.config.guilds_for(&character.world) {
            let min_level = self.config.min_level(guild);
            if event.level() < min_level {
                tracing::debug!("{} | Guild skipped {} | Level under limit", log_msg, guild.id);
                continue;
            }
            match self.compose(event, guild, min_level, rng) {
                Ok(announcement) => {
                    tracing::debug!("{} | Announcing in {}", log_msg, guild.id);
                    out.push(announcement);
                }
                Err(e) => tracing::error!("{} | Guild {} | {}", log_msg, guild.id, e),
            }
        }
        out
    }

    fn compose<R: Rng + ?Sized>(
        &self,
        event:     &TrackerEvent,
        guild:     &GuildConfig,
        min_level: u32,
        rng:       &mut R,
    ) -> MessageResult<Announcement> {
        let condition = condition_for(event, min_level)?;
        let template  = if guild.simple_messages {
            tables::simple_for(&condition)
        } else {
            self.selector.select(tables::pool_for(&condition), &condition, rng)?
        };
        let text = format::capitalize_first(&format::format(template, &condition)?);

        let kind  = AnnouncementKind::of(&condition);
        let emoji = match kind {
            AnnouncementKind::LevelUp  => &self.config.emojis.level_up,
            AnnouncementKind::Death    => &self.config.emojis.death,
            AnnouncementKind::PvpDeath => &self.config.emojis.pvp_death,
        };
        let content = if emoji.is_empty() { text } else { format!("{} {}", emoji, text) };

        Ok(Announcement { guild_id: guild.id, channel: guild.channel.clone(), kind, content })
    }
}

fn condition_for(event: &TrackerEvent, min_level: u32) -> MessageResult<Condition> {
    match event {
        TrackerEvent::LevelUp { character, level } => {
            Condition::level_up(character.clone(), min_level, *level)
        }
        TrackerEvent::Death { character, level, levels_lost, killers } => {
            Condition::death(character.clone(), min_level, *level, *levels_lost, killers)
        }
    }
}

fn is_arena_death(c: &Condition) -> bool {
    let (Ok(killer), Ok(0)) = (condition::killer(c), condition::levels_lost(c)) else {
        return false;
    };
    let killer = killer.to_lowercase();
    ARENA_KILLERS.contains(&killer.as_str()) || killer.starts_with(ARENA_PREFIX)
}

// ---------------------------------------------------------------------------
// Main engine task
// ---------------------------------------------------------------------------

pub async fn run(
    mut event_rx: Receiver<TrackerEvent>,
    tx:           Sender<Announcement>,
    announcer:    Announcer,
) -> Result<()> {
    while let Some(event) = event_rx.recv().await {
        let announcements = announcer.announce(&event, &mut rand::thread_rng());
        for announcement in announcements {
            if tx.send(announcement).await.is_err() {
                tracing::warn!("Announcement channel closed, engine exiting");
                return Ok(());
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{
        condition::{tests::knight, Killer},
        recency::RecencyTracker,
    };
    use rand::{rngs::StdRng, SeedableRng};
    use std::sync::Arc;
    use tokio::sync::mpsc;

    fn guild(id: u64, world: &str, min_level: Option<u32>, simple: bool) -> GuildConfig {
        GuildConfig {
            id,
            world: world.to_owned(),
            channel: format!("levels-{}", id),
            min_level,
            simple_messages: simple,
        }
    }

    fn announcer(guilds: Vec<GuildConfig>) -> Announcer {
        let config = AppConfig { guilds, ..AppConfig::default() };
        Announcer::new(config, Selector::new(Arc::new(RecencyTracker::default())))
    }

    fn level_up(level: u32) -> TrackerEvent {
        TrackerEvent::LevelUp { character: knight(level), level }
    }

    fn death(level: u32, levels_lost: u32, killers: &[(&str, bool)]) -> TrackerEvent {
        TrackerEvent::Death {
            character: knight(level),
            level,
            levels_lost,
            killers: killers
                .iter()
                .map(|(name, player)| Killer { name: (*name).to_owned(), player: *player })
                .collect(),
        }
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(11)
    }

    #[test]
    fn simple_level_up_message() {
        let a = announcer(vec![guild(1, "Gladera", None, true)]);
        let out = a.announce(&level_up(120), &mut rng());
        assert_eq!(
            out,
            vec![Announcement {
                guild_id: 1,
                channel:  "levels-1".to_owned(),
                kind:     AnnouncementKind::LevelUp,
                content:  "🌟 **Galarzaa Fidera** advanced to level 120.".to_owned(),
            }]
        );
    }

    #[test]
    fn simple_death_messages_by_kind() {
        let a = announcer(vec![guild(1, "Gladera", None, true)]);
        let out = a.announce(&death(120, 1, &[("a dragon lord", false)]), &mut rng());
        assert_eq!(out[0].kind, AnnouncementKind::Death);
        assert_eq!(out[0].content, "☠ **Galarzaa Fidera** (120) died to a **dragon lord**.");

        let out = a.announce(&death(120, 1, &[("Bubble", true)]), &mut rng());
        assert_eq!(out[0].kind, AnnouncementKind::PvpDeath);
        assert_eq!(out[0].content, "💀 **Galarzaa Fidera** (120) was killed by **Bubble**.");
    }

    #[test]
    fn only_guilds_on_the_world_above_their_minimum() {
        let a = announcer(vec![
            guild(1, "Gladera", None, true),
            guild(2, "Gladera", Some(200), true),
            guild(3, "Antica", None, true),
        ]);
        let ids: Vec<u64> = a.announce(&level_up(120), &mut rng()).iter().map(|x| x.guild_id).collect();
        assert_eq!(ids, vec![1]);
        assert!(a.announce(&level_up(20), &mut rng()).is_empty());
    }

    #[test]
    fn arena_deaths_without_loss_are_skipped() {
        let a = announcer(vec![guild(1, "Gladera", None, true)]);
        assert!(a.announce(&death(120, 0, &[("a pit demon", false)]), &mut rng()).is_empty());
        assert!(a.announce(&death(120, 0, &[("fire", false)]), &mut rng()).is_empty());
        assert_eq!(a.announce(&death(120, 1, &[("fire", false)]), &mut rng()).len(), 1);
        assert_eq!(a.announce(&death(120, 0, &[("a dragon", false)]), &mut rng()).len(), 1);
    }

    #[test]
    fn unusable_event_produces_nothing() {
        let a = announcer(vec![guild(1, "Gladera", None, false)]);
        assert!(a.announce(&death(120, 1, &[]), &mut rng()).is_empty());
    }

    #[test]
    fn flavor_text_is_formatted_and_remembered() {
        let a = announcer(vec![guild(1, "Gladera", None, false)]);
        let mut rng = rng();
        for level in [35, 100, 250] {
            let out = a.announce(&level_up(level), &mut rng);
            assert_eq!(out.len(), 1);
            let content = &out[0].content;
            assert!(content.starts_with("🌟 "), "{}", content);
            assert!(!content.contains('{') && !content.contains('^'), "{}", content);
            let first = content.trim_start_matches("🌟 ").chars().next().unwrap();
            assert!(!first.is_lowercase(), "{}", content);
        }
        assert_eq!(a.selector().recent().snapshot().len(), 3);
    }

    #[tokio::test]
    async fn run_forwards_announcements() {
        let (event_tx, event_rx) = mpsc::channel(8);
        let (out_tx, mut out_rx) = mpsc::channel(8);
        event_tx.send(level_up(120)).await.unwrap();
        event_tx.send(level_up(10)).await.unwrap();
        drop(event_tx);

        run(event_rx, out_tx, announcer(vec![guild(4, "Gladera", None, true)])).await.unwrap();
        let first = out_rx.recv().await.unwrap();
        assert_eq!(first.guild_id, 4);
        assert!(out_rx.recv().await.is_none());
    }
}
