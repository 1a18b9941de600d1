/// Parses the tracker feed into typed `TrackerEvent`s.
///
/// The scraping side writes one JSON object per line, tagged by "type":
///
///   {"type":"level_up","character":{...},"level":215}
///   {"type":"death","character":{...},"level":214,"levels_lost":1,
///    "killers":[{"name":"a dragon lord","player":false}]}
///
/// `character` is `{"name","level","vocation","sex","world"}`; vocation
/// accepts the display names and the usual nicknames.
///
/// Blank or malformed lines are skipped; one bad line must not stall the feed.
use crate::messages::condition::{Character, Killer};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{Receiver, Sender};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TrackerEvent {
    LevelUp {
        character: Character,
        level:     u32,
    },
    Death {
        character:   Character,
        level:       u32,
        #[serde(default)]
        levels_lost: u32,
        killers:     Vec<Killer>,
    },
}

impl TrackerEvent {
    pub fn character(&self) -> &Character {
        match self {
            Self::LevelUp { character, .. } => character,
            Self::Death   { character, .. } => character,
        }
    }

    /// Level the event is announced at.
    pub fn level(&self) -> u32 {
        match self {
            Self::LevelUp { level, .. } => *level,
            Self::Death   { level, .. } => *level,
        }
    }
}

pub fn parse_line(raw: &str) -> Option<TrackerEvent> {
    let line = raw.trim();
    if line.is_empty() {
        return None;
    }
    match serde_json::from_str(line) {
        Ok(event) => Some(event),
        Err(e) => {
            tracing::debug!("Skipping feed line ({}): {}", e, line);
            None
        }
    }
}

/// Async pipeline task: receive raw lines, parse, forward typed events.
pub async fn run(mut rx: Receiver<String>, tx: Sender<TrackerEvent>) -> Result<()> {
    while let Some(line) = rx.recv().await {
        if let Some(event) = parse_line(&line) {
            if tx.send(event).await.is_err() {
                break;
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
    use crate::messages::condition::{Sex, Vocation};
    use tokio::sync::mpsc;

    const LEVEL_LINE: &str = r#"{"type":"level_up","character":{"name":"Tschas","level":215,"vocation":"Elite Knight","sex":"male","world":"Gladera"},"level":215}"#;

    const DEATH_LINE: &str = r#"{"type":"death","character":{"name":"Nezune","level":300,"vocation":"ED","sex":"female","world":"Antica"},"level":301,"levels_lost":1,"killers":[{"name":"a dragon lord"},{"name":"Bubble","player":true}]}"#;

    #[test]
    fn parses_level_up() {
        let e = parse_line(LEVEL_LINE).expect("should parse");
        match e {
            TrackerEvent::LevelUp { character, level } => {
                assert_eq!(level, 215);
                assert_eq!(character.name, "Tschas");
                assert_eq!(character.vocation, Vocation::EliteKnight);
                assert_eq!(character.sex, Sex::Male);
            }
            other => panic!("Wrong variant: {:?}", other),
        }
    }

    #[test]
    fn parses_death() {
        let e = parse_line(DEATH_LINE).expect("should parse");
        assert_eq!(e.level(), 301);
        assert_eq!(e.character().world, "Antica");
        match e {
            TrackerEvent::Death { killers, levels_lost, character, .. } => {
                assert_eq!(levels_lost, 1);
                assert_eq!(character.vocation, Vocation::Druid);
                assert_eq!(killers.len(), 2);
                assert!(!killers[0].player);
                assert!(killers[1].player);
            }
            other => panic!("Wrong variant: {:?}", other),
        }
    }

    #[test]
    fn returns_none_for_garbage() {
        assert!(parse_line("not json").is_none());
        assert!(parse_line("").is_none());
        assert!(parse_line(r#"{"type":"login","name":"x"}"#).is_none());
        assert!(parse_line(&LEVEL_LINE.replace("Elite Knight", "Warlock")).is_none());
    }

    #[tokio::test]
    async fn run_forwards_only_valid_events() {
        let (raw_tx, raw_rx) = mpsc::channel(8);
        let (event_tx, mut event_rx) = mpsc::channel(8);
        raw_tx.send("garbage".to_owned()).await.unwrap();
        raw_tx.send(LEVEL_LINE.to_owned()).await.unwrap();
        drop(raw_tx);

        run(raw_rx, event_tx).await.unwrap();
        assert!(matches!(event_rx.recv().await, Some(TrackerEvent::LevelUp { .. })));
        assert!(event_rx.recv().await.is_none());
    }
}
