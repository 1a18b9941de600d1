/// Condition model: the data bundle describing one level-up or death.
///
/// A `Condition` is what template predicates and placeholder resolution read.
/// It is a tagged union over the three announcement kinds; every derived
/// value (killer article, pronouns, base vocation) is a free function over
/// the union so a template can never reach a field its kind does not carry.
///
/// Death-only accessors fail with `MessageError::MissingField` when handed a
/// level-up condition.
use super::{MessageError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Killer names the feed reports for environmental damage. They never take an
/// indefinite article ("died to fire", not "died to a fire").
pub const ELEMENTAL_KILLERS: &[&str] = &["death", "energy", "earth", "fire", "ice", "holy", "drowning"];

// ---------------------------------------------------------------------------
// Character
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

/// Promoted vocations collapse to their base for template filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseVocation {
    None,
    Knight,
    Paladin,
    Druid,
    Sorcerer,
}

impl BaseVocation {
    pub fn is_mage(self) -> bool {
        matches!(self, BaseVocation::Druid | BaseVocation::Sorcerer)
    }
}

impl FromStr for BaseVocation {
    type Err = MessageError;

    /// Accepts the long names plus the nicknames players actually type.
    fn from_str(s: &str) -> Result<Self> {
        let voc = s.trim().to_lowercase();
        match voc.as_str() {
            "knight" | "elite knight" | "ek" | "k" | "kina" | "eliteknight" | "elite" => {
                Ok(BaseVocation::Knight)
            }
            "paladin" | "royal paladin" | "rp" | "p" | "pally" | "royalpaladin" | "royalpally" => {
                Ok(BaseVocation::Paladin)
            }
            "druid" | "elder druid" | "ed" | "d" | "elderdruid" | "elder" => Ok(BaseVocation::Druid),
            "sorcerer" | "master sorcerer" | "ms" | "s" | "sorc" | "mastersorcerer" | "master" => {
                Ok(BaseVocation::Sorcerer)
            }
            "no vocation" | "no voc" | "novoc" | "nv" | "n v" | "none" | "no" | "n" | "noob" | "rook"
            | "rookie" => Ok(BaseVocation::None),
            _ => Err(MessageError::UnknownVocation(s.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Vocation {
    None,
    Knight,
    EliteKnight,
    Paladin,
    RoyalPaladin,
    Druid,
    ElderDruid,
    Sorcerer,
    MasterSorcerer,
}

impl Vocation {
    pub fn base(self) -> BaseVocation {
        match self {
            Vocation::None                                => BaseVocation::None,
            Vocation::Knight   | Vocation::EliteKnight    => BaseVocation::Knight,
            Vocation::Paladin  | Vocation::RoyalPaladin   => BaseVocation::Paladin,
            Vocation::Druid    | Vocation::ElderDruid     => BaseVocation::Druid,
            Vocation::Sorcerer | Vocation::MasterSorcerer => BaseVocation::Sorcerer,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Vocation::None           => "None",
            Vocation::Knight         => "Knight",
            Vocation::EliteKnight    => "Elite Knight",
            Vocation::Paladin        => "Paladin",
            Vocation::RoyalPaladin   => "Royal Paladin",
            Vocation::Druid          => "Druid",
            Vocation::ElderDruid     => "Elder Druid",
            Vocation::Sorcerer       => "Sorcerer",
            Vocation::MasterSorcerer => "Master Sorcerer",
        }
    }
}

impl fmt::Display for Vocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Vocation {
    type Err = MessageError;

    fn from_str(s: &str) -> Result<Self> {
        let voc = s.trim().to_lowercase();
        Ok(match voc.as_str() {
            "elite knight"    => Vocation::EliteKnight,
            "royal paladin"   => Vocation::RoyalPaladin,
            "elder druid"     => Vocation::ElderDruid,
            "master sorcerer" => Vocation::MasterSorcerer,
            _ => match voc.parse::<BaseVocation>()? {
                BaseVocation::None     => Vocation::None,
                BaseVocation::Knight   => Vocation::Knight,
                BaseVocation::Paladin  => Vocation::Paladin,
                BaseVocation::Druid    => Vocation::Druid,
                BaseVocation::Sorcerer => Vocation::Sorcerer,
            },
        })
    }
}

impl TryFrom<String> for Vocation {
    type Error = MessageError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Vocation> for String {
    fn from(value: Vocation) -> Self {
        value.as_str().to_owned()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub name:     String,
    pub level:    u32,
    pub vocation: Vocation,
    pub sex:      Sex,
    #[serde(default)]
    pub world:    String,
}

/// One entry of a death's killer list, as reported by the character page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Killer {
    pub name:   String,
    #[serde(default)]
    pub player: bool,
}

// ---------------------------------------------------------------------------
// Condition
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelUp {
    pub character: Character,
    /// Minimum level the guild announces; only read by predicates.
    pub min_level: u32,
    pub level:     u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Death {
    pub character:   Character,
    pub min_level:   u32,
    pub level:       u32,
    pub levels_lost: u32,
    /// Killer name as reported, article included ("a dragon").
    pub killer:      String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    LevelUp(LevelUp),
    MonsterDeath(Death),
    PlayerDeath(Death),
}

impl Condition {
    pub fn level_up(character: Character, min_level: u32, level: u32) -> Result<Self> {
        if level == 0 {
            return Err(MessageError::MissingField { field: "level", kind: "level-up" });
        }
        Ok(Condition::LevelUp(LevelUp { character, min_level, level }))
    }

    /// Builds a death condition from the full killer list.
    ///
    /// The announced killer is the first one that is not the victim (players
    /// can be listed among their own killers), falling back to the first
    /// killer. The death counts as PvP when that killer is a player.
    pub fn death(
        character:   Character,
        min_level:   u32,
        level:       u32,
        levels_lost: u32,
        killers:     &[Killer],
    ) -> Result<Self> {
        if level == 0 {
            return Err(MessageError::MissingField { field: "level", kind: "death" });
        }
        let first = killers.first().ok_or(MessageError::NoKiller)?;
        let killer = if killers.len() == 1 {
            first
        } else {
            killers.iter().find(|k| k.name != character.name).unwrap_or(first)
        };
        let death = Death { character, min_level, level, levels_lost, killer: killer.name.clone() };
        Ok(if killer.player { Condition::PlayerDeath(death) } else { Condition::MonsterDeath(death) })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Condition::LevelUp(_)      => "level-up",
            Condition::MonsterDeath(_) => "monster death",
            Condition::PlayerDeath(_)  => "player death",
        }
    }

    fn death_info(&self, field: &'static str) -> Result<&Death> {
        match self {
            Condition::MonsterDeath(d) | Condition::PlayerDeath(d) => Ok(d),
            Condition::LevelUp(_) => Err(MessageError::MissingField { field, kind: self.kind() }),
        }
    }
}

// ---------------------------------------------------------------------------
// Derived accessors
// ---------------------------------------------------------------------------

pub fn character(c: &Condition) -> &Character {
    match c {
        Condition::LevelUp(l) => &l.character,
        Condition::MonsterDeath(d) | Condition::PlayerDeath(d) => &d.character,
    }
}

/// The announced level: the new level for level-ups, the death level otherwise.
pub fn level(c: &Condition) -> u32 {
    match c {
        Condition::LevelUp(l) => l.level,
        Condition::MonsterDeath(d) | Condition::PlayerDeath(d) => d.level,
    }
}

pub fn min_level(c: &Condition) -> u32 {
    match c {
        Condition::LevelUp(l) => l.min_level,
        Condition::MonsterDeath(d) | Condition::PlayerDeath(d) => d.min_level,
    }
}

pub fn base_vocation(c: &Condition) -> BaseVocation {
    character(c).vocation.base()
}

pub fn levels_lost(c: &Condition) -> Result<u32> {
    Ok(c.death_info("levels_lost")?.levels_lost)
}

/// Killer name without its leading article ("a dragon" -> "dragon").
pub fn killer(c: &Condition) -> Result<&str> {
    let death = c.death_info("killer")?;
    Ok(split_article(&death.killer).1)
}

/// Indefinite article to print before the killer, trailing space included.
///
/// An article in the reported name wins. Players, capitalized names (bosses)
/// and elemental damage get none; anything else falls back to a vowel check.
/// This is a heuristic, not grammar.
pub fn killer_article(c: &Condition) -> Result<&'static str> {
    let death = c.death_info("killer_article")?;
    if matches!(c, Condition::PlayerDeath(_)) {
        return Ok("");
    }
    let (article, name) = split_article(&death.killer);
    if let Some(article) = article {
        return Ok(article);
    }
    let Some(first) = name.chars().next() else {
        return Ok("");
    };
    if first.is_uppercase() || ELEMENTAL_KILLERS.contains(&name) {
        return Ok("");
    }
    Ok(if "aeiou".contains(first.to_ascii_lowercase()) { "an " } else { "a " })
}

fn split_article(raw: &str) -> (Option<&'static str>, &str) {
    match raw.split_once(' ') {
        Some(("a", rest)) if !rest.is_empty()  => (Some("a "), rest),
        Some(("an", rest)) if !rest.is_empty() => (Some("an "), rest),
        _ => (None, raw),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pronouns {
    pub he_she:  &'static str,
    pub his_her: &'static str,
    pub him_her: &'static str,
}

pub fn pronouns(c: &Condition) -> Pronouns {
    match character(c).sex {
        Sex::Male   => Pronouns { he_she: "he",  his_her: "his", him_her: "him" },
        Sex::Female => Pronouns { he_she: "she", his_her: "her", him_her: "her" },
    }
}
