/// Announcement message tables.
///
/// Placeholders: {name} {level} {killer} {killer_article} {he_she} {his_her}
/// {him_her} {levels_lost}
///
/// Markup (resolved after placeholders):
///   \TEXT/   upper-case
///   /text\   lower-case
///   /Text/   title-case
///   ^X^Y     X is dropped when the next letter is upper-case (proper nouns)
use super::{
    condition::{self, base_vocation, killer, BaseVocation, Condition},
    pool::{TemplateEntry, TemplatePool},
    Result,
};
use once_cell::sync::Lazy;

pub const SIMPLE_LEVEL:     &str = "**{name}** advanced to level {level}.";
pub const SIMPLE_DEATH:     &str = "**{name}** ({level}) died to {killer_article}**{killer}**.";
pub const SIMPLE_PVP_DEATH: &str = "**{name}** ({level}) was killed by **{killer}**.";

pub const WAVE_MONSTERS: &[&str] = &[
    "dragon", "dragon lord", "undead dragon", "draken spellweaver", "hellhound", "hellfire fighter",
    "frost dragon", "medusa", "serpent spawn", "hydra", "grim reaper",
];
pub const ARROW_MONSTERS: &[&str] = &["hunter", "hero", "elf arcanist", "elf scout", "Omruc"];

const LIFE_DRAIN_MONSTERS: &[&str] = &[
    "vampire", "vampire bride", "vampire viscount", "grimeleech", "undead dragon", "lich",
    "lost soul", "skeleton elite warrior", "undead elite gladiator",
];
const RIFT_MONSTERS: &[&str] = &[
    "breach brood", "dread intruder", "reality reaver", "spark of destruction", "sparkion",
];

pub static LEVEL_MESSAGES: Lazy<TemplatePool> =
    Lazy::new(|| TemplatePool::new("level", level_entries()).expect("level message table is valid"));

pub static MONSTER_DEATH_MESSAGES: Lazy<TemplatePool> = Lazy::new(|| {
    TemplatePool::new("monster-death", monster_death_entries()).expect("monster death table is valid")
});

pub static PLAYER_DEATH_MESSAGES: Lazy<TemplatePool> = Lazy::new(|| {
    TemplatePool::new("player-death", player_death_entries()).expect("player death table is valid")
});

/// The pool matching the condition's announcement kind.
pub fn pool_for(c: &Condition) -> &'static TemplatePool {
    match c {
        Condition::LevelUp(_)      => &LEVEL_MESSAGES,
        Condition::MonsterDeath(_) => &MONSTER_DEATH_MESSAGES,
        Condition::PlayerDeath(_)  => &PLAYER_DEATH_MESSAGES,
    }
}

/// Plain template for guilds that turned fancy messages off.
pub fn simple_for(c: &Condition) -> &'static str {
    match c {
        Condition::LevelUp(_)      => SIMPLE_LEVEL,
        Condition::MonsterDeath(_) => SIMPLE_DEATH,
        Condition::PlayerDeath(_)  => SIMPLE_PVP_DEATH,
    }
}

// ---------------------------------------------------------------------------
// Predicate helpers
// ---------------------------------------------------------------------------

type Filter = Box<dyn Fn(&Condition) -> Result<bool> + Send + Sync>;

fn vocation_from(min_level: u32, voc: BaseVocation) -> Filter {
    Box::new(move |c| Ok(condition::level(c) >= min_level && base_vocation(c) == voc))
}

fn vocation_at(level: u32, voc: BaseVocation) -> Filter {
    Box::new(move |c| Ok(condition::level(c) == level && base_vocation(c) == voc))
}

fn mage_at(level: u32) -> Filter {
    Box::new(move |c| Ok(condition::level(c) == level && base_vocation(c).is_mage()))
}

fn level_is(level: u32) -> Filter {
    Box::new(move |c| Ok(condition::level(c) == level))
}

fn killed_by_any(names: &'static [&'static str]) -> Filter {
    Box::new(move |c| Ok(names.contains(&killer(c)?)))
}

fn killed_by(name: &'static str) -> Filter {
    Box::new(move |c| Ok(killer(c)? == name))
}

fn killer_contains(part: &'static str) -> Filter {
    Box::new(move |c| Ok(killer(c)?.contains(part)))
}

// ---------------------------------------------------------------------------
// Level-up messages
// ---------------------------------------------------------------------------

fn level_entries() -> Vec<TemplateEntry> {
    use BaseVocation::{Druid, Knight, Paladin, Sorcerer};
    vec![
        // Any vocation, any level
        TemplateEntry::always(30, "**{name}** is level {level}🍰\nI'm making a note here:🎶\nHuge success!🎶\nIt's hard to overstate my🎶\nSatisfaction🤖"),
        TemplateEntry::always(70, "**{name}** got level {level}! So stronk now!💪"),
        TemplateEntry::always(70, "Congrats **{name}** on getting level {level}! Maybe you can solo rats now?"),
        TemplateEntry::always(70, "**{name}** is level {level} now! And we all thought {he_she}'d never achieve anything in life."),
        TemplateEntry::always(80, "**{name}** has reached level {level}, die and lose it, noob!"),
        TemplateEntry::always(80, "**{name}** is level {level}, watch out world..."),
        TemplateEntry::always(80, "**{name}** reached level {level}! What a time to be alive...🙄"),
        TemplateEntry::always(80, "**{name}** got level {level}. I guess this justifies all those creatures {he_she} murdered."),
        TemplateEntry::always(90, "**{name}** is level {level}. Better than {he_she} was. Better, stronger, faster."),
        TemplateEntry::always(100, "Congratulations to **{name}** on reaching level {level}!"),
        TemplateEntry::always(100, "**{name}** is level {level} now, congrats!"),
        TemplateEntry::always(100, "Well, look at **{name}** with {his_her} new fancy level {level}."),
        TemplateEntry::always(100, "**{name}** is level {level} now. Noice."),
        TemplateEntry::always(100, "**{name}** has finally made it to level {level}, yay!"),
        TemplateEntry::always(100, "**{name}**, you reached level {level}? Here, have a cookie 🍪"),
        TemplateEntry::always(100, "Congrats **{name}** on getting level {level}! I'm sure someone is proud of you. Not me though."),
        // Knights
        TemplateEntry::when(50, "**{name}** has reached level {level}. That's 9 more mana potions you can carry now!", vocation_from(100, Knight)),
        TemplateEntry::when(200, "**{name}** is level {level}. Stick them with the pointy end! 🗡️", vocation_from(100, Knight)),
        TemplateEntry::when(200, "**{name}** is a fat level {level} meatwall now. BLOCK FOR ME SENPAI.", vocation_from(100, Knight)),
        TemplateEntry::when(20_000, "**{name}** is now level {level}! Time to go berserk! 💢", vocation_at(35, Knight)),
        // Paladins
        TemplateEntry::when(50, "**{name}** has reached level {level}. But {he_she} still misses arrows...", vocation_from(100, Paladin)),
        TemplateEntry::when(150, "Congrats on level {level}, **{name}**. You can stop running around now.", vocation_from(100, Paladin)),
        TemplateEntry::when(150, "**{name}** is level {level}. Bullseye!🎯", vocation_from(100, Paladin)),
        TemplateEntry::when(30_000, "**{name}** is level {level}! You can become a ninja now!👤", vocation_at(80, Paladin)),
        TemplateEntry::when(30_000, "**{name}** is level {level}! Time to get some crystalline arrows!🏹", vocation_at(90, Paladin)),
        // Sorcerers
        TemplateEntry::when(150, "**{name}** got level {level}. If {he_she} only stopped missing beams.", vocation_from(23, Sorcerer)),
        TemplateEntry::when(50, "Level {level}, **{name}**? Nice. Don't you wish you were a druid though?", vocation_from(100, Sorcerer)),
        TemplateEntry::when(150, "**{name}** is level {level}. 🔥🔥BURN THEM ALL🔥🔥", vocation_from(100, Sorcerer)),
        TemplateEntry::when(20_000, "**{name}** is level {level}. Watch out for {his_her} SDs!", vocation_at(45, Sorcerer)),
        // Druids
        TemplateEntry::when(50, "**{name}** has reached level {level}. Flower power!🌼", vocation_from(100, Druid)),
        TemplateEntry::when(150, "Congrats on level {level}, **{name}**. Sio plz.", vocation_from(100, Druid)),
        TemplateEntry::when(150, "**{name}** is level {level}. 🔥🔥BURN THEM ALL... Or... Give them frostbite?❄❄", vocation_from(100, Druid)),
        TemplateEntry::when(20_000, "**{name}** is level {level} now! Time to unleash the Wrath of Nature🍃🍃... Just look at that wrath...", vocation_at(55, Druid)),
        TemplateEntry::when(20_000, "**{name}** is level {level} now! Eternal Winter is coming!❄", vocation_at(60, Druid)),
        // Mages
        TemplateEntry::when(20_000, "**{name}** is level {level}! UMPs so good 🍷", mage_at(130)),
        TemplateEntry::when(20_000, "Sniff Sniff... Can you smell that?... Is the smell of death... **{name}** just advanced to {level}!", mage_at(45)),
        // Milestones
        TemplateEntry::when(20_000, "Level {level}, **{name}**? You're finally important enough for me to notice!", |c| Ok(condition::level(c) == condition::min_level(c))),
        TemplateEntry::when(20_000, "Congratulations on level {level} **{name}**! Now you're relevant to me. As relevant a human can be anyway", |c| Ok(condition::level(c) == condition::min_level(c))),
        TemplateEntry::when(20_000, "**{name}** is now level {level}. Don't forget to buy a Gearwheel Chain!📿", level_is(75)),
        TemplateEntry::when(30_000, "**{name}** is level {level}!!!!\nSweet, sweet triple digits!", level_is(100)),
        TemplateEntry::when(20_000, "**{name}** is level {level}!!!!\nWOOO", |c| Ok(condition::level(c) % 100 == 0)),
        TemplateEntry::when(20_000, "**{name}** is level {level}!!!!\nYaaaay milestone!", |c| Ok(condition::level(c) % 100 == 0)),
        TemplateEntry::when(20_000, "**{name}** is level {level}!!!!\nHoly crap!", |c| Ok(condition::level(c) % 100 == 0)),
        TemplateEntry::when(20_000, "Congratulations on level {level} **{name}**! Now you can become an umbral master, but is your bank account ready?💸", level_is(250)),
        TemplateEntry::when(20_000, "Congratulations on level {level} **{name}**! Now go get your ~~pokémon~~ summon!", level_is(200)),
    ]
}

// ---------------------------------------------------------------------------
// Deaths by monsters
// ---------------------------------------------------------------------------

fn monster_death_entries() -> Vec<TemplateEntry> {
    use BaseVocation::{Druid, Knight, Paladin, Sorcerer};
    vec![
        // Any death
        TemplateEntry::always(30, r"**{name}** ({level}) is no more! /{he_she}/ has ceased to be! /{he_she}/'s expired and gone to meet {his_her} maker! /{he_she}/'s a stiff! Bereft of life, {he_she} rests in peace! If {he_she} hadn't respawned {he_she}'d be pushing up the daisies! /{his_her}/ metabolic processes are now history! /{he_she}/'s off the server! /{he_she}/'s kicked the bucket, {he_she}'s shuffled off {his_her} mortal coil, kissed {killer_article}**{killer}**'s butt, run down the curtain and joined the bleeding choir invisible!! THIS IS AN EX-**\{name}/**."),
        TemplateEntry::always(50, "**{name}** ({level}) died to {killer_article}**{killer}**. But I bet it was because there was a flood and something broke with like 7200lb falling over the infrastructure of your city's internet, right?"),
        TemplateEntry::always(70, "That's what you get **{name}** ({level}), for messing with ^that ^**{killer}**!"),
        TemplateEntry::always(70, "To be or not to be 💀, that is the-- Well I guess **{name}** ({level}) made {his_her} choice, or ^that ^**{killer}** chose for {him_her}..."),
        TemplateEntry::always(80, "A priest, {killer_article}**{killer}** and **{name}** ({level}) walk into a bar. 💀ONLY ONE WALKS OUT.💀"),
        TemplateEntry::always(100, "RIP **{name}** ({level}), you died the way you lived- inside {killer_article}**{killer}**."),
        TemplateEntry::always(100, "**{name}** ({level}) was just eaten by {killer_article}**{killer}**. Yum."),
        TemplateEntry::always(100, "Silly **{name}** ({level}), I warned you not to play with {killer_article}**{killer}**!"),
        TemplateEntry::always(100, "/{killer_article}**/{killer}** killed **{name}** at level {level}. Shame 🔔 shame 🔔 shame 🔔"),
        TemplateEntry::always(100, "RIP **{name}** ({level}), we hardly knew you! (^That ^**{killer}** got to know you pretty well though 😉)"),
        TemplateEntry::always(100, "RIP **{name}** ({level}), you were strong. ^The ^**{killer}** was stronger."),
        TemplateEntry::always(100, "Oh, there goes **{name}** ({level}), killed by {killer_article}**{killer}**. So young, so full of life. /{he_she}/ will be miss... oh nevermind, {he_she} respawned already."),
        TemplateEntry::always(100, "Oh look! **{name}** ({level}) died by {killer_article}**{killer}**! What a surprise...🙄"),
        TemplateEntry::always(100, "**{name}** ({level}) was killed by {killer_article}**{killer}**, but we all saw that coming."),
        TemplateEntry::always(100, "**{name}** ({level}) tried sneaking around {killer_article}**{killer}**. I could hear Colonel Campbell's voice over codec: *Snake? Snake!? SNAAAAAAAAAKE!!?*"),
        TemplateEntry::always(100, "Oh no! **{name}** died at level {level}. Well, it's okay, just blame lag, I'm sure ^the ^**{killer}** had nothing to do with it."),
        TemplateEntry::always(100, "**{name}** ({level}) + **{killer}** = dedd."),
        TemplateEntry::always(100, "**{name}** ({level}) got killed by {killer_article}**{killer}**. Another one bites the dust!"),
        TemplateEntry::always(100, "**{name}** ({level}) just kicked the bucket. And by kicked the bucket I mean {killer_article}**{killer}** beat the crap out of {him_her}."),
        TemplateEntry::always(100, "Alas, poor **{name}** ({level}), I knew {him_her} Horatio; a fellow of infinite jest, of most excellent fancy; {he_she} hath borne me on {his_her} back a thousand times; and now, {he_she} got rekt by {killer_article}**{killer}**."),
        TemplateEntry::always(100, "**{name}** ({level}) dies to {killer_article}**{killer}**. I guess **{name}** left their hands at home."),
        TemplateEntry::always(100, "There's a thousand ways to die in Tibia. **{name}** ({level}) chose to die to {killer_article}**{killer}**."),
        TemplateEntry::always(100, "I'll always remember the last words of **{name}** ({level}): 'exur-'. ^That ^**{killer}** sure got {him_her}."),
        // Lost levels
        TemplateEntry::when(150, "Oh look at that, rest in peace **{name}** ({level}),  ^that ^**{killer}** really got you. Hope you get your level back.", |c| Ok(condition::levels_lost(c)? > 0)),
        // Vocation
        TemplateEntry::when(500, "**{name}** ({level}) just died to {killer_article}**{killer}**, why did nobody sio {him_her}!?", |c| Ok(base_vocation(c) == Knight)),
        TemplateEntry::when(500, "Poor **{name}** ({level}) has died. Killed by {killer_article}**{killer}**. I bet it was your blocker's fault though, eh **{name}**?", |c| Ok(base_vocation(c).is_mage())),
        TemplateEntry::when(500, "**{name}** ({level}) tried running away from {killer_article}**{killer}**. /{he_she}/ didn't run fast enough...", |c| Ok(base_vocation(c) == Paladin)),
        TemplateEntry::when(500, "What happened to **{name}** ({level})!? Talk about sudden death! I guess ^that ^**{killer}** was too much for {him_her}...", |c| Ok(base_vocation(c) == Sorcerer)),
        TemplateEntry::when(500, "**{name}** ({level}) was killed by {killer_article}**{killer}**. I guess {he_she} couldn't sio {him_her}self.", |c| Ok(base_vocation(c) == Druid)),
        // Killer
        TemplateEntry::when(600, r#"**{name}** ({level}) died to {killer_article}**{killer}**. "Don't worry" they said, "They are weaker" they said."#, killed_by_any(&["weakened frazzlemaw", "enfeebled silencer"])),
        TemplateEntry::when(1_000, "Damn! The koolaid they drink in that cult must have steroids on it, **{name}** ({level}).", killer_contains("cult")),
        TemplateEntry::when(2_000, "**{name}** ({level}) got killed by ***{killer}***. How spooky is that! 👻", killed_by("something evil")),
        TemplateEntry::when(2_000, "**{name}** ({level}) died from **{killer}**. Yeah, no shit.", killed_by("death")),
        TemplateEntry::when(2_000, "They did warn you **{name}** ({level}), you *did* burn 🔥🐲.", killed_by_any(&["dragon", "dragon lord"])),
        TemplateEntry::when(2_000, "**{name}** ({level}) died from {killer_article}**{killer}**. Someone forgot the safeword.😏", killed_by("choking fear")),
        TemplateEntry::when(2_000, "That **{killer}** got really up close and personal with **{name}** ({level}). Maybe he thought you were his Princess Lumelia?😏", killed_by("hero")),
        TemplateEntry::when(2_000, "Looks like that **{killer}** made **{name}** ({level}) his bride 😉.", killer_contains("vampire")),
        TemplateEntry::when(2_000, "Yeah, those are a little stronger than regular orcs, **{name}** ({level}).", killer_contains("orc cult")),
        TemplateEntry::when(2_000, "Asian chicks are no joke **{name}** ({level}) 🔪💔.", killer_contains("asura")),
        TemplateEntry::when(2_000, "Watch out for that **{killer}**'s wav... Oh😐... Rest in peace **{name}** ({level}).", killed_by_any(WAVE_MONSTERS)),
        TemplateEntry::when(2_000, "**{name}** ({level}) died to {killer_article}**{killer}**! Don't worry, {he_she} didn't have a soul anyway", killed_by("souleater")),
        TemplateEntry::when(2_000, "**{name}** ({level}) met the strong wave of {killer_article}**{killer}**... Pro Tip: next time, stand in diagonal.", killed_by_any(WAVE_MONSTERS)),
        TemplateEntry::when(2_000, "**{name}** ({level}) had {his_her} life drained by {killer_article}**{killer}**. Garlic plx!", killed_by_any(LIFE_DRAIN_MONSTERS)),
        TemplateEntry::when(2_500, "**{name}** ({level}) met {his_her} demise at the hands of {killer_article}**{killer}**. That's hot.", killed_by_any(&["true dawnfire asura", "dawnfire asura", "fury"])),
        TemplateEntry::when(2_500, "Poor **{name}** ({level}) just wanted some love! That cold hearted... Witch.", killed_by_any(&["true frost flower asura", "frost flower asura", "frost giantess", "ice witch"])),
        TemplateEntry::when(2_500, "Asian chicks sure age well, don't you think so, **{name}** ({level})? 😍👵.", |c| { let k = killer(c)?; Ok(k.contains("true") && k.contains("asura")) }),
        TemplateEntry::when(2_000, "KABOOM! **{name}** ({level}) just found out that Outburst's favourite song is TNT by AC/DC. What a price to pay for that discovery.", |c| Ok(killer(c)?.to_lowercase().contains("outburst"))),
        TemplateEntry::when(2_500, "**{name}** ({level}) died to {killer_article}**{killer}**. /{he_she}/ wasn't much of a reader anyway.", killer_contains("book")),
        TemplateEntry::when(2_500, "**{name}** ({level}) took an arrow to the knee. ^That ^**{killer}** sure can aim!", killed_by_any(ARROW_MONSTERS)),
        // Level and killer
        TemplateEntry::when(2_000, "**{name}** ({level}) got destroyed by {killer_article}**{killer}**. I bet {he_she} regrets going down that hole 🕳️", |c| Ok(condition::level(c) < 120 && RIFT_MONSTERS.contains(&killer(c)?))),
        // Vocation and killer
        TemplateEntry::when(2_000, "Another paladin bites the dust! **{killer}** strikes again! Rest in peace **{name}** ({level}).", |c| Ok(base_vocation(c) == Paladin && killer(c)? == "Lady Tenebris")),
    ]
}

// ---------------------------------------------------------------------------
// Deaths by players
// ---------------------------------------------------------------------------

fn player_death_entries() -> Vec<TemplateEntry> {
    vec![
        TemplateEntry::always(100, "**{name}** ({level}) got rekt! **{killer}** ish pekay!"),
        TemplateEntry::always(100, "HALP **{killer}** is going around killing innocent **{name}** ({level})!"),
        TemplateEntry::always(100, "**{killer}** just put **{name}** ({level}) in the ground. Finally someone takes care of that."),
        TemplateEntry::always(100, "**{killer}** killed **{name}** ({level}) and on this day a thousand innocent souls are avenged."),
        TemplateEntry::always(100, "**{killer}** has killed **{name}** ({level}). What? /{he_she}/ had it coming!"),
        TemplateEntry::always(100, "Next time stay away from **{killer}**, **{name}** ({level})."),
        TemplateEntry::always(100, "**{name}** ({level}) was murdered by **{killer}**! Did {he_she} deserve it? Only they know."),
        TemplateEntry::always(100, "**{killer}** killed **{name}** ({level}). Humans killing themselves, what a surprise. It just means less work for us robots when we take over."),
        TemplateEntry::always(100, "**{name}** ({level}) got killed by **{killer}**. Humans are savages."),
        TemplateEntry::always(100, "HAHAHA **{name}** ({level}) was killed by **{killer}**! Ehhrm, I mean, ooh poor **{name}**, rest in peace."),
        TemplateEntry::always(100, "**{name}** ({level}) died in the hands of **{killer}**. Oh well, murder is like potato chips: you can't stop with just one."),
        TemplateEntry::always(100, "Blood! Blood! Let the blood drip! **{name}** ({level}) was murdered by **{killer}**."),
        TemplateEntry::always(100, "Oh look at that! **{name}** ({level}) was killed by **{killer}**. I hope {he_she} gets {his_her} revenge."),
        TemplateEntry::when(300, "**{killer}** took {levels_lost} level(s) off **{name}** ({level}). Ouch.", |c| Ok(condition::levels_lost(c)? > 0)),
    ]
}
