// Player identity normalization: canonical name and team keys so records
// from independently-sourced tables can be joined.

use std::fmt;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Generational suffixes folded out of a name ("Jr.", "Sr", "II", ...).
const NAME_SUFFIXES: &[&str] = &["jr", "sr", "ii", "iii", "iv"];

// ---------------------------------------------------------------------------
// PlayerKey
// ---------------------------------------------------------------------------

/// Canonical (name, team) identity used as the join key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlayerKey {
    pub name: String,
    pub team: String,
}

impl PlayerKey {
    /// Build a key from raw display strings.
    pub fn new(name: &str, team: &str) -> Self {
        PlayerKey {
            name: normalize_name(name),
            team: normalize_team(team),
        }
    }
}

impl fmt::Display for PlayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.team)
    }
}

// ---------------------------------------------------------------------------
// Names
// ---------------------------------------------------------------------------

/// Canonical form of a player name.
///
/// Lowercases, strips diacritics, drops punctuation, folds generational
/// suffixes, and collapses whitespace. The result is a fixed point:
/// `normalize_name(&normalize_name(s)) == normalize_name(s)`.
pub fn normalize_name(raw: &str) -> String {
    let lowered = raw.to_lowercase();

    let mut folded = String::with_capacity(lowered.len());
    for c in lowered.nfd().filter(|c| !is_combining_mark(*c)) {
        match fold_letter(c) {
            Some(replacement) => folded.push_str(replacement),
            None if c.is_alphanumeric() => folded.extend(c.to_lowercase()),
            None if c.is_whitespace() || c == '-' || c == '_' => folded.push(' '),
            None => {}
        }
    }

    let mut tokens: Vec<&str> = folded.split_whitespace().collect();
    while tokens.len() > 1 && tokens.last().is_some_and(|t| NAME_SUFFIXES.contains(t)) {
        tokens.pop();
    }
    tokens.join(" ")
}

/// Latin letters with no canonical decomposition.
fn fold_letter(c: char) -> Option<&'static str> {
    match c {
        'ø' => Some("o"),
        'ł' => Some("l"),
        'đ' => Some("d"),
        'ß' => Some("ss"),
        'æ' => Some("ae"),
        'œ' => Some("oe"),
        'ı' => Some("i"),
        'þ' => Some("th"),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

/// Canonical 2-3 letter code for a professional team.
///
/// Known aliases map to one code; unknown values pass through lowercased
/// and trimmed. Idempotent.
pub fn normalize_team(raw: &str) -> String {
    let cleaned = raw.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
    match canonical_team(&cleaned) {
        Some(code) => code.to_string(),
        None => cleaned,
    }
}

/// Alias table: codes, city names, nicknames and full franchise names.
/// Every canonical code also maps to itself.
fn canonical_team(alias: &str) -> Option<&'static str> {
    let code = match alias {
        "ari" | "az" | "arizona" | "diamondbacks" | "d-backs" | "dbacks"
        | "arizona diamondbacks" => "ari",
        "atl" | "atlanta" | "braves" | "atlanta braves" => "atl",
        "bal" | "baltimore" | "orioles" | "baltimore orioles" => "bal",
        "bos" | "boston" | "red sox" | "redsox" | "boston red sox" => "bos",
        "chc" | "chi" | "cubs" | "chicago cubs" => "chc",
        "cws" | "chw" | "white sox" | "whitesox" | "chicago white sox" => "cws",
        "cin" | "cincinnati" | "reds" | "cincinnati reds" => "cin",
        "cle" | "cleveland" | "guardians" | "indians" | "cleveland guardians" => "cle",
        "col" | "colorado" | "rockies" | "colorado rockies" => "col",
        "det" | "detroit" | "tigers" | "detroit tigers" => "det",
        "hou" | "houston" | "astros" | "houston astros" => "hou",
        "kc" | "kcr" | "kansas city" | "royals" | "kansas city royals" => "kcr",
        "laa" | "ana" | "angels" | "los angeles angels" => "ana",
        "lad" | "la" | "dodgers" | "los angeles dodgers" => "lad",
        "mia" | "fla" | "miami" | "marlins" | "miami marlins" => "mia",
        "mil" | "milwaukee" | "brewers" | "milwaukee brewers" => "mil",
        "min" | "minnesota" | "twins" | "minnesota twins" => "min",
        "nyy" | "yankees" | "new york yankees" => "nyy",
        "nym" | "mets" | "new york mets" => "nym",
        "oak" | "ath" | "oakland" | "athletics" | "a's" | "as" | "oakland athletics" => "oak",
        "phi" | "philadelphia" | "phillies" | "philadelphia phillies" => "phi",
        "pit" | "pittsburgh" | "pirates" | "pittsburgh pirates" => "pit",
        "sd" | "sdp" | "sdg" | "san diego" | "padres" | "san diego padres" => "sdg",
        "sea" | "seattle" | "mariners" | "seattle mariners" => "sea",
        "sf" | "sfg" | "san francisco" | "giants" | "san francisco giants" => "sf",
        "stl" | "st. louis" | "st louis" | "cardinals" | "cards" | "st. louis cardinals"
        | "st louis cardinals" => "stl",
        "tb" | "tbr" | "tampa bay" | "rays" | "tampa bay rays" => "tb",
        "tex" | "texas" | "rangers" | "texas rangers" => "tex",
        "tor" | "toronto" | "blue jays" | "bluejays" | "toronto blue jays" => "tor",
        "wsh" | "was" | "wsn" | "washington" | "nationals" | "washington nationals" => "wsh",
        _ => return None,
    };
    Some(code)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
