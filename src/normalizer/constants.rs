//! Curated translation and pattern tables for normalization. Kept minimal
//! per the original's own guidance: fuzzy matching and user aliases handle
//! the long tail, this table only carries what fuzzy matching can't.
//! Grounded on `teamarr/utilities/constants.py`.

/// City names whose transliteration via [`deunicode`] alone produces a
/// form the sports providers don't use (e.g. providers say "Munich", not
/// the deunicoded "Muenchen").
pub const CITY_TRANSLATIONS: &[(&str, &str)] = &[
    ("München", "Munich"),
    ("Köln", "Cologne"),
    ("Mailand", "Milan"),
    ("Neapel", "Naples"),
    ("Rom", "Rome"),
    ("Genua", "Genoa"),
    ("Turin", "Turin"),
    ("Florenz", "Florence"),
    ("Venedig", "Venice"),
    ("Warschau", "Warsaw"),
    ("Prag", "Prague"),
    ("Moskau", "Moscow"),
    ("Athen", "Athens"),
];

/// Upstream aggregator prefixes stripped before classification, longest
/// first so e.g. "ESPN+ HD" doesn't get left with a dangling " HD".
pub const PROVIDER_PREFIXES: &[&str] = &[
    "ESPN+ : ",
    "ESPN+ - ",
    "ESPN+ | ",
    "ESPN+ ",
    "ESPN2 ",
    "ESPNU ",
    "DAZN 1 | ",
    "DAZN 2 | ",
    "DAZN ",
    "FOX Sports 1 | ",
    "FOX Sports 2 | ",
    "FS1 | ",
    "FS2 | ",
    "Bally Sports | ",
    "NBC Sports | ",
    "Peacock | ",
    "Paramount+ | ",
    "beIN SPORTS | ",
    "Sky Sports | ",
    "TNT Sports | ",
];

/// Names that never carry a game regardless of league/separator heuristics.
pub const PLACEHOLDER_PATTERNS: &[&str] = &[
    "off air",
    "no event scheduled",
    "no events today",
    "to be announced",
    "tbd",
    "coming soon",
    "stream offline",
    "check back later",
    "24/7",
];

/// Separators considered for TEAM_VS_TEAM classification, in priority
/// order — the first one found in the name wins (spec.md §4.2).
pub const GAME_SEPARATORS: &[&str] = &[" vs. ", " vs ", " v ", " @ ", " at ", " - "];

/// Keywords that mark a stream as an event card (combat sports) rather
/// than a team matchup, and hint at which card segment it belongs to.
pub const EVENT_CARD_KEYWORDS: &[&str] = &[
    "main card",
    "main event",
    "prelims",
    "early prelims",
    "preliminary card",
    "fight night",
    "ppv",
];

/// League hint patterns: a substring and the canonical league code it
/// implies. Order matters — more specific patterns first.
pub const LEAGUE_HINT_PATTERNS: &[(&str, &str)] = &[
    ("UFC", "UFC"),
    ("PFL", "PFL"),
    ("BELLATOR", "BELLATOR"),
    ("ONE CHAMPIONSHIP", "ONE"),
    ("ONE FC", "ONE"),
    ("NFL", "NFL"),
    ("NBA", "NBA"),
    ("NHL", "NHL"),
    ("MLB", "MLB"),
    ("NCAAF", "NCAAF"),
    ("NCAAB", "NCAAB"),
    ("PREMIER LEAGUE", "EPL"),
    ("LA LIGA", "LALIGA"),
    ("SERIE A", "SERIEA"),
    ("BUNDESLIGA", "BUNDESLIGA"),
    ("CHAMPIONS LEAGUE", "UCL"),
];
