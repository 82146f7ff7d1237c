//! Built-in alias tables.
//!
//! Keys are lowercase alias spellings seen across the data sources; values
//! are the canonical names used for badge lookup and prediction requests.
//! Config-supplied aliases are merged over these.

pub const EPL_ALIASES: &[(&str, &str)] = &[
    ("afc bournemouth", "Bournemouth"),
    ("arsenal fc", "Arsenal"),
    ("brighton & hove albion", "Brighton"),
    ("brighton and hove albion", "Brighton"),
    ("man city", "Manchester City"),
    ("man utd", "Manchester United"),
    ("man united", "Manchester United"),
    ("manchester utd", "Manchester United"),
    ("newcastle", "Newcastle United"),
    ("nottm forest", "Nottingham Forest"),
    ("nott'm forest", "Nottingham Forest"),
    ("spurs", "Tottenham Hotspur"),
    ("tottenham", "Tottenham Hotspur"),
    ("west ham", "West Ham United"),
    ("wolves", "Wolverhampton Wanderers"),
    ("sunderland afc", "Sunderland"),
    ("leeds", "Leeds United"),
];

pub const LALIGA_ALIASES: &[(&str, &str)] = &[
    ("alaves", "Deportivo Alaves"),
    ("athletic bilbao", "Athletic Club"),
    ("atletico", "Atletico Madrid"),
    ("atletico de madrid", "Atletico Madrid"),
    ("club atletico de madrid", "Atletico Madrid"),
    ("barca", "Barcelona"),
    ("ca osasuna", "Osasuna"),
    ("celta", "Celta Vigo"),
    ("rc celta", "Celta Vigo"),
    ("rcd espanyol", "Espanyol"),
    ("rcd mallorca", "Mallorca"),
    ("real betis balompie", "Real Betis"),
    ("betis", "Real Betis"),
    ("rayo", "Rayo Vallecano"),
    ("sevilla fc", "Sevilla"),
    ("valencia cf", "Valencia"),
    ("villarreal", "Villareal"),
    ("villarreal cf", "Villareal"),
    ("elche cf", "Elche"),
    ("getafe cf", "Getafe"),
    ("girona fc", "Girona"),
    ("real oviedo", "Real Oviedo"),
    ("levante ud", "Levante"),
];

/// Built-in aliases for a league key; unknown leagues have none.
pub fn builtin_aliases(league_key: &str) -> &'static [(&'static str, &'static str)] {
    match league_key {
        "epl" => EPL_ALIASES,
        "laliga" => LALIGA_ALIASES,
        _ => &[],
    }
}
