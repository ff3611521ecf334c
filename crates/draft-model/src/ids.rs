use crate::position::Position;

const NAME_SUFFIXES: [&str; 6] = ["jr", "sr", "ii", "iii", "iv", "v"];

/// Normalizes a player name for joins across sources.
///
/// Lower-cases, turns punctuation into separators, drops generational
/// suffixes and collapses whitespace: `"Marvin Harrison Jr."` and
/// `"marvin harrison"` both become `"marvin harrison"`.
pub fn canonical_player_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_ascii_lowercase()
            } else if c == '\'' || c == '.' {
                '\0'
            } else {
                ' '
            }
        })
        .filter(|c| *c != '\0')
        .collect();
    let tokens: Vec<&str> = cleaned.split_whitespace().collect();
    let keep = tokens
        .iter()
        .enumerate()
        .filter(|(idx, token)| *idx == 0 || !NAME_SUFFIXES.contains(token))
        .map(|(_, token)| *token)
        .collect::<Vec<_>>();
    keep.join(" ")
}

/// Deterministic slug of `canonical_name|position|school`.
pub fn player_id(name: &str, position: Position, school: &str) -> String {
    let name = slug(&canonical_player_name(name));
    let school = slug(&canonical_player_name(school));
    let position = position.as_str().to_ascii_lowercase();
    if school.is_empty() {
        format!("{name}-{position}")
    } else {
        format!("{name}-{position}-{school}")
    }
}

fn slug(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join("-")
}
