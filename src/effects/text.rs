//! Tokenized effect text.
//!
//! Effect text is lowercased, split into clauses on sentence punctuation
//! and commas, and each clause into words. Words keep a leading `+` and
//! the `x`/`×` of repeat notation so `+10`, `x2` and `10x2` stay distinct
//! from plain numbers.

/// Words that name damage.
pub const DAMAGE_WORDS: &[&str] = &["dmg", "damage"];

/// Words that point a clause at the opponent.
const OPPONENT_WORDS: &[&str] = &["opponent", "opponent's", "opponents", "enemy", "enemy's", "enemies", "foe", "foe's", "their", "rival"];

/// Words that point a clause at the actor.
const SELF_WORDS: &[&str] = &["you", "your", "yourself"];

/// One clause of effect text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Clause {
    pub words: Vec<String>,
}

impl Clause {
    fn new(raw: &str) -> Option<Self> {
        let words: Vec<String> = raw
            .split_whitespace()
            .map(|w| {
                w.trim_matches(|c: char| !(c.is_alphanumeric() || c == '+' || c == '×'))
                    .to_string()
            })
            .filter(|w| !w.is_empty())
            .collect();
        (!words.is_empty()).then_some(Self { words })
    }

    #[must_use]
    pub fn word(&self, i: usize) -> Option<&str> {
        self.words.get(i).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Index of the first word equal to any of `options`.
    #[must_use]
    pub fn find_any(&self, options: &[&str]) -> Option<usize> {
        self.words.iter().position(|w| options.contains(&w.as_str()))
    }

    #[must_use]
    pub fn has_any(&self, options: &[&str]) -> bool {
        self.find_any(options).is_some()
    }

    /// Index where the consecutive words of `phrase` start.
    #[must_use]
    pub fn find_phrase(&self, phrase: &[&str]) -> Option<usize> {
        if phrase.is_empty() || phrase.len() > self.words.len() {
            return None;
        }
        (0..=self.words.len() - phrase.len())
            .find(|&i| phrase.iter().enumerate().all(|(j, p)| self.words[i + j] == *p))
    }

    #[must_use]
    pub fn has_phrase(&self, phrase: &[&str]) -> bool {
        self.find_phrase(phrase).is_some()
    }

    #[must_use]
    pub fn mentions_opponent(&self) -> bool {
        self.has_any(OPPONENT_WORDS)
    }

    #[must_use]
    pub fn mentions_self(&self) -> bool {
        self.has_any(SELF_WORDS)
    }

    /// Parse "for N turn(s)" anywhere in the clause.
    #[must_use]
    pub fn turns_for(&self) -> Option<u32> {
        self.words.windows(3).find_map(|w| {
            if w[0] == "for" && is_turn_word(&w[2]) {
                count(&w[1])
            } else {
                None
            }
        })
    }
}

/// Tokenized effect text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EffectText {
    pub clauses: Vec<Clause>,
}

impl EffectText {
    #[must_use]
    pub fn new(text: &str) -> Self {
        let lower = text.to_lowercase();
        let clauses = lower
            .split(|c: char| matches!(c, '.' | ';' | '!' | ',' | ':' | '\n'))
            .filter_map(Clause::new)
            .collect();
        Self { clauses }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter()
    }
}

/// Split effect text at "at the start of your turn".
///
/// Returns the immediate text and, if present, the upkeep sentence that
/// follows the phrase (up to the next full stop).
#[must_use]
pub fn split_upkeep(text: &str) -> (String, Option<String>) {
    const MARKERS: &[&str] = &["at the start of your turn", "at the start of each of your turns"];

    let lower = text.to_lowercase();
    let Some((start, marker)) = MARKERS
        .iter()
        .filter_map(|m| lower.find(m).map(|i| (i, *m)))
        .min_by_key(|(i, _)| *i)
    else {
        return (lower, None);
    };

    let rest = &lower[start + marker.len()..];
    let end = rest.find('.').unwrap_or(rest.len());
    let upkeep = rest[..end].trim_start_matches([',', ' ']).to_string();

    let mut immediate = lower[..start].to_string();
    immediate.push(' ');
    immediate.push_str(rest.get(end + 1..).unwrap_or_default());
    (immediate, Some(upkeep))
}

/// Plain decimal number.
#[must_use]
pub fn plain_number(word: &str) -> Option<i64> {
    if word.is_empty() || !word.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    word.parse().ok()
}

/// Plain number or a small number word ("a", "one" ... "five").
#[must_use]
pub fn number(word: &str) -> Option<i64> {
    plain_number(word).or(match word {
        "a" | "an" | "one" => Some(1),
        "two" => Some(2),
        "three" => Some(3),
        "four" => Some(4),
        "five" => Some(5),
        _ => None,
    })
}

/// Non-negative count that fits `u32`.
#[must_use]
pub fn count(word: &str) -> Option<u32> {
    number(word).and_then(|n| u32::try_from(n).ok())
}

/// Repeat notation "NxM" (or "N×M"), returning `(N, M)`.
#[must_use]
pub fn repeat_notation(word: &str) -> Option<(i64, i64)> {
    let (n, m) = word.split_once(['x', '×'])?;
    Some((plain_number(n)?, plain_number(m)?))
}

/// Flat bonus "+N".
#[must_use]
pub fn bonus(word: &str) -> Option<i64> {
    plain_number(word.strip_prefix('+')?)
}

/// Multiplier "xN", "N×", "double" or "triple".
#[must_use]
pub fn multiplier(word: &str) -> Option<f64> {
    match word {
        "double" | "twice" => return Some(2.0),
        "triple" => return Some(3.0),
        _ => {}
    }
    let digits = word
        .strip_prefix(['x', '×'])
        .or_else(|| word.strip_suffix(['x', '×']))?;
    digits.parse::<f64>().ok().filter(|m| *m > 0.0)
}

#[must_use]
pub fn is_card_word(word: &str) -> bool {
    matches!(word, "card" | "cards")
}

#[must_use]
pub fn is_turn_word(word: &str) -> bool {
    matches!(word, "turn" | "turns")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clauses_and_words() {
        let text = EffectText::new("Deal 8x2 DMG. Discard this card!");
        assert_eq!(text.clauses.len(), 2);
        assert_eq!(text.clauses[0].words, vec!["deal", "8x2", "dmg"]);
        assert_eq!(text.clauses[1].words, vec!["discard", "this", "card"]);
    }

    #[test]
    fn test_words_keep_sign_and_apostrophe() {
        let text = EffectText::new("Your next gun attack deals +10 dmg (opponent's turn)");
        let words = &text.clauses[0].words;
        assert!(words.contains(&"+10".to_string()));
        assert!(words.contains(&"opponent's".to_string()));
        assert!(words.contains(&"turn".to_string()));
    }

    #[test]
    fn test_numbers() {
        assert_eq!(plain_number("12"), Some(12));
        assert_eq!(plain_number("+12"), None);
        assert_eq!(number("a"), Some(1));
        assert_eq!(number("three"), Some(3));
        assert_eq!(repeat_notation("10x2"), Some((10, 2)));
        assert_eq!(repeat_notation("10×3"), Some((10, 3)));
        assert_eq!(repeat_notation("x2"), None);
        assert_eq!(bonus("+5"), Some(5));
        assert_eq!(multiplier("x2"), Some(2.0));
        assert_eq!(multiplier("1.5x"), Some(1.5));
        assert_eq!(multiplier("double"), Some(2.0));
        assert_eq!(multiplier("10x2"), None);
    }

    #[test]
    fn test_phrase_and_turns() {
        let clause = &EffectText::new("Block enemy healing for 2 turns").clauses[0];
        assert!(clause.has_phrase(&["enemy", "healing"]));
        assert!(!clause.has_phrase(&["healing", "enemy"]));
        assert_eq!(clause.turns_for(), Some(2));
        assert!(clause.mentions_opponent());
        assert!(!clause.mentions_self());
    }

    #[test]
    fn test_split_upkeep() {
        let (now, upkeep) = split_upkeep("At the start of your turn, draw 1 card. Heal 5 HP.");
        assert_eq!(upkeep.as_deref(), Some("draw 1 card"));
        assert!(now.contains("heal 5 hp"));
        assert!(!now.contains("draw"));

        let (now, upkeep) = split_upkeep("Deal 10 dmg.");
        assert_eq!(now, "deal 10 dmg.");
        assert!(upkeep.is_none());
    }
}
