//! Playing cards handed out to every player on the roster.

use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardSuit {
    Spades,
    Hearts,
    Clubs,
    Diamonds,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CardParseError {
    #[error("'{0}' is not a card suit")]
    Suit(String),
    #[error("'{0}' is not a card rank between 1 and 13")]
    Rank(String),
}

impl CardSuit {
    pub const ALL: [CardSuit; 4] = [
        CardSuit::Spades,
        CardSuit::Hearts,
        CardSuit::Clubs,
        CardSuit::Diamonds,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Spades => "SPADES",
            Self::Hearts => "HEARTS",
            Self::Clubs => "CLUBS",
            Self::Diamonds => "DIAMONDS",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Spades => "♠",
            Self::Hearts => "♥",
            Self::Clubs => "♣",
            Self::Diamonds => "♦",
        }
    }

    pub fn is_red(&self) -> bool {
        matches!(self, Self::Hearts | Self::Diamonds)
    }

    pub fn random<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

impl core::fmt::Display for CardSuit {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

impl core::str::FromStr for CardSuit {
    type Err = CardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|suit| suit.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| CardParseError::Suit(s.to_owned()))
    }
}

/// A rank from 1 (ace) up to 13 (king).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct CardRank(u8);

impl CardRank {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 13;

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// How the rank is printed on the card face.
    pub fn label(&self) -> String {
        match self.0 {
            1 => "A".to_owned(),
            11 => "J".to_owned(),
            12 => "Q".to_owned(),
            13 => "K".to_owned(),
            other => other.to_string(),
        }
    }

    pub fn random<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self(rng.gen_range(Self::MIN..=Self::MAX))
    }
}

impl TryFrom<u8> for CardRank {
    type Error = CardParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| CardParseError::Rank(value.to_string()))
    }
}

impl From<CardRank> for u8 {
    fn from(value: CardRank) -> Self {
        value.0
    }
}

impl core::fmt::Display for CardRank {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl core::str::FromStr for CardRank {
    type Err = CardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u8>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| CardParseError::Rank(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suits_parse_without_case() {
        assert_eq!(Ok(CardSuit::Hearts), "hearts".parse());
        assert_eq!(Ok(CardSuit::Diamonds), " DIAMONDS ".parse());
        assert!("joker".parse::<CardSuit>().is_err());
    }

    #[test]
    fn rank_labels() {
        let labels: Vec<_> = (1..=13)
            .map(|v| CardRank::new(v).unwrap().label())
            .collect();
        assert_eq!(
            vec!["A", "2", "3", "4", "5", "6", "7", "8", "9", "10", "J", "Q", "K"],
            labels
        );
    }

    #[test]
    fn rank_bounds() {
        assert!(CardRank::new(0).is_none());
        assert!(CardRank::new(14).is_none());
        assert!("14".parse::<CardRank>().is_err());
        assert_eq!(Some(7), "7".parse::<CardRank>().ok().map(|r| r.value()));
        assert!(serde_json::from_str::<CardRank>("0").is_err());
    }
}
