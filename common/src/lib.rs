pub mod card;
pub mod roster;
pub mod scan;

pub use card::{CardRank, CardSuit};

/// Every badge QR payload that belongs to the game starts with this.
pub const DEFAULT_SITE_URL_PREFIX: &str = "https://qr.sd3.in/";

/// Links a player of the roster to the QR code printed on their badge.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct QrMapping {
    pub username: String,
    pub display_name: String,
    pub qrcode: String,
    pub card_suit: CardSuit,
    pub card_rank: CardRank,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct QrMappingSet {
    #[serde(default)]
    pub qr_mappings: Vec<QrMapping>,
}

impl QrMappingSet {
    /// The JSON text that goes into the `users` form field.
    pub fn to_form_value(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metal {
    Aluminium,
    Copper,
    Tin,
    Zinc,
}

impl Metal {
    pub const ALL: [Metal; 4] = [Metal::Aluminium, Metal::Copper, Metal::Tin, Metal::Zinc];

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Aluminium => "al",
            Self::Copper => "cu",
            Self::Tin => "sn",
            Self::Zinc => "zn",
        }
    }
}

/// The per-player state of the game. The server owns it, clients only render it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GameState {
    pub user_level: i64,
    pub life: i64,
    pub has_al: bool,
    pub has_cu: bool,
    pub has_sn: bool,
    pub has_zn: bool,
}

impl GameState {
    pub const MAX_LIFE: i64 = 5;

    pub fn has(&self, metal: Metal) -> bool {
        match metal {
            Metal::Aluminium => self.has_al,
            Metal::Copper => self.has_cu,
            Metal::Tin => self.has_sn,
            Metal::Zinc => self.has_zn,
        }
    }

    pub fn grant(&mut self, metal: Metal) {
        match metal {
            Metal::Aluminium => self.has_al = true,
            Metal::Copper => self.has_cu = true,
            Metal::Tin => self.has_sn = true,
            Metal::Zinc => self.has_zn = true,
        }
    }

    pub fn has_all_metals(&self) -> bool {
        Metal::ALL.iter().all(|m| self.has(*m))
    }

    /// Which of the heart icons are lit, left to right.
    pub fn hearts(&self) -> [bool; Self::MAX_LIFE as usize] {
        core::array::from_fn(|i| self.life > i as i64)
    }
}

/// One row of the admin players overview.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PlayerOverview {
    pub username: String,
    /// Empty when the player is no longer on the roster.
    #[serde(default)]
    pub display_name: String,
    pub state: GameState,
}
