use std::collections::HashMap;

use common::{QrMapping, QrMappingSet};

/// The roster with lookups by username and by badge QR code.
#[derive(Debug, Clone, Default)]
pub struct QrMappings {
    mappings: QrMappingSet,
    by_username: HashMap<String, usize>,
    by_qrcode: HashMap<String, usize>,
}

impl QrMappings {
    pub fn new(mappings: QrMappingSet) -> Self {
        let mut by_username = HashMap::with_capacity(mappings.qr_mappings.len());
        let mut by_qrcode = HashMap::with_capacity(mappings.qr_mappings.len());

        for (idx, m) in mappings.qr_mappings.iter().enumerate() {
            by_username.insert(m.username.clone(), idx);
            by_qrcode.insert(m.qrcode.clone(), idx);
        }

        Self {
            mappings,
            by_username,
            by_qrcode,
        }
    }

    pub fn set(&self) -> &QrMappingSet {
        &self.mappings
    }

    pub fn len(&self) -> usize {
        self.mappings.qr_mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.qr_mappings.is_empty()
    }

    pub fn lookup_by_username(&self, username: &str) -> Option<&QrMapping> {
        self.by_username
            .get(username)
            .map(|idx| &self.mappings.qr_mappings[*idx])
    }

    pub fn lookup_by_qrcode(&self, qrcode: &str) -> Option<&QrMapping> {
        self.by_qrcode
            .get(qrcode)
            .map(|idx| &self.mappings.qr_mappings[*idx])
    }
}

impl From<QrMappingSet> for QrMappings {
    fn from(value: QrMappingSet) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{CardRank, CardSuit};

    fn mapping(username: &str, qrcode: &str) -> QrMapping {
        QrMapping {
            username: username.to_owned(),
            display_name: username.to_uppercase(),
            qrcode: qrcode.to_owned(),
            card_suit: CardSuit::Clubs,
            card_rank: CardRank::new(2).unwrap(),
        }
    }

    #[test]
    fn lookups() {
        let mappings = QrMappings::new(QrMappingSet {
            qr_mappings: vec![mapping("ann", "qr-1"), mapping("ben", "qr-2")],
        });

        assert_eq!(2, mappings.len());
        assert_eq!(Some("ben"), mappings.lookup_by_qrcode("qr-2").map(|m| m.username.as_str()));
        assert_eq!(Some("qr-1"), mappings.lookup_by_username("ann").map(|m| m.qrcode.as_str()));
        assert!(mappings.lookup_by_qrcode("qr-3").is_none());
    }

    #[test]
    fn later_duplicates_win() {
        let mappings = QrMappings::new(QrMappingSet {
            qr_mappings: vec![mapping("ann", "qr-1"), mapping("ann", "qr-9")],
        });

        assert_eq!(Some("qr-9"), mappings.lookup_by_username("ann").map(|m| m.qrcode.as_str()));
    }
}
