//! The roster spreadsheet that admins paste into the manage-users page.
//!
//! The text is tab separated, the first non-blank line holds the column
//! headers and every following non-blank line is one player. Columns are
//! looked up by name without regard to case, so the order in which the admin
//! copied them does not matter.

use rand::Rng;

use crate::{CardRank, CardSuit, QrMapping, QrMappingSet};

/// Characters a generated QR token is drawn from.
pub const TOKEN_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
pub const TOKEN_LENGTH: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Name,
    Username,
    QrCode,
    CardSuit,
    CardRank,
}

impl Column {
    pub const ALL: [Column; 5] = [
        Column::Name,
        Column::Username,
        Column::QrCode,
        Column::CardSuit,
        Column::CardRank,
    ];

    /// The lowercase header name, which is also what gets appended when the
    /// column has to be created.
    pub fn header(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Username => "username",
            Self::QrCode => "qrcode",
            Self::CardSuit => "cardsuit",
            Self::CardRank => "cardrank",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("ERROR: At least two columns (Name, Username) are required.")]
    TooFewColumns,
    #[error("ERROR: Could not find a column called Name. Make sure you copied the header row also.")]
    MissingNameColumn,
    #[error("ERROR: Could not find a column called Username. Make sure you copied the header row also.")]
    MissingUsernameColumn,
    #[error("ERROR: Could not find the name for the row: {row}")]
    MissingName { row: String },
    #[error("ERROR: Could not find the username for the row: {row}")]
    MissingUsername { row: String },
}

/// A table that passed [`RosterTable::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub players: usize,
    /// The last row that had more cells than there are headers. Only
    /// informational, the success message replaces it on the status line.
    pub warning: Option<String>,
}

impl core::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Found details for {} players. Looks good.", self.players)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConsolidateError {
    #[error("ERROR: Could not find a column called {}.", .0.header())]
    MissingColumn(Column),
    #[error("ERROR: Row {row} has no usable {} value: '{value}'", .column.header())]
    InvalidCell {
        row: usize,
        column: Column,
        value: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RosterTable {
    pub fn parse(text: &str) -> Self {
        let mut lines = text
            .split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| line.split('\t').map(str::to_owned).collect::<Vec<_>>());

        let headers = lines.next().unwrap_or_default();
        let rows = lines.collect();

        Self { headers, rows }
    }

    /// Builds the table the manage-users page starts out with.
    pub fn from_mappings(mappings: &QrMappingSet) -> Self {
        let headers = ["Name", "Username", "qrcode", "cardsuit", "cardrank"]
            .into_iter()
            .map(str::to_owned)
            .collect();
        let rows = mappings
            .qr_mappings
            .iter()
            .map(|m| {
                vec![
                    m.display_name.clone(),
                    m.username.clone(),
                    m.qrcode.clone(),
                    m.card_suit.to_string(),
                    m.card_rank.to_string(),
                ]
            })
            .collect();

        Self { headers, rows }
    }

    pub fn to_tsv(&self) -> String {
        let mut text = self.headers.join("\t");
        for row in self.rows.iter() {
            text.push('\n');
            text.push_str(&row.join("\t"));
        }
        text
    }

    /// The index of the column, if several headers match the last one wins.
    pub fn column(&self, column: Column) -> Option<usize> {
        self.headers
            .iter()
            .rposition(|h| h.to_lowercase() == column.header())
    }

    pub fn validate(&self) -> Result<ValidationReport, ValidationError> {
        if self.headers.len() < 2 {
            return Err(ValidationError::TooFewColumns);
        }

        let name_idx = self
            .column(Column::Name)
            .ok_or(ValidationError::MissingNameColumn)?;
        let username_idx = self
            .column(Column::Username)
            .ok_or(ValidationError::MissingUsernameColumn)?;

        let mut warning = None;
        for row in self.rows.iter() {
            if filled_cell(row, name_idx).is_none() {
                return Err(ValidationError::MissingName {
                    row: row.join(", "),
                });
            }
            if filled_cell(row, username_idx).is_none() {
                return Err(ValidationError::MissingUsername {
                    row: row.join(", "),
                });
            }
            if row.len() > self.headers.len() {
                warning = Some(format!(
                    "ERROR: There are some extra columns or text in this row: {}",
                    row.join(", ")
                ));
            }
        }

        Ok(ValidationReport {
            players: self.rows.len(),
            warning,
        })
    }

    /// Makes sure every row has a QR code, card suit and card rank, creating
    /// the columns as needed. Returns whether anything was changed.
    pub fn fill_generated<R>(&mut self, site_url_prefix: &str, rng: &mut R) -> bool
    where
        R: Rng + ?Sized,
    {
        let mut dirty = false;

        dirty |= self.fill_column(Column::QrCode, |rng| {
            qr_payload(site_url_prefix, &random_token(rng))
        }, rng);
        dirty |= self.fill_column(Column::CardSuit, |rng| CardSuit::random(rng).to_string(), rng);
        dirty |= self.fill_column(Column::CardRank, |rng| CardRank::random(rng).to_string(), rng);

        dirty
    }

    fn fill_column<R, F>(&mut self, column: Column, mut generate: F, rng: &mut R) -> bool
    where
        R: Rng + ?Sized,
        F: FnMut(&mut R) -> String,
    {
        let mut dirty = false;

        let idx = match self.column(column) {
            Some(idx) => idx,
            None => {
                self.headers.push(column.header().to_owned());
                dirty = true;
                self.headers.len() - 1
            }
        };

        let mut generated = 0;
        for row in self.rows.iter_mut() {
            if filled_cell(row, idx).is_some() {
                continue;
            }
            if row.len() <= idx {
                row.resize(idx + 1, String::new());
            }
            row[idx] = generate(rng);
            generated += 1;
        }

        if generated > 0 {
            tracing::debug!(column = column.header(), generated, "Generated roster values");
            dirty = true;
        }

        dirty
    }

    pub fn consolidate(&self) -> Result<QrMappingSet, ConsolidateError> {
        let mut indices = [0; 5];
        for (slot, column) in indices.iter_mut().zip(Column::ALL) {
            *slot = self
                .column(column)
                .ok_or(ConsolidateError::MissingColumn(column))?;
        }
        let [name, username, qrcode, suit, rank] = indices;

        let qr_mappings = self
            .rows
            .iter()
            .enumerate()
            .map(|(row_idx, row)| {
                let text = |idx: usize, column: Column| {
                    row.get(idx).ok_or_else(|| ConsolidateError::InvalidCell {
                        row: row_idx + 1,
                        column,
                        value: String::new(),
                    })
                };
                let invalid = |column: Column, value: &str| ConsolidateError::InvalidCell {
                    row: row_idx + 1,
                    column,
                    value: value.to_owned(),
                };

                let suit_text = text(suit, Column::CardSuit)?;
                let rank_text = text(rank, Column::CardRank)?;

                Ok(QrMapping {
                    username: text(username, Column::Username)?.clone(),
                    display_name: text(name, Column::Name)?.clone(),
                    qrcode: text(qrcode, Column::QrCode)?.clone(),
                    card_suit: suit_text
                        .parse()
                        .map_err(|_| invalid(Column::CardSuit, suit_text.as_str()))?,
                    card_rank: rank_text
                        .parse()
                        .map_err(|_| invalid(Column::CardRank, rank_text.as_str()))?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(QrMappingSet { qr_mappings })
    }
}

fn filled_cell(row: &[String], idx: usize) -> Option<&str> {
    row.get(idx).map(String::as_str).filter(|c| !c.is_empty())
}

pub fn random_token<R>(rng: &mut R) -> String
where
    R: Rng + ?Sized,
{
    (0..TOKEN_LENGTH)
        .map(|_| TOKEN_ALPHABET[rng.gen_range(0..TOKEN_ALPHABET.len())] as char)
        .collect()
}

pub fn qr_payload(site_url_prefix: &str, token: &str) -> String {
    format!("{site_url_prefix}#{token}")
}

/// What the editor page should show after one of its actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorUpdate {
    /// Goes into the validation line.
    pub status: String,
    /// Replacement text for the textarea, `None` leaves it untouched.
    pub text: Option<String>,
    /// Only set by [`prepare_save`] when there is something to submit.
    pub payload: Option<QrMappingSet>,
}

impl EditorUpdate {
    fn message_only(status: impl ToString) -> Self {
        Self {
            status: status.to_string(),
            text: None,
            payload: None,
        }
    }
}

/// The textarea was edited, normalise it if it is valid.
pub fn apply_edit(text: &str) -> EditorUpdate {
    let table = RosterTable::parse(text);
    match table.validate() {
        Ok(report) => EditorUpdate {
            status: report.to_string(),
            text: Some(table.to_tsv()),
            payload: None,
        },
        Err(e) => EditorUpdate::message_only(e),
    }
}

pub fn apply_generate<R>(text: &str, site_url_prefix: &str, rng: &mut R) -> EditorUpdate
where
    R: Rng + ?Sized,
{
    let mut table = RosterTable::parse(text);
    let report = match table.validate() {
        Ok(r) => r,
        Err(e) => return EditorUpdate::message_only(e),
    };

    let changed = table.fill_generated(site_url_prefix, rng);
    EditorUpdate {
        status: report.to_string(),
        text: changed.then(|| table.to_tsv()),
        payload: None,
    }
}

/// Validates, fills in anything missing and builds the payload to submit.
pub fn prepare_save<R>(text: &str, site_url_prefix: &str, rng: &mut R) -> EditorUpdate
where
    R: Rng + ?Sized,
{
    let mut table = RosterTable::parse(text);
    let report = match table.validate() {
        Ok(r) => r,
        Err(e) => return EditorUpdate::message_only(e),
    };

    let text = table
        .fill_generated(site_url_prefix, rng)
        .then(|| table.to_tsv());

    match table.consolidate() {
        Ok(payload) => EditorUpdate {
            status: report.to_string(),
            text,
            payload: Some(payload),
        },
        Err(e) => EditorUpdate {
            status: e.to_string(),
            text,
            payload: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_lookup_ignores_case() {
        let table = RosterTable::parse("NAME\tUserName\tQRCode");
        assert_eq!(Some(0), table.column(Column::Name));
        assert_eq!(Some(1), table.column(Column::Username));
        assert_eq!(Some(2), table.column(Column::QrCode));
        assert_eq!(None, table.column(Column::CardRank));
    }

    #[test]
    fn duplicate_header_uses_last() {
        let table = RosterTable::parse("name\tusername\tName");
        assert_eq!(Some(2), table.column(Column::Name));
    }

    #[test]
    fn token_shape() {
        let mut rng = rand::thread_rng();
        let token = random_token(&mut rng);
        assert_eq!(TOKEN_LENGTH, token.len());
        assert!(token.bytes().all(|b| TOKEN_ALPHABET.contains(&b)));
    }
}
