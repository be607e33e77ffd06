//! Data model for scraped precedents.

use serde::{Deserialize, Serialize};

/// One published precedent, parsed from a single result card.
///
/// All fields are free text lifted straight out of the card; a field the
/// card does not carry is an empty string, never an error. Records have no
/// identity beyond their position in the run's output sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Precedent {
    /// Originating court (first line of the card).
    pub court: String,
    /// Case title (second line of the card).
    pub title: String,
    /// "Questão" section of the card body.
    pub question: String,
    /// "Tese" section of the card body.
    pub thesis: String,
    /// "Situação" section of the card body.
    pub situation: String,
    /// Date after the "Última Atualização" label, verbatim.
    pub last_update: String,
}

impl Precedent {
    /// Spreadsheet column names, in output order.
    pub const COLUMNS: [&'static str; 6] = [
        "court",
        "title",
        "question",
        "thesis",
        "situation",
        "last_update",
    ];

    /// Field values in the same order as [`Self::COLUMNS`].
    pub fn fields(&self) -> [&str; 6] {
        [
            &self.court,
            &self.title,
            &self.question,
            &self.thesis,
            &self.situation,
            &self.last_update,
        ]
    }
}
