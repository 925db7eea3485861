use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::domain::{Card, CardId};

/// Error raised while reading a card catalog export.
#[derive(Debug, thiserror::Error)]
pub enum CardCatalogError {
    #[error("failed to read card catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid card catalog CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("card on line {line} has an empty id")]
    MissingId { line: usize },
}

/// Parses `id,title,content,image,alt,likes` rows into seedable cards.
pub struct CardCatalog;

impl CardCatalog {
    pub fn from_path(path: &Path) -> Result<Vec<Card>, CardCatalogError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Card>, CardCatalogError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut cards = Vec::new();

        for (index, record) in csv_reader.deserialize::<CardRow>().enumerate() {
            let row = record?;
            if row.id.is_empty() {
                // header is line 1
                return Err(CardCatalogError::MissingId { line: index + 2 });
            }
            cards.push(Card {
                id: CardId(row.id),
                title: row.title,
                content: row.content,
                image: row.image,
                alt: row.alt,
                likes: row.likes.unwrap_or(0),
            });
        }

        Ok(cards)
    }
}

#[derive(Debug, Deserialize)]
struct CardRow {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    image: String,
    #[serde(default)]
    alt: String,
    #[serde(default)]
    likes: Option<u64>,
}
