//! Test fixtures and common test helpers.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_fixtures::{illustrated_batch, write_png};
//!
//! #[test]
//! fn test_card_sheet() {
//!     let dir = tempfile::tempdir().unwrap();
//!     let batch = illustrated_batch(dir.path(), 10);
//!     // ... test logic
//! }
//! ```

pub mod image_mocks;
pub mod llm_fakes;
pub mod llm_integration;

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};

use cardforge_domain::{CardBatch, CardContent, CardRecord};

/// Write a small solid-colour PNG into `dir`.
pub fn write_png(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    RgbImage::from_pixel(32, 32, Rgb([200, 160, 60]))
        .save(&path)
        .unwrap_or_else(|e| panic!("Failed to write '{}': {}", path.display(), e));
    path
}

/// A batch of `count` complete cards sharing one illustration file.
///
/// Descriptions are short enough to fit on a single line of a card.
pub fn illustrated_batch(dir: &Path, count: usize) -> CardBatch {
    let illustration = write_png(dir, "card.png");
    let mut batch = CardBatch::new();

    for i in 1..=count {
        let record = CardRecord::from_content(CardContent {
            title: format!("Card {i}"),
            card_type: "Goods".to_string(),
            description: "Trade for one coin.".to_string(),
            illustration_prompt: format!("goods crate number {i}"),
        })
        .with_illustration(illustration.clone())
        .expect("attach illustration");
        batch.push(record).expect("complete record");
    }

    batch
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_illustrated_batch_is_complete() {
        let dir = tempfile::tempdir().expect("tempdir");
        let batch = illustrated_batch(dir.path(), 3);

        assert_eq!(batch.len(), 3);
        assert!(batch.iter().all(CardRecord::is_complete));
        assert_eq!(batch.records()[2].title, "Card 3");
    }
}
