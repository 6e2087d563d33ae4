//! Domain entities - Core business objects

mod card;
mod card_batch;
mod game_specification;

pub use card::{CardContent, CardRecord, Illustration};
pub use card_batch::CardBatch;
pub use game_specification::{CardTypeQuota, GameSpecification};
