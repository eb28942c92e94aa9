pub mod book;
pub mod escrow;
pub mod order;
pub mod trades;
