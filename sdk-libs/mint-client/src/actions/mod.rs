mod mint_to_collection;

pub use mint_to_collection::*;
