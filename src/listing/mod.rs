pub mod reader;
pub mod record;

pub use reader::{read_listings, read_listings_from, ListingTable};
pub use record::ListingRecord;
