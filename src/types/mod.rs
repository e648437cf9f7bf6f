mod property;
mod record;
mod region_key;
mod row;

pub use property::Property;
pub use record::Record;
pub use region_key::RegionKey;
pub use row::Row;
