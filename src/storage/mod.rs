mod record;
mod trip_store;

pub use record::{RecordStore, TripRecord};
pub use trip_store::TripStore;
