pub mod models;
pub mod pool;
pub mod store;

pub use pool::Db;
pub use store::{GymStore, StoreError};
