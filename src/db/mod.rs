pub mod models;
pub mod store;

mod menu;
mod reservations;
mod sessions;

pub use store::Store;
