pub mod connection;
pub mod errors;
pub mod memory;
pub mod postgres;
pub mod read_ops;
pub mod store;
pub mod write_ops;


pub use connection::*;
pub use errors::*;
pub use memory::InMemoryStore;
pub use postgres::PgStore;
pub use store::DiningStore;
