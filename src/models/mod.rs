pub mod entities;
pub mod requests;


pub use entities::*;
pub use requests::*;
