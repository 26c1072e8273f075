pub mod catalog;
pub mod photo;
pub mod row_model;

pub use catalog::*;
pub use photo::*;
pub use row_model::*;
