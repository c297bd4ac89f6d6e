pub mod dto;
pub mod figure;

pub use dto::*;
pub use figure::*;
