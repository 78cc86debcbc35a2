pub mod models;
pub mod transitions;

pub use models::*;
pub use transitions::{Actor, Participants};
