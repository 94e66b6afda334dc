pub mod team_id;
pub mod team_store;

pub use team_id::TeamId;
pub use team_store::{TeamReading, TeamStore};
