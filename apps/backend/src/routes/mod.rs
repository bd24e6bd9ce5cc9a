pub mod auth;
pub mod batch_goals;
pub mod batches;
pub mod chapters;
pub mod items;
pub mod schedule;
pub mod subjects;
pub mod targets;
