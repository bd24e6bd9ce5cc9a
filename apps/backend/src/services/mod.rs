pub mod credentials;
pub mod scheduler;
