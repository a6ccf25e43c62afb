pub mod activity;
pub mod activity_type;
pub mod statistics;
