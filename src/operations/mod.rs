pub mod add;
pub mod dashboard;
pub mod export;
pub mod import;
pub mod income;
pub mod periods;
pub mod remove;
pub mod search;
pub mod stats;
