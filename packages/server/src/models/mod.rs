pub mod auth;
pub mod form;
pub mod leaderboard;
pub mod question;
pub mod race;
pub mod result;
pub mod settings;
pub mod shared;
pub mod stats;
pub mod submission;
