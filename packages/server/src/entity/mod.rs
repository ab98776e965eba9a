pub mod app_setting;
pub mod question;
pub mod race;
pub mod race_result;
pub mod submission;
