pub mod health;
pub mod login;
pub mod root;
pub mod sessions;
pub mod welcome;
