pub mod features;
pub mod health;
