//! Dashboard screens

pub mod help;
pub mod login;
pub mod resource;

pub use help::HelpScreen;
pub use login::LoginScreen;
pub use resource::{CrudScreen, Focus, ResourceScreen};
