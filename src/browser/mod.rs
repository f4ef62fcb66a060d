pub mod launch;
pub mod login;

pub use launch::{launch_browser, set_download_directory};
pub use login::login;
