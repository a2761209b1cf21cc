mod interactive;

pub use interactive::{InquirePrompter, open_in_browser};
