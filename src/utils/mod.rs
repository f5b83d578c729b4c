pub mod logging;
pub mod text;

pub use logging::{log_section, log_startup, truncate_text};
pub use text::take_chars;
