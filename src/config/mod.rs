pub mod settings;

pub use settings::{SkipSetConfig, SortOrder};
