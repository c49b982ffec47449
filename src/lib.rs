// region:    --- Modules

mod error;
mod hunk;
mod locate;
mod patch_result;
mod search_replace;
mod strategy;
mod udiff;
mod whole_file;

pub use error::*;
pub use hunk::*;
pub use locate::*;
pub use patch_result::*;
pub use search_replace::*;
pub use strategy::*;
pub use udiff::*;
pub use whole_file::*;

// endregion: --- Modules
