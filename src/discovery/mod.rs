//! Project discovery
//!
//! Resolves configured base patterns into project directories:
//! - `normalize` - Home expansion and lexical path cleaning
//! - `pattern` - Splitting a base pattern into walk root and glob suffix
//! - `resolver` - Filesystem walk, name derivation and deduplication
//! - `ignore` - Ignore globs applied during the walk

mod ignore;
mod normalize;
mod pattern;
mod project;
mod resolver;

pub use ignore::*;
pub use normalize::*;
pub use pattern::*;
pub use project::*;
pub use resolver::*;
