mod cursor;
mod source;

pub use cursor::ByteCursor;
pub use source::{FileSource, MemorySource, PrefixSource, DEFAULT_PREFIX_BYTES};
