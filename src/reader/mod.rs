pub mod reverse_reader;
pub mod source;

pub use reverse_reader::{Lines, ReverseLineCursor};
pub use source::ByteSource;
