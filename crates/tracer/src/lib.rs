pub mod error;
pub mod writer;

pub use error::TracerError;
pub use writer::StructuredLogWriter;
