pub mod cipher;
pub mod report;

pub use cipher::CipherCodec;
pub use report::{parse as parse_report, Report};
