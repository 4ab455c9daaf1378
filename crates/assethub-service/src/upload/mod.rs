//! Upload ingestion: turning raw files into embeddable assets.

pub mod encoder;
pub mod ingest;
pub mod source;

pub use encoder::{AssetEncoder, DataUriEncoder, mime_from_name};
pub use ingest::Ingestor;
pub use source::{PathSource, UploadFile};
