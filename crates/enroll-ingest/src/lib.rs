//! Ingestion of LMS exports: locating the three collection files, unwrapping
//! paged payloads and recording input digests.

pub mod discovery;
pub mod error;
pub mod pages;
pub mod source;

pub use discovery::{InputFiles, input_path, locate_inputs};
pub use error::{IngestError, Result};
pub use pages::{Page, parse_page, unwrap_pages};
pub use source::{
    DirectorySource, LoadedCollection, RawInputs, RecordSource, SourceInfo, load_inputs,
    read_collection, sha256_hex,
};
