//! Data module - upload loading and table schema

mod loader;
pub mod schema;

pub use loader::{
    load_csv, load_data, load_spreadsheet, FileFormat, LoaderError,
    UPLOAD_EXTENSIONS,
};
pub use schema::{NameMatching, SchemaWarning, TableKind};
