pub mod exports;
pub mod protocol;
pub mod server;
pub mod tools;

pub use exports::{default_export_dir, ExportDir};
pub use server::run_server;
