//! Writer implementations

use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;

use tracing_subscriber::fmt::TestWriter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::config::WriterConfig;
use crate::error::{LogError, LogResult};

/// Create a writer from configuration
pub fn make_writer(config: &WriterConfig) -> LogResult<BoxMakeWriter> {
    let writer = match config {
        WriterConfig::Stderr => BoxMakeWriter::new(io::stderr),
        WriterConfig::Stdout => BoxMakeWriter::new(io::stdout),
        WriterConfig::Test => BoxMakeWriter::new(TestWriter::new()),
        WriterConfig::File { path, append } => {
            if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
                std::fs::create_dir_all(dir).map_err(|source| LogError::Writer {
                    path: path.clone(),
                    source,
                })?;
            }
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .append(*append)
                .truncate(!*append)
                .open(path)
                .map_err(|source| LogError::Writer {
                    path: path.clone(),
                    source,
                })?;
            BoxMakeWriter::new(Mutex::new(file))
        }
    };
    Ok(writer)
}
