//! Defines custom error types for the application.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
/// Error type returned when content cannot be injected into a document.
pub enum InjectError {
    #[error("Failed to read content from stdin: {0}")]
    ReadInput(#[source] io::Error),

    #[error("Failed to read file {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse template: {0}")]
    TemplateParse(String),

    #[error("Failed to render template: {0}")]
    TemplateRender(String),

    #[error("Missing start tag {start_tag} while end tag is present")]
    MissingStartTag { start_tag: String },

    #[error("Missing end tag {end_tag} while start tag is present")]
    MissingEndTag { end_tag: String },

    #[error("End tag {end_tag} appears before start tag {start_tag}")]
    TagOrder { start_tag: String, end_tag: String },

    #[error("Failed to write file {}: {source}", path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
