//! `md-inject-lib` exposes the marker injection primitives that power the
//! `md-inject` CLI.
//!
//! A document carries regions delimited by HTML comment markers such as
//! `<!-- START md-inject:usage -->` and `<!-- END md-inject:usage -->`. The
//! library renders new content through an optional template, then replaces
//! whatever sits between the markers (or appends a fresh marker block when the
//! document has none). You can use it directly to keep generated sections of
//! a README up to date without shelling out to the CLI.
//!
//! # Example
//!
//! ```rust
//! use md_inject_lib::markers::TagPair;
//! use md_inject_lib::MarkerDocument;
//!
//! # fn demo() -> Result<(), md_inject_lib::error::InjectError> {
//! let mut document = MarkerDocument::from(String::from(
//!     "# Usage\n<!-- START md-inject:usage -->\nstale\n<!-- END md-inject:usage -->\n",
//! ));
//!
//! document.inject("md-inject [OPTIONS] FILE\n", &TagPair::for_id("usage"))?;
//! assert!(document.as_str().contains("md-inject [OPTIONS] FILE"));
//! assert!(!document.as_str().contains("stale"));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod injector;
pub mod markers;
pub mod template;

use crate::error::InjectError;
use crate::markers::TagPair;
use crate::template::{apply_template_with, MiniJinjaRenderer, TemplateRenderer};
use std::convert::Infallible;
use std::str::FromStr;

/// An in-memory text document whose marker regions can be updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerDocument {
    content: String,
}

impl MarkerDocument {
    /// Places `addition` between the markers of `tags`.
    ///
    /// If injection fails (e.g., because only one of the markers exists),
    /// the document is left untouched and an [`InjectError`] is returned.
    pub fn inject(&mut self, addition: &str, tags: &TagPair) -> Result<(), InjectError> {
        self.content = injector::inject(&self.content, addition, tags)?;
        Ok(())
    }

    /// Renders `raw` through `template` and injects the result.
    pub fn inject_templated(
        &mut self,
        raw: &str,
        template: &str,
        tags: &TagPair,
    ) -> Result<(), InjectError> {
        self.inject_templated_with(&MiniJinjaRenderer::new(), raw, template, tags)
    }

    /// Same as [`MarkerDocument::inject_templated`], with a caller-supplied renderer.
    pub fn inject_templated_with<R: TemplateRenderer + ?Sized>(
        &mut self,
        renderer: &R,
        raw: &str,
        template: &str,
        tags: &TagPair,
    ) -> Result<(), InjectError> {
        let addition = apply_template_with(renderer, template, raw)?;
        self.inject(&addition, tags)
    }

    /// Returns the current document text.
    pub fn as_str(&self) -> &str {
        &self.content
    }

    /// Consumes the document and returns its text.
    pub fn into_string(self) -> String {
        self.content
    }
}

impl FromStr for MarkerDocument {
    type Err = Infallible;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        Ok(Self {
            content: content.to_string(),
        })
    }
}

impl From<String> for MarkerDocument {
    fn from(content: String) -> Self {
        Self { content }
    }
}

/// Computes the updated text of `original` after rendering `raw` through
/// `template` and injecting it between `tags`.
pub fn update(
    original: &str,
    raw: &str,
    template: &str,
    tags: &TagPair,
) -> Result<String, InjectError> {
    let mut document = MarkerDocument::from(original.to_string());
    document.inject_templated(raw, template, tags)?;
    Ok(document.into_string())
}
