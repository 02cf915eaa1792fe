//! Contains the logic for placing content between a pair of markers.

use crate::error::InjectError;
use crate::markers::{TagPair, TagPositions};

/// Injects `addition` between the markers of `tags` in `original`.
///
/// * Neither tag present: a fresh marker block holding `addition` is appended.
/// * Both present, start before end: everything strictly between the markers
///   is replaced. Text up to and including the start tag, and from the end tag
///   onwards, is kept byte-for-byte.
/// * Only one present, or the end tag precedes the start tag: an error is
///   returned and nothing is produced.
///
/// Only the first occurrence of each tag is considered.
///
/// ```rust
/// use md_inject_lib::injector::inject;
/// use md_inject_lib::markers::TagPair;
///
/// let tags = TagPair::for_id("x");
/// let updated = inject("A\n", "new", &tags).unwrap();
/// assert_eq!(
///     updated,
///     "A\n\n<!-- START md-inject:x -->\nnew\n<!-- END md-inject:x -->\n"
/// );
/// ```
pub fn inject(original: &str, addition: &str, tags: &TagPair) -> Result<String, InjectError> {
    let positions = tags.locate(original);
    warn_on_duplicates(tags, &positions);

    match (positions.start, positions.end) {
        (None, None) => {
            log::debug!("No markers found; appending a new block");
            Ok(format!(
                "{original}\n{}\n{addition}\n{}\n",
                tags.start, tags.end
            ))
        }
        (Some(_), None) => Err(InjectError::MissingEndTag {
            end_tag: tags.end.clone(),
        }),
        (None, Some(_)) => Err(InjectError::MissingStartTag {
            start_tag: tags.start.clone(),
        }),
        (Some(start), Some(end)) => {
            let head_end = start + tags.start.len();
            // The end tag must begin after the start tag has ended.
            if end < head_end {
                return Err(InjectError::TagOrder {
                    start_tag: tags.start.clone(),
                    end_tag: tags.end.clone(),
                });
            }

            log::debug!(
                "Replacing {} bytes between markers at {start}..{end}",
                end - head_end
            );
            Ok(format!(
                "{}\n{addition}{}",
                &original[..head_end],
                &original[end..]
            ))
        }
    }
}

fn warn_on_duplicates(tags: &TagPair, positions: &TagPositions) {
    if positions.start_count > 1 {
        log::warn!(
            "Start tag {} appears {} times; using the first occurrence.",
            tags.start,
            positions.start_count
        );
    }
    if positions.end_count > 1 {
        log::warn!(
            "End tag {} appears {} times; using the first occurrence.",
            tags.end,
            positions.end_count
        );
    }
}
