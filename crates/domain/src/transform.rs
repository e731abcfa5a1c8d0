//! Content transforms applied to decoded file text.
//!
//! The order is fixed: comment removal (reserved) -> empty-line removal ->
//! trim -> line numbering. Numbering always runs last so the numbers reflect
//! the final line count.

use crate::sanitize::SanitizeOptions;
use repopack_shared::{ErrorCode, ErrorEnvelope};
use thiserror::Error;

/// Separator between a line number and the line content.
pub const LINE_NUMBER_SEPARATOR: &str = " | ";

/// Errors raised by the transform pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransformError {
    /// Comment removal was requested but is not implemented.
    #[error("comment removal is not implemented yet")]
    CommentRemovalUnsupported,
}

impl From<TransformError> for ErrorEnvelope {
    fn from(error: TransformError) -> Self {
        match error {
            TransformError::CommentRemovalUnsupported => Self::expected(
                ErrorCode::new("sanitize", "comment_removal_unsupported"),
                error.to_string(),
            )
            .with_metadata("option", "output.removeComments"),
        }
    }
}

/// Reject options that request unimplemented stages.
///
/// Callers run this before any I/O so the failure is attributed to the
/// configuration, not to whichever file happened to be first.
pub const fn validate_options(options: SanitizeOptions) -> Result<(), TransformError> {
    if options.remove_comments {
        return Err(TransformError::CommentRemovalUnsupported);
    }
    Ok(())
}

/// Apply the transform pipeline to decoded text.
pub fn transform(content: &str, options: SanitizeOptions) -> Result<String, TransformError> {
    validate_options(options)?;

    let content = if options.remove_empty_lines {
        remove_empty_lines(content)
    } else {
        content.to_owned()
    };

    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Ok(String::new());
    }

    if options.show_line_numbers {
        Ok(add_line_numbers(trimmed))
    } else {
        Ok(trimmed.to_owned())
    }
}

/// Drop every line that is blank after trimming; join the rest with `\n`.
///
/// Lines end at `\n`, `\r\n`, a bare `\r`, or a Unicode line or record
/// separator. A `\r\n` pair leaves an empty piece that the filter drops.
pub fn remove_empty_lines(content: &str) -> String {
    content
        .split(is_line_break)
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

const fn is_line_break(ch: char) -> bool {
    matches!(
        ch,
        '\n' | '\r'
            | '\u{0b}'
            | '\u{0c}'
            | '\u{1c}'..='\u{1e}'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}

/// Prefix each line with its right-aligned 1-based number and `" | "`.
pub fn add_line_numbers(content: &str) -> String {
    let lines: Vec<&str> = content.split('\n').collect();
    let width = decimal_width(lines.len());

    lines
        .iter()
        .enumerate()
        .map(|(index, line)| {
            format!(
                "{number:>width$}{separator}{line}",
                number = index + 1,
                separator = LINE_NUMBER_SEPARATOR,
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

const fn decimal_width(mut value: usize) -> usize {
    let mut width = 1;
    while value >= 10 {
        value /= 10;
        width += 1;
    }
    width
}
