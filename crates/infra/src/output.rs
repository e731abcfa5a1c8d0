//! Plain-text output document.

use repopack_domain::{GITIGNORE_FILE_NAME, REPOPACK_IGNORE_FILE_NAME, SanitizedFile};
use std::fmt::Write as _;

/// Heavy separator framing the document sections.
pub const SECTION_SEPARATOR: &str =
    "================================================================";
/// Light separator framing each file path.
pub const FILE_SEPARATOR: &str = "================";

/// Render sanitized records into the output document.
pub fn render_output(records: &[SanitizedFile], header_text: Option<&str>) -> String {
    let body_len: usize = records
        .iter()
        .map(|record| record.path.len() + record.content.len() + 2 * FILE_SEPARATOR.len() + 16)
        .sum();
    let mut document = String::with_capacity(1024 + body_len);

    push_section_title(&mut document, "Repopack Output File");
    document.push('\n');
    document.push_str(
        "This file is a merged representation of the repository's text files.\n\
         It is meant to be read in one pass by code review tools and language models.\n\n",
    );
    document.push_str(
        "File Format:\n\
         ------------\n\
         Each file is written as a separator line, a `File: <path>` line, another\n\
         separator line, the file contents, and a blank line.\n\n",
    );
    document.push_str("Notes:\n------\n");
    let _ = writeln!(
        document,
        "- Files matched by {GITIGNORE_FILE_NAME}, {REPOPACK_IGNORE_FILE_NAME}, or custom patterns are excluded"
    );
    document.push_str("- Binary files and files with no content are not included\n");

    if let Some(header) = header_text {
        document.push_str("\nUser Provided Header:\n---------------------\n");
        document.push_str(header.trim_end());
        document.push('\n');
    }

    document.push('\n');
    push_section_title(&mut document, "Repository Files");

    for record in records {
        document.push('\n');
        document.push_str(FILE_SEPARATOR);
        let _ = writeln!(document, "\nFile: {}", record.path);
        document.push_str(FILE_SEPARATOR);
        document.push('\n');
        document.push_str(&record.content);
        document.push('\n');
    }

    document
}

fn push_section_title(document: &mut String, title: &str) {
    let _ = writeln!(document, "{SECTION_SEPARATOR}\n{title}\n{SECTION_SEPARATOR}");
}
