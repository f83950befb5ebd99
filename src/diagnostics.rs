//! Markdown rendering of fatal errors for the terminal.

use crate::config::CONFIG_FILE_NAME;
use crate::error::Error;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Render an error as valid markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
    return;
}

/// Render an error as a structured markdown diagnostic.
///
/// Each variant produces a block with what happened and, where there is
/// one, how to fix it.
pub fn render_error(e: &Error) -> String {
    return match e {
        Error::CorpusRead { path, source } => format!("\
# Error: Unreadable Document

`{}` could not be read: {source}

## Fix

Check the file's permissions and make sure it is UTF-8 text, or exclude it:

    exclude = [\"{}\"]
", path.display(), path.display()),

        Error::InvalidPattern { pattern, reason } => format!("\
# Error: Invalid Pattern

`{pattern}` failed to compile: {reason}
"),

        Error::Io(e) => format!("\
# Error: I/O

{e}
"),

        Error::Json(e) => format!("\
# Error: Report Serialization

{e}
"),

        Error::RootNotFound { path } => format!("\
# Error: Corpus Root Not Found

`{}` does not exist or is not a directory.

## Fix

Pass the directory containing your documents:

    linkheal check path/to/docs
", path.display()),

        Error::TomlDe(e) => format!("\
# Error: Invalid Config

`{CONFIG_FILE_NAME}` is not valid:

{e}

## Fix

Correct or remove `{CONFIG_FILE_NAME}`. Every key is optional.
"),
    };
}
