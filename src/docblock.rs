//! Leading documentation block extraction for script files.

/// Interchangeable triple-quote delimiters that open a documentation block.
const DELIMITERS: [&str; 2] = ["\"\"\"", "'''"];

/// The first documentation block of a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocBlock {
    /// The block was closed by a matching delimiter.
    Complete(String),
    /// The file ended before the closing delimiter; the text is best effort.
    Unterminated(String),
}

impl DocBlock {
    /// Text between the delimiters.
    pub fn text(&self) -> &str {
        match self {
            Self::Complete(text) | Self::Unterminated(text) => text,
        }
    }

    /// Return true if the closing delimiter was found.
    pub fn is_terminated(&self) -> bool {
        matches!(self, Self::Complete(_))
    }
}

/// Locate the first documentation block in a file.
///
/// Blank lines and `#` lines (shebang, encoding, comments) may precede the
/// block. Any other line before an opening delimiter means the file has no
/// block and `None` is returned. Text after the closing delimiter is
/// discarded.
pub fn extract_docblock(contents: &str) -> Option<DocBlock> {
    let mut lines = contents.lines();
    let (delimiter, first) = loop {
        let trimmed = lines.next()?.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let delimiter = opening_delimiter(trimmed)?;
        let rest = &trimmed[delimiter.len()..];
        if let Some(end) = rest.find(delimiter) {
            return Some(DocBlock::Complete(rest[..end].to_string()));
        }
        break (delimiter, rest);
    };

    let mut body = vec![first];
    for line in lines {
        if let Some(end) = line.find(delimiter) {
            body.push(&line[..end]);
            return Some(DocBlock::Complete(body.join("\n")));
        }
        body.push(line);
    }

    Some(DocBlock::Unterminated(body.join("\n")))
}

/// Return the delimiter a trimmed line opens with, if any.
fn opening_delimiter(trimmed: &str) -> Option<&'static str> {
    DELIMITERS
        .into_iter()
        .find(|delimiter| trimmed.starts_with(delimiter))
}
