//! Line-oriented reader for YAML multi-document streams.

const MARKER: &[u8] = b"---";

/// How a `---` line delimits documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    /// `---` alone or followed by a comment: the line belongs to no document.
    Separator,
    /// `--- <content>`: the line opens the next document and stays part of it.
    Start,
}

/// DocumentReader yields the raw bytes of each document in a YAML stream.
///
/// A document marker is a line starting with `---` followed by whitespace
/// or the end of the line. A bare marker, or one followed only by a comment,
/// is dropped; a marker with inline content (`--- {a: 1}`) is kept as the
/// first line of the document it opens. Yielded slices borrow from the input
/// and keep their original line endings; empty documents are never yielded.
#[derive(Debug, Clone)]
pub struct DocumentReader<'a> {
    input: &'a [u8],
    offset: usize,
}

impl<'a> DocumentReader<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        DocumentReader { input, offset: 0 }
    }
}

impl<'a> Iterator for DocumentReader<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<&'a [u8]> {
        let input = self.input;
        let mut start = self.offset;
        let mut pos = self.offset;

        while pos < input.len() {
            let end = line_end(input, pos);
            match marker(&input[pos..end]) {
                Some(Marker::Separator) => {
                    if pos > start {
                        self.offset = end;
                        return Some(&input[start..pos]);
                    }
                    start = end;
                }
                Some(Marker::Start) if pos > start => {
                    self.offset = pos;
                    return Some(&input[start..pos]);
                }
                Some(Marker::Start) | None => {}
            }
            pos = end;
        }

        self.offset = pos;
        (pos > start).then(|| &input[start..pos])
    }
}

/// Returns the index just past the newline that ends the line at `pos`.
fn line_end(input: &[u8], pos: usize) -> usize {
    input[pos..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(input.len(), |i| pos + i + 1)
}

fn marker(line: &[u8]) -> Option<Marker> {
    let tail = line.strip_prefix(MARKER)?;
    if tail.first().is_some_and(|b| !b.is_ascii_whitespace()) {
        return None;
    }
    let tail = tail.trim_ascii();
    if tail.is_empty() || tail.starts_with(b"#") {
        Some(Marker::Separator)
    } else {
        Some(Marker::Start)
    }
}

/// Reports whether a document holds nothing but whitespace and comments.
pub fn is_blank(document: &[u8]) -> bool {
    document.split(|&b| b == b'\n').all(|line| {
        let line = line.trim_ascii();
        line.is_empty() || line.starts_with(b"#")
    })
}
