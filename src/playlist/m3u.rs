//! Line-oriented playlist text

const BOM: char = '\u{feff}';

/// Split playlist text into raw lines
///
/// Handles `\n` and `\r\n` endings and drops a leading byte-order mark so an
/// `#EXTM3U` header written by Windows tools is still seen as a comment.
pub fn read_entries(text: &str) -> impl Iterator<Item = &str> {
    text.strip_prefix(BOM).unwrap_or(text).lines()
}

/// Render output lines as playlist text
///
/// Each line is terminated by `\n`; an empty string becomes a blank line.
/// No `#EXTM3U` header is written, Rockbox reads bare path lists.
pub fn render_playlist(lines: &[String]) -> String {
    let mut content = String::new();
    for line in lines {
        content.push_str(line);
        content.push('\n');
    }
    content
}
