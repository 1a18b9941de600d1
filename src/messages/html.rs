/// Helpers for bringing web prose (news articles, changelogs) into chat.
///
/// `html_to_text` is not a general converter: only a whitelist of tags is
/// rewritten, every other tag is deleted (never escaped).
use once_cell::sync::Lazy;
use regex::Regex;

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid html regex")
}

static BR:        Lazy<Regex> = Lazy::new(|| regex(r"<br\s?/?>"));
static STRONG:    Lazy<Regex> = Lazy::new(|| regex(r"<strong>([^<]+)</strong>"));
static BOLD:      Lazy<Regex> = Lazy::new(|| regex(r"<b>([^<]+)</b>"));
static LIST_ITEM: Lazy<Regex> = Lazy::new(|| regex(r"<li>([^<]+)</li>"));
static LINK:      Lazy<Regex> = Lazy::new(|| regex(r#"<a href="([^"]+)"[^>]*>([^<]+)</a>"#));
static PARAGRAPH: Lazy<Regex> = Lazy::new(|| regex(r"<p>([^<]+)</p>"));
static IFRAME:    Lazy<Regex> = Lazy::new(|| regex(r#"<iframe src="([^"]+)"[^>]*></iframe>"#));
static ANY_TAG:   Lazy<Regex> = Lazy::new(|| regex(r"<[^>]+>"));
static BLANKS:    Lazy<Regex> = Lazy::new(|| regex(r"\n{2,}"));
static IMG:       Lazy<Regex> = Lazy::new(|| regex(r"<img([^<]+)>"));
static IMG_SRC:   Lazy<Regex> = Lazy::new(|| regex(r#"src="([^"]+)"#));

/// What the whitelisted tags turn into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupStyle {
    /// `**bold**`, `[text](url)`
    Markdown,
    /// bold text as-is, links as `text (url)`
    Plain,
}

pub fn html_to_text(html: &str, style: MarkupStyle) -> String {
    let (bold, link, video) = match style {
        MarkupStyle::Markdown => ("**$1**", "[$2]($1)", "[YouTube]($1)"),
        MarkupStyle::Plain    => ("$1", "$2 ($1)", "$1"),
    };
    let text = html.replace('\r', "");
    let text = BR.replace_all(&text, "\n");
    let text = STRONG.replace_all(&text, bold);
    let text = BOLD.replace_all(&text, bold);
    let text = LIST_ITEM.replace_all(&text, "- $1\n");
    let text = LINK.replace_all(&text, link);
    let text = PARAGRAPH.replace_all(&text, "$1\n");
    let text = IFRAME.replace_all(&text, video);
    let text = ANY_TAG.replace_all(&text, "");
    let text = BLANKS.replace_all(&text, "\n");
    text.trim_end_matches('\n').to_owned()
}

pub fn html_to_markdown(html: &str) -> String {
    html_to_text(html, MarkupStyle::Markdown)
}

/// Source URL of the first `<img>` in the html, if any.
pub fn first_image(html: &str) -> Option<String> {
    IMG.captures_iter(html)
        .find_map(|img| IMG_SRC.captures(&img[1]).map(|src| src[1].to_owned()))
}

/// Splits a message into chunks of at most `limit` characters, breaking at
/// line ends. Discord limits: 2000 per message, 1024 per embed field value.
/// A line longer than the limit is cut at character boundaries. Joining the
/// chunks with `\n` gives back the message, blank lines included.
pub fn split_message(message: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    if message.chars().count() <= limit {
        return vec![message.to_owned()];
    }
    let mut chunks              = Vec::new();
    let mut pieces: Vec<String> = Vec::new();
    let mut current_len         = 0;
    for line in message.lines() {
        for piece in hard_wrap(line, limit) {
            let piece_len = piece.chars().count();
            // one separating newline per piece after the first
            let grown = if pieces.is_empty() { piece_len } else { current_len + 1 + piece_len };
            if grown > limit && !pieces.is_empty() {
                chunks.push(pieces.join("\n"));
                pieces.clear();
                current_len = piece_len;
            } else {
                current_len = grown;
            }
            pieces.push(piece);
        }
    }
    if !pieces.is_empty() {
        chunks.push(pieces.join("\n"));
    }
    chunks
}

fn hard_wrap(line: &str, width: usize) -> Vec<String> {
    if line.is_empty() {
        return vec![String::new()];
    }
    let chars: Vec<char> = line.chars().collect();
    chars.chunks(width).map(|c| c.iter().collect()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_conversion() {
        assert_eq!(html_to_text("<p>Hi</p><br><b>bold</b>", MarkupStyle::Plain), "Hi\nbold");
    }

    #[test]
    fn markdown_conversion() {
        let html = "<p>Patch notes</p>\r\n<ul><li>Fixed <i>stuff</i></li><li>New boss</li></ul>\
                    <strong>Important</strong><br/>\
                    <a href=\"https://tibia.com/news\" target=\"_blank\">read more</a>";
        let out = html_to_markdown(html);
        assert!(out.starts_with("Patch notes\n"));
        assert!(out.contains("- New boss"));
        assert!(out.contains("Fixed stuff"), "unknown tags are dropped: {}", out);
        assert!(out.contains("**Important**"));
        assert!(out.contains("[read more](https://tibia.com/news)"));
        assert!(!out.contains('<') && !out.contains('>'));
        assert!(!out.contains("\n\n"));
    }

    #[test]
    fn iframe_becomes_link() {
        let html = r#"<iframe src="https://youtube.com/embed/x" width="560"></iframe>"#;
        assert_eq!(html_to_markdown(html), "[YouTube](https://youtube.com/embed/x)");
        assert_eq!(html_to_text(html, MarkupStyle::Plain), "https://youtube.com/embed/x");
    }

    #[test]
    fn finds_first_image() {
        let html = r#"<p>x</p><img alt="no source"><img class="a" src="https://static.tibia.com/1.png">"#;
        assert_eq!(first_image(html).as_deref(), Some("https://static.tibia.com/1.png"));
        assert_eq!(first_image("<p>nothing</p>"), None);
    }

    #[test]
    fn short_message_is_not_split() {
        assert_eq!(split_message("hello\nworld", 2000), vec!["hello\nworld"]);
    }

    #[test]
    fn splits_at_line_breaks_without_losing_lines() {
        let msg = "aaaa\nbbbb\ncccc";
        let parts = split_message(msg, 10);
        assert_eq!(parts, vec!["aaaa\nbbbb", "cccc"]);
        assert!(parts.iter().all(|p| p.chars().count() <= 10));
    }

    #[test]
    fn blank_line_at_chunk_boundary_is_kept() {
        let parts = split_message("aaaa\n\nbbbb", 6);
        assert_eq!(parts, vec!["aaaa\n", "bbbb"]);
        assert_eq!(parts.join("\n"), "aaaa\n\nbbbb");
    }

    #[test]
    fn tiny_limits_are_still_honored() {
        assert_eq!(split_message("abc", 1), vec!["a", "b", "c"]);
        assert_eq!(split_message("ab", 0), vec!["a", "b"]);
        assert!(split_message("ab\ncd", 2).iter().all(|p| p.chars().count() <= 2));
    }

    #[test]
    fn overlong_line_is_cut() {
        let parts = split_message(&"x".repeat(25), 10);
        assert_eq!(parts.len(), 3);
        assert!(parts.iter().all(|p| p.chars().count() <= 10));
        assert_eq!(parts.concat().len(), 25);
    }
}
