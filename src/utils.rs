//! String helpers for deriving navigation entries from file names.
//!
//! - Title casing for hub, section and article titles
//! - Article descriptors built from markdown file names
//! - File-name predicates shared by the scanner

use crate::models::Article;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Extension that marks a file as an article.
pub const MARKDOWN_EXT: &str = ".md";

/// A token starts at a word character and runs until the next whitespace.
static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w\S*").expect("valid title-case regex"));

/// Convert text to title case.
///
/// Each token gets its first character upper-cased and the remainder
/// lower-cased. Characters outside tokens (whitespace, leading punctuation)
/// are left as they are.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(title_case("quick start"), "Quick Start");
/// assert_eq!(title_case("faq"), "Faq");
/// assert_eq!(title_case("SAML SSO"), "Saml Sso");
/// ```
pub fn title_case(text: &str) -> String {
    WORD.replace_all(text, |caps: &Captures| capitalize(&caps[0]))
        .into_owned()
}

/// Upper-case the first character and lower-case the rest.
fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => {
            let mut out: String = first.to_uppercase().collect();
            out.push_str(&chars.as_str().to_lowercase());
            out
        }
    }
}

/// Title for a hub, section or article derived from its href.
pub fn title_from_href(href: &str) -> String {
    title_case(&href.replace('-', " "))
}

/// Build the `{href, title}` descriptor for a markdown file name.
///
/// The href is the file name without its trailing `.md`; the title is the
/// href with hyphens turned into spaces, in title case.
pub fn article_descriptor(filename: &str) -> Article {
    let href = filename.strip_suffix(MARKDOWN_EXT).unwrap_or(filename);
    Article {
        href: href.to_string(),
        title: title_from_href(href),
    }
}

/// True if the file name carries the markdown extension.
pub fn is_markdown(filename: &str) -> bool {
    filename.len() > MARKDOWN_EXT.len() && filename.ends_with(MARKDOWN_EXT)
}

/// Dotfiles (`.DS_Store`, `.gitkeep`, ...) are never part of the content tree.
pub fn is_hidden(filename: &str) -> bool {
    filename.starts_with('.')
}
