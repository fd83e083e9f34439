//! Line-oriented metadata scanner.
//!
//! Recognized lines (exact prefix match, any position in the file):
//!
//! ```text
//! title: Hello
//! description: A short summary
//! descriptionImage: images/cover.png
//! tags: ["rust", "cli"]
//! ```
//!
//! Every other line is ignored. When a prefix appears more than once the last
//! occurrence wins.

pub const TITLE_PREFIX: &str = "title: ";
pub const DESCRIPTION_PREFIX: &str = "description: ";
pub const DESCRIPTION_IMAGE_PREFIX: &str = "descriptionImage: ";
pub const TAGS_PREFIX: &str = "tags: ";

/// Fields pulled out of a file's content
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub description_image: Option<String>,
    /// `None` when the file has no `tags: ` line
    pub tags: Option<Vec<String>>,
}

impl Metadata {
    /// Scan raw content for metadata lines
    pub fn parse(content: &str) -> Self {
        let mut meta = Self::default();

        for line in content.split('\n') {
            if let Some(value) = line.strip_prefix(TITLE_PREFIX) {
                meta.title = Some(value.to_string());
            }
            if let Some(value) = line.strip_prefix(DESCRIPTION_PREFIX) {
                meta.description = Some(value.to_string());
            }
            if let Some(value) = line.strip_prefix(DESCRIPTION_IMAGE_PREFIX) {
                meta.description_image = Some(value.to_string());
            }
            if let Some(value) = line.strip_prefix(TAGS_PREFIX) {
                meta.tags = Some(parse_tag_list(value));
            }
        }

        meta
    }
}

/// Parse a tag-list literal such as `["a", "b"]`, `[a, b]` or `a, b`.
///
/// Surrounding whitespace is dropped, then one leading `[` and one trailing
/// `]` are removed. The rest is split on commas, and each piece is trimmed of
/// whitespace and surrounding quotes.
/// An empty literal yields a single empty tag.
pub fn parse_tag_list(raw: &str) -> Vec<String> {
    let mut list = raw.trim();
    list = list.strip_prefix('[').unwrap_or(list);
    list = list.strip_suffix(']').unwrap_or(list);

    list.split(',').map(clean_tag).collect()
}

fn clean_tag(tag: &str) -> String {
    tag.trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_fields() {
        let meta = Metadata::parse("title: Hello\ndescription: World\ntags: [\"a\", \"b\", \"c\"]");

        assert_eq!(meta.title.as_deref(), Some("Hello"));
        assert_eq!(meta.description.as_deref(), Some("World"));
        assert_eq!(meta.description_image, None);
        assert_eq!(
            meta.tags,
            Some(vec!["a".to_string(), "b".to_string(), "c".to_string()])
        );
    }

    #[test]
    fn test_last_occurrence_wins() {
        let meta = Metadata::parse("title: First\nbody text\ntitle: Second\n");
        assert_eq!(meta.title.as_deref(), Some("Second"));
    }

    #[test]
    fn test_description_image_does_not_match_description() {
        let meta = Metadata::parse("descriptionImage: cover.png\n");

        assert_eq!(meta.description_image.as_deref(), Some("cover.png"));
        assert_eq!(meta.description, None);
    }

    #[test]
    fn test_prefix_must_be_exact() {
        let meta = Metadata::parse("Title: Nope\n title: Indented\ntitle:NoSpace\n");
        assert_eq!(meta.title, None);
    }

    #[test]
    fn test_values_are_not_trimmed() {
        let meta = Metadata::parse("title:   padded  \r\n");
        assert_eq!(meta.title.as_deref(), Some("  padded  \r"));
    }

    #[test]
    fn test_no_metadata() {
        assert_eq!(Metadata::parse("just some prose\nand more"), Metadata::default());
        assert_eq!(Metadata::parse(""), Metadata::default());
    }

    #[test]
    fn test_tag_list_variants() {
        assert_eq!(parse_tag_list("[rust, cli]"), vec!["rust", "cli"]);
        assert_eq!(parse_tag_list("rust,cli"), vec!["rust", "cli"]);
        assert_eq!(parse_tag_list("['one', 'two']"), vec!["one", "two"]);
        assert_eq!(parse_tag_list("[\"solo\"]"), vec!["solo"]);
    }

    #[test]
    fn test_empty_tag_list_keeps_single_empty_tag() {
        assert_eq!(parse_tag_list("[]"), vec![""]);
        assert_eq!(parse_tag_list(""), vec![""]);
    }

    #[test]
    fn test_brackets_stripped_once() {
        assert_eq!(parse_tag_list("[[a]]"), vec!["[a]"]);
    }

    #[test]
    fn test_tags_line_trailing_carriage_return() {
        let meta = Metadata::parse("tags: [a, b]\r\n");
        assert_eq!(meta.tags, Some(vec!["a".to_string(), "b".to_string()]));
    }
}
