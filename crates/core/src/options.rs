//! Conversion options.

use serde::Deserialize;

/// Elements whose contents are emitted untouched unless configured otherwise.
pub const DEFAULT_VERBATIM_TAGS: &[&str] = &["code", "pre"];

/// What a close tag does when it does not match the innermost open element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagPolicy {
    /// Fail the conversion with `ConversionError::TagMismatch`.
    #[default]
    Strict,
    /// Leave the tag stack as it was and carry on.
    Lenient,
    /// Pop open elements until the named one is closed or the stack is empty.
    Unravel,
}

/// How characters from the entity table are written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityStyle {
    /// `&eacute;`, `&amp;`
    #[default]
    Named,
    /// `&#233;`, `&#38;`
    Numeric,
}

/// Options for a single conversion.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Elements whose whole subtree is emitted unchanged.
    pub verbatim_tags: Vec<String>,
    /// Recovery policy for mismatched close tags.
    pub tag_policy: TagPolicy,
    /// Named or numeric references for general text.
    pub entity_style: EntityStyle,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            verbatim_tags: DEFAULT_VERBATIM_TAGS.iter().map(|s| s.to_string()).collect(),
            tag_policy: TagPolicy::default(),
            entity_style: EntityStyle::default(),
        }
    }
}

impl ConvertOptions {
    /// Replace the verbatim tag list.
    pub fn with_verbatim_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.verbatim_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set the close tag recovery policy.
    pub fn with_tag_policy(mut self, policy: TagPolicy) -> Self {
        self.tag_policy = policy;
        self
    }

    /// Set the entity style.
    pub fn with_entity_style(mut self, style: EntityStyle) -> Self {
        self.entity_style = style;
        self
    }

    /// Verbatim tag names lowercased, blanks dropped.
    pub(crate) fn normalized_verbatim_tags(&self) -> Vec<String> {
        self.verbatim_tags
            .iter()
            .map(|tag| tag.trim().to_ascii_lowercase())
            .filter(|tag| !tag.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_strict_named_code_pre() {
        let options = ConvertOptions::default();
        assert_eq!(options.verbatim_tags, vec!["code", "pre"]);
        assert_eq!(options.tag_policy, TagPolicy::Strict);
        assert_eq!(options.entity_style, EntityStyle::Named);
    }

    #[test]
    fn verbatim_tags_are_normalized() {
        let options = ConvertOptions::default().with_verbatim_tags(["PRE", " Script ", ""]);
        assert_eq!(options.normalized_verbatim_tags(), vec!["pre", "script"]);
    }

    #[test]
    fn deserializes_partial_config() {
        let options: ConvertOptions =
            serde_json::from_str(r#"{"tag_policy": "unravel"}"#).unwrap();
        assert_eq!(options.tag_policy, TagPolicy::Unravel);
        assert_eq!(options.verbatim_tags, vec!["code", "pre"]);

        let options: ConvertOptions = serde_json::from_str(
            r#"{"verbatim_tags": ["kbd"], "entity_style": "numeric"}"#,
        )
        .unwrap();
        assert_eq!(options.verbatim_tags, vec!["kbd"]);
        assert_eq!(options.entity_style, EntityStyle::Numeric);
    }
}
