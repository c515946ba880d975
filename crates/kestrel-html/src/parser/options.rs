use serde::Deserialize;

use crate::tokenizer::TokenizerOptions;

/// Parser configuration.
///
/// Unset `Option` fields follow `xml_mode`: tag and attribute names are
/// lower-cased in HTML mode, and `/>` closes elements in XML mode. The
/// struct deserializes from camelCase keys, so
/// `{"xmlMode": true, "lowerCaseTags": true}` is a valid configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParserOptions {
    /// Parse as XML: no implicit closes, void elements or raw-text bodies,
    /// and only the five XML entities.
    pub xml_mode: bool,
    /// Decode character references.
    pub decode_entities: bool,
    /// Lower-case tag names.
    pub lower_case_tags: Option<bool>,
    /// Lower-case attribute names.
    pub lower_case_attribute_names: Option<bool>,
    /// Honor `/>` on elements that are not void.
    pub recognize_self_closing: Option<bool>,
    /// Report CDATA sections as CDATA in HTML mode instead of as comments.
    #[serde(rename = "recognizeCDATA", alias = "recognizeCdata")]
    pub recognize_cdata: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            xml_mode: false,
            decode_entities: true,
            lower_case_tags: None,
            lower_case_attribute_names: None,
            recognize_self_closing: None,
            recognize_cdata: false,
        }
    }
}

impl ParserOptions {
    /// HTML defaults.
    #[must_use]
    pub fn html() -> Self {
        Self::default()
    }

    /// XML defaults.
    #[must_use]
    pub fn xml() -> Self {
        Self::default().with_xml_mode(true)
    }

    /// Set [`Self::xml_mode`].
    #[must_use]
    pub const fn with_xml_mode(mut self, xml_mode: bool) -> Self {
        self.xml_mode = xml_mode;
        self
    }

    /// Set [`Self::decode_entities`].
    #[must_use]
    pub const fn with_decode_entities(mut self, decode: bool) -> Self {
        self.decode_entities = decode;
        self
    }

    /// Set [`Self::lower_case_tags`].
    #[must_use]
    pub const fn with_lower_case_tags(mut self, lower: bool) -> Self {
        self.lower_case_tags = Some(lower);
        self
    }

    /// Set [`Self::lower_case_attribute_names`].
    #[must_use]
    pub const fn with_lower_case_attribute_names(mut self, lower: bool) -> Self {
        self.lower_case_attribute_names = Some(lower);
        self
    }

    /// Set [`Self::recognize_self_closing`].
    #[must_use]
    pub const fn with_recognize_self_closing(mut self, recognize: bool) -> Self {
        self.recognize_self_closing = Some(recognize);
        self
    }

    /// Set [`Self::recognize_cdata`].
    #[must_use]
    pub const fn with_recognize_cdata(mut self, recognize: bool) -> Self {
        self.recognize_cdata = recognize;
        self
    }

    /// Whether tag names are lower-cased.
    #[must_use]
    pub fn lowers_tags(self) -> bool {
        self.lower_case_tags.unwrap_or(!self.xml_mode)
    }

    /// Whether attribute names are lower-cased.
    #[must_use]
    pub fn lowers_attribute_names(self) -> bool {
        self.lower_case_attribute_names.unwrap_or(!self.xml_mode)
    }

    /// Whether `/>` closes any element.
    #[must_use]
    pub fn recognizes_self_closing(self) -> bool {
        self.recognize_self_closing.unwrap_or(self.xml_mode)
    }

    /// Whether CDATA sections are reported as CDATA.
    #[must_use]
    pub const fn recognizes_cdata(self) -> bool {
        self.xml_mode || self.recognize_cdata
    }

    /// The tokenizer settings these options imply.
    #[must_use]
    pub const fn tokenizer_options(self) -> TokenizerOptions {
        TokenizerOptions {
            xml_mode: self.xml_mode,
            decode_entities: self.decode_entities,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_mode() {
        let html = ParserOptions::html();
        assert!(html.lowers_tags());
        assert!(html.lowers_attribute_names());
        assert!(!html.recognizes_self_closing());
        assert!(!html.recognizes_cdata());

        let xml = ParserOptions::xml();
        assert!(!xml.lowers_tags());
        assert!(xml.recognizes_self_closing());
        assert!(xml.recognizes_cdata());
    }

    #[test]
    fn test_explicit_settings_override_mode() {
        let options = ParserOptions::xml()
            .with_lower_case_tags(true)
            .with_recognize_self_closing(false);
        assert!(options.lowers_tags());
        assert!(!options.lowers_attribute_names());
        assert!(!options.recognizes_self_closing());
    }
}
