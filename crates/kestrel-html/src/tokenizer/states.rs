use strum_macros::Display;

/// Tokenizer states.
///
/// `InEntity` hands bytes to the entity decoder and returns to the state it
/// was entered from once the reference is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum State {
    /// Character data.
    Text,
    /// After `<`.
    BeforeTagName,
    /// Inside a start tag name.
    InTagName,
    /// After `/` inside a start tag.
    InSelfClosingTag,
    /// After `</`.
    BeforeClosingTagName,
    /// Inside an end tag name.
    InClosingTagName,
    /// After an end tag name, skipping to `>`.
    AfterClosingTagName,
    /// Between attributes.
    BeforeAttributeName,
    /// Inside an attribute name.
    InAttributeName,
    /// After an attribute name, before `=` or the next attribute.
    AfterAttributeName,
    /// After `=`.
    BeforeAttributeValue,
    /// Inside `"..."`.
    InAttributeValueDq,
    /// Inside `'...'`.
    InAttributeValueSq,
    /// Inside an unquoted value.
    InAttributeValueNq,
    /// After `<!`.
    BeforeDeclaration,
    /// Inside `<!...>`.
    InDeclaration,
    /// Inside `<?...>`.
    InProcessingInstruction,
    /// After `<!-`.
    BeforeComment,
    /// Matching `CDATA[` after `<![`.
    CdataSequence,
    /// Inside `</...>` that does not start with a letter.
    InSpecialComment,
    /// Inside a comment or CDATA section, looking for its terminator.
    InCommentLike,
    /// After `<s`: could be `script` or `style`.
    BeforeSpecialS,
    /// After `<t`: could be `title` or `textarea`.
    BeforeSpecialT,
    /// Matching the rest of a raw-text element's name.
    SpecialStartSequence,
    /// Raw-text body, looking for the matching end tag.
    InSpecialTag,
    /// Inside a character reference.
    InEntity,
}

impl State {
    /// States in which the current section is part of an attribute value.
    pub(crate) const fn is_attribute_value(self) -> bool {
        matches!(
            self,
            Self::InAttributeValueDq | Self::InAttributeValueSq | Self::InAttributeValueNq
        )
    }

    /// States that are inside an unfinished tag. Input ending here drops the
    /// tag.
    pub(crate) const fn is_inside_tag(self) -> bool {
        matches!(
            self,
            Self::InTagName
                | Self::BeforeSpecialS
                | Self::BeforeSpecialT
                | Self::SpecialStartSequence
                | Self::InSelfClosingTag
                | Self::BeforeAttributeName
                | Self::InAttributeName
                | Self::AfterAttributeName
                | Self::BeforeAttributeValue
                | Self::InAttributeValueDq
                | Self::InAttributeValueSq
                | Self::InAttributeValueNq
                | Self::InClosingTagName
                | Self::AfterClosingTagName
        )
    }
}
