use crate::attributes::FileAttributes;
use crate::encoding::EncodingSpec;

/// Content and attributes of a single file.
///
/// The byte content is the only source of truth; [`FileData::text_contents`] decodes it on every
/// call, so the text view can never drift from the bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileData {
    contents: Vec<u8>,
    attributes: FileAttributes,
}

impl FileData {
    /// A normal file holding `contents`.
    pub fn new(contents: impl Into<Vec<u8>>) -> FileData {
        FileData {
            contents: contents.into(),
            attributes: FileAttributes::NORMAL,
        }
    }

    /// A normal file holding `text` as UTF-8 without a byte-order marker.
    pub fn from_text(text: &str) -> FileData {
        Self::from_text_encoded(text, EncodingSpec::default())
    }

    pub fn from_text_encoded(text: &str, encoding: EncodingSpec) -> FileData {
        Self::new(encoding.encode(text))
    }

    pub fn with_attributes(mut self, attributes: FileAttributes) -> FileData {
        self.set_attributes(attributes);
        self
    }

    pub fn contents(&self) -> &[u8] {
        &self.contents
    }

    /// Decodes the content, honoring a leading byte-order marker and falling back to UTF-8.
    pub fn text_contents(&self) -> String {
        EncodingSpec::decode_detected(&self.contents, EncodingSpec::default())
    }

    pub fn text_contents_encoded(&self, encoding: EncodingSpec) -> String {
        encoding.decode(&self.contents)
    }

    pub fn attributes(&self) -> FileAttributes {
        self.attributes
    }

    pub fn is_hidden(&self) -> bool {
        self.attributes.contains(FileAttributes::HIDDEN)
    }

    pub fn is_read_only(&self) -> bool {
        self.attributes.contains(FileAttributes::READ_ONLY)
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    pub(crate) fn set_contents(&mut self, contents: Vec<u8>) {
        self.contents = contents;
    }

    pub(crate) fn append_contents(&mut self, contents: &[u8]) {
        self.contents.extend_from_slice(contents);
    }

    /// Files never carry the `DIRECTORY` flag.
    pub(crate) fn set_attributes(&mut self, attributes: FileAttributes) {
        let mut attributes = attributes;
        attributes.remove(FileAttributes::DIRECTORY);
        self.attributes = attributes.normalized();
    }
}

impl Default for FileData {
    fn default() -> Self {
        FileData::new(Vec::new())
    }
}
