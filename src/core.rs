use crate::attributes::FileAttributes;
use crate::cancel::CancellationToken;
use crate::encoding::EncodingSpec;
use crate::error::FsError;

pub type Result<T> = std::result::Result<T, FsError>;

/// File operations shared by every backend.
///
/// Code under test should depend on this trait; tests hand it a
/// [`MockFileSystem`](crate::MockFileSystem).
///
/// Text parameters accept `&str` or `None`. `None` is written as empty content, never rejected.
///
/// The `_async` methods behave exactly like their synchronous counterparts, except that they
/// first check the cancellation token. A cancelled token fails with
/// [`FsError::OperationCancelled`] before anything is looked up or mutated.
#[allow(async_fn_in_trait)]
pub trait FsBackend {
    /// Current working directory, used to resolve relative paths.
    fn current_dir(&self) -> &str;

    /// Changes the current working directory. The target must be an existing directory.
    fn set_current_dir(&mut self, path: &str) -> Result<()>;

    /// Encoding used by the methods that take no explicit encoding.
    fn default_encoding(&self) -> EncodingSpec;

    /// Line terminator used by the line-based methods.
    fn newline(&self) -> &str;

    /// Returns `true` if `path` is an existing file. Malformed paths are reported as absent.
    fn file_exists(&self, path: &str) -> bool;

    /// Returns `true` if `path` is an existing directory. Malformed paths are reported as absent.
    fn directory_exists(&self, path: &str) -> bool;

    /// Creates a directory and all its missing parents. Existing directories are not an error.
    fn create_directory(&mut self, path: &str) -> Result<()>;

    /// Directories report [`FileAttributes::DIRECTORY`].
    fn get_attributes(&self, path: &str) -> Result<FileAttributes>;

    fn set_attributes(&mut self, path: &str, attributes: FileAttributes) -> Result<()>;

    /// Deletes a file. A missing file is not an error, a missing parent directory is.
    fn delete_file(&mut self, path: &str) -> Result<()>;

    fn read_all_bytes(&self, path: &str) -> Result<Vec<u8>>;

    /// Reads text, honoring a byte-order marker and otherwise using the default encoding.
    fn read_all_text(&self, path: &str) -> Result<String>;

    fn read_all_text_encoded(&self, path: &str, encoding: EncodingSpec) -> Result<String>;

    /// Creates or overwrites a file with raw bytes.
    fn write_all_bytes(&mut self, path: &str, bytes: &[u8]) -> Result<()>;

    /// Creates or overwrites a file with `contents` encoded as `encoding`.
    ///
    /// # Errors
    /// - [`FsError::Argument`] / [`FsError::InvalidPath`]: empty, blank or malformed path;
    /// - [`FsError::UnauthorizedAccess`]: the path is a directory, or a hidden or read-only file;
    /// - [`FsError::DirectoryNotFound`]: the file is new and its parent directory is missing.
    ///
    /// Nothing is modified when an error is returned.
    fn write_all_text_encoded<'a>(
        &mut self,
        path: &str,
        contents: impl Into<Option<&'a str>>,
        encoding: EncodingSpec,
    ) -> Result<()>;

    /// Appends `contents` to a file, creating it when absent.
    ///
    /// The byte-order marker is only written when the file starts out empty.
    fn append_all_text_encoded<'a>(
        &mut self,
        path: &str,
        contents: impl Into<Option<&'a str>>,
        encoding: EncodingSpec,
    ) -> Result<()>;

    fn write_all_text<'a>(
        &mut self,
        path: &str,
        contents: impl Into<Option<&'a str>>,
    ) -> Result<()> {
        let encoding = self.default_encoding();
        self.write_all_text_encoded(path, contents, encoding)
    }

    /// Writes every line followed by the line terminator, the last one included.
    fn write_all_lines_encoded<I>(
        &mut self,
        path: &str,
        lines: I,
        encoding: EncodingSpec,
    ) -> Result<()>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let text = join_lines(lines, self.newline());
        self.write_all_text_encoded(path, text.as_str(), encoding)
    }

    fn write_all_lines<I>(&mut self, path: &str, lines: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let encoding = self.default_encoding();
        self.write_all_lines_encoded(path, lines, encoding)
    }

    fn append_all_text<'a>(
        &mut self,
        path: &str,
        contents: impl Into<Option<&'a str>>,
    ) -> Result<()> {
        let encoding = self.default_encoding();
        self.append_all_text_encoded(path, contents, encoding)
    }

    fn append_all_lines<I>(&mut self, path: &str, lines: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let text = join_lines(lines, self.newline());
        self.append_all_text(path, text.as_str())
    }

    /// Splits on `\r\n`, `\n` or `\r`. A trailing terminator does not produce an empty last line.
    fn read_all_lines(&self, path: &str) -> Result<Vec<String>> {
        Ok(split_lines(&self.read_all_text(path)?))
    }

    async fn write_all_text_async<'a>(
        &mut self,
        path: &str,
        contents: impl Into<Option<&'a str>>,
        token: &CancellationToken,
    ) -> Result<()> {
        token.check()?;
        self.write_all_text(path, contents)
    }

    async fn write_all_text_encoded_async<'a>(
        &mut self,
        path: &str,
        contents: impl Into<Option<&'a str>>,
        encoding: EncodingSpec,
        token: &CancellationToken,
    ) -> Result<()> {
        token.check()?;
        self.write_all_text_encoded(path, contents, encoding)
    }

    async fn write_all_lines_async<I>(
        &mut self,
        path: &str,
        lines: I,
        token: &CancellationToken,
    ) -> Result<()>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        token.check()?;
        self.write_all_lines(path, lines)
    }

    async fn write_all_lines_encoded_async<I>(
        &mut self,
        path: &str,
        lines: I,
        encoding: EncodingSpec,
        token: &CancellationToken,
    ) -> Result<()>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        token.check()?;
        self.write_all_lines_encoded(path, lines, encoding)
    }

    async fn write_all_bytes_async(
        &mut self,
        path: &str,
        bytes: &[u8],
        token: &CancellationToken,
    ) -> Result<()> {
        token.check()?;
        self.write_all_bytes(path, bytes)
    }

    async fn append_all_text_async<'a>(
        &mut self,
        path: &str,
        contents: impl Into<Option<&'a str>>,
        token: &CancellationToken,
    ) -> Result<()> {
        token.check()?;
        self.append_all_text(path, contents)
    }

    async fn read_all_bytes_async(
        &self,
        path: &str,
        token: &CancellationToken,
    ) -> Result<Vec<u8>> {
        token.check()?;
        self.read_all_bytes(path)
    }

    async fn read_all_text_async(&self, path: &str, token: &CancellationToken) -> Result<String> {
        token.check()?;
        self.read_all_text(path)
    }
}

/// Concatenates `lines`, terminating each one with `newline`.
pub(crate) fn join_lines<I>(lines: I, newline: &str) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut text = String::new();
    for line in lines {
        text.push_str(line.as_ref());
        text.push_str(newline);
    }
    text
}

pub(crate) fn split_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                lines.push(std::mem::take(&mut current));
            }
            '\n' => lines.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
