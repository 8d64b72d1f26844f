mod mock_fs;
mod record;
mod store;

pub use mock_fs::MockFileSystem;
pub use record::FileData;
