mod directory;

pub use directory::DirectoryReader;
