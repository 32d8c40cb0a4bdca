mod file_contents;

pub use file_contents::GhFileContents;
