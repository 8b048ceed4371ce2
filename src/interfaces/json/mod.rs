pub mod report;
pub mod session_file;
