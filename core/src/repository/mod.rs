pub mod file;
pub mod sheet;
pub mod traits;

// Re-export
pub use file::FileLeaveRepository;
pub use sheet::SheetRepository;
pub use traits::LeaveRepository;
