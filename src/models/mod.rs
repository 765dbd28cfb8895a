pub mod capture_method;
pub mod record;
pub mod student;
pub mod sync_state;

pub use capture_method::CaptureMethod;
pub use record::AttendanceRecord;
pub use student::Student;
pub use sync_state::SyncState;
