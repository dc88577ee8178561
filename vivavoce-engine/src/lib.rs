pub mod controller;
pub mod session;
pub mod traits;

pub use controller::{SessionController, SessionError};
pub use session::{Session, SessionStatus};
pub use traits::{ReportSink, ResponseRecorder, negotiate_encoding};
