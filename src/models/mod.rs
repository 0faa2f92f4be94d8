pub mod format;
pub mod quality;
pub mod review_record;
pub mod review_session;
pub mod scheduler;
pub mod sm2;

pub use quality::{Quality, map_user_signal_to_quality};
pub use review_record::{ReviewRecord, create_record};
pub use review_session::{ReviewSession, SessionSummary};
pub use scheduler::{ReviewState, StatusView, due_count, is_due, prioritize, status};
pub use sm2::advance;
