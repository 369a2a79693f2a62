pub mod deadline;

pub use deadline::{DeadlineExceeded, QUERY_DEADLINE, with_deadline};
