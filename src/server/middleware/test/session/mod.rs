use crate::server::middleware::session::{ensure_session_id, ActivitySession, AuthSession};
use test_utils::{builder::TestBuilder, error::TestError};

mod activity_session;
