use crate::server::data::session_activity::SessionActivityRepository;
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory::session_activity::SessionActivityFactory};

mod find_by_session_id;
