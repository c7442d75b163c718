pub use super::session_activity::Entity as SessionActivity;
