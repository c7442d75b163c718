mod session_activity;
