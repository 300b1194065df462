mod password_reset_test;
mod register_test;
mod router_test;
mod session_test;
