pub mod session_echo;
