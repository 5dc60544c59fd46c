mod blocking_tests;
mod config_tests;
mod request_tests;
mod types_tests;
