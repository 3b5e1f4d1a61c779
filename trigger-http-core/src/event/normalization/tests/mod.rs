mod cookie_tests;
mod header_tests;
