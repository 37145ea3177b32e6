mod reader_tests;
mod test_utils;
