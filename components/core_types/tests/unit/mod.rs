//! Unit tests for core_types

mod test_error;
mod test_source;
mod test_value;
