pub mod holding;
