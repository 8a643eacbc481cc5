pub mod binder;
pub mod source;
