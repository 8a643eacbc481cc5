pub mod command;
pub mod dispatcher;
pub mod engine_session;
