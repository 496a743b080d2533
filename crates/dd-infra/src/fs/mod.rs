mod session_file_store;

pub use session_file_store::JsonSessionStore;
