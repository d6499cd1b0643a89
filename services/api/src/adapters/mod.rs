pub mod db;
pub mod file_store;
pub mod gemini;
pub mod prompts;

pub use db::PgIssueStore;
pub use file_store::FileIssueStore;
pub use gemini::GeminiAdapter;
