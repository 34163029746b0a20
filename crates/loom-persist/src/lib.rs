pub mod error;
pub mod models;
pub mod mongo;
pub mod store;

pub use error::StoreError;
pub use models::{derive_title, GenerationMeta, MessageRole, StoredMessage, Thread, Usage};
pub use mongo::MongoChatStore;
pub use store::{ChatStore, ThreadPage};

pub use mongodb::bson::oid::ObjectId;
