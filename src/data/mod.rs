mod html;
mod storage;
mod trivia;

pub use html::decode_entities;
pub use storage::{load_json, FileStorage, MemoryStorage, Storage, StorageError};
pub use trivia::{
    check_questions, FetchError, OpenTriviaClient, RawQuestion, TriviaResponse, TriviaSource,
    DEFAULT_ENDPOINT,
};
