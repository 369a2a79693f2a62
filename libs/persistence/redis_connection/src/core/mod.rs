pub mod backend;
pub mod error;
pub mod key;
pub mod type_bind;
pub mod value;

// Re-export commonly used items
pub use backend::CacheBackend;
pub use error::{CacheError, CacheResult};
pub use key::{CacheKey, CacheKeyAutoConstruct};
pub use type_bind::CacheTypeBind;
pub use value::{CacheValue, Json};
