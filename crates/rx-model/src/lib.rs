pub mod columns;
pub mod error;
pub mod options;
pub mod records;
pub mod stage;

pub use error::{ErrorKind, ReorderError, Result, StageError};
pub use options::ReorderOptions;
pub use records::{PendingPoRecord, RawBatchRecord, RawStockRecord};
pub use stage::Stage;
