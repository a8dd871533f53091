pub mod row;
pub mod schema;
pub mod store;

pub use row::{PersistentIou, QueryableState, project, projection_key};
pub use schema::{ColumnDef, IOU_SCHEMA_V1, IndexDef, MappedSchema, SchemaError};
pub use store::ProjectionStore;
