// Engine module - pure view-model processing (filtering, selection, bucketing, paging)
// This layer sits between raw records (types) and the runtime orchestrator

pub mod buckets;
pub mod filter;
pub mod paging;
pub mod selection;
pub mod view;

pub use buckets::{bucket_records, parse_timestamp, Bucket, BucketConfig, BucketSpec, Bucketed};
pub use filter::{filter_records, matches};
pub use paging::paginate;
pub use selection::{Selection, SelectionCatalog, SelectionMode, SelectionResolver};
pub use view::{build_bucketed_view, build_view, BucketedView, TableView};
