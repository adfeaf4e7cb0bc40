//! Domain services - Pure operations over catalog data

mod pagination;
mod references;

pub use pagination::{filter_by_name_fragment, paginate_locally, LocalPage};
pub use references::extract_id_from_url;
