//! Detail Service - Resolves a single entity for the detail view

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::ports::outbound::{EntityClientPort, FetchError};
use crate::domain::entities::EntityDetails;
use crate::domain::value_objects::EntityId;

#[derive(Clone)]
pub struct DetailService {
    client: Arc<dyn EntityClientPort>,
}

impl DetailService {
    pub fn new(client: Arc<dyn EntityClientPort>) -> Self {
        Self { client }
    }

    #[instrument(skip(self))]
    pub async fn resolve_details(&self, id: EntityId) -> Result<EntityDetails, FetchError> {
        debug!(entity_id = %id, "Fetching entity details");
        self.client.fetch_by_id(id).await
    }
}
