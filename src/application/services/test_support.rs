//! In-memory entity client shared by the service tests

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::application::ports::outbound::{EntityClientPort, FetchError, ListSlice};
use crate::domain::entities::{EntityDetails, EntitySummary, Sprites};
use crate::domain::services::{filter_by_name_fragment, paginate_locally};
use crate::domain::value_objects::EntityId;

/// A call observed by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ById(u32),
    ByName(String),
    ListPage { offset: u32, limit: u32 },
    Category { name: String, offset: u32, limit: u32 },
    Fragment(String),
}

pub fn entity(id: u32, name: &str) -> EntityDetails {
    EntityDetails {
        id: EntityId::new(id),
        name: name.to_string(),
        height_decimeters: 7,
        weight_decigrams: 69,
        base_experience: Some(64),
        abilities: vec![],
        stats: vec![],
        types: vec![],
        sprites: Sprites::default(),
    }
}

fn summary_of(entity: &EntityDetails) -> EntitySummary {
    EntitySummary {
        id: entity.id,
        name: entity.name.clone(),
        source_url: format!("https://pokeapi.co/api/v2/pokemon/{}/", entity.id),
    }
}

#[derive(Default)]
pub struct MockCatalog {
    entities: Vec<EntityDetails>,
    categories: HashMap<String, Vec<u32>>,
    failing_ids: HashSet<u32>,
    broken_names: HashSet<String>,
    delay: Option<Duration>,
    calls: Mutex<Vec<Call>>,
    id_fetches: AtomicUsize,
}

impl MockCatalog {
    /// Catalog of `count` entities named `mon-<id>`
    pub fn with_entities(count: u32) -> Self {
        Self {
            entities: (1..=count).map(|id| entity(id, &format!("mon-{id}"))).collect(),
            ..Default::default()
        }
    }

    pub fn with_named(entities: Vec<EntityDetails>) -> Self {
        Self {
            entities,
            ..Default::default()
        }
    }

    pub fn category(mut self, name: &str, ids: Vec<u32>) -> Self {
        self.categories.insert(name.to_string(), ids);
        self
    }

    pub fn failing_id(mut self, id: u32) -> Self {
        self.failing_ids.insert(id);
        self
    }

    /// Name lookups for `name` fail with a transport error
    pub fn broken_name(mut self, name: &str) -> Self {
        self.broken_names.insert(name.to_string());
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn id_fetches(&self) -> usize {
        self.id_fetches.load(Ordering::SeqCst)
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn summaries(&self) -> Vec<EntitySummary> {
        self.entities.iter().map(summary_of).collect()
    }
}

#[async_trait]
impl EntityClientPort for MockCatalog {
    async fn fetch_by_id(&self, id: EntityId) -> Result<EntityDetails, FetchError> {
        self.record(Call::ById(id.value()));
        self.id_fetches.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        if self.failing_ids.contains(&id.value()) {
            return Err(FetchError::Network(format!("connection reset fetching {id}")));
        }
        self.entities
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(format!("pokemon/{id}")))
    }

    async fn fetch_by_name(&self, name: &str) -> Result<EntityDetails, FetchError> {
        self.record(Call::ByName(name.to_string()));
        self.pause().await;
        if self.broken_names.contains(name) {
            return Err(FetchError::Network("dns failure".to_string()));
        }
        self.entities
            .iter()
            .find(|e| e.name == name || e.id.to_string() == name)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(format!("pokemon/{name}")))
    }

    async fn fetch_list_page(&self, offset: u32, limit: u32) -> Result<ListSlice, FetchError> {
        self.record(Call::ListPage { offset, limit });
        self.pause().await;
        let page = paginate_locally(self.summaries(), offset, limit);
        Ok(ListSlice {
            summaries: page.items,
            total: page.total,
            next: page.has_next.then(|| "next".to_string()),
            previous: page.has_previous.then(|| "previous".to_string()),
        })
    }

    async fn fetch_by_category(
        &self,
        category: &str,
        offset: u32,
        limit: u32,
    ) -> Result<ListSlice, FetchError> {
        self.record(Call::Category {
            name: category.to_string(),
            offset,
            limit,
        });
        self.pause().await;
        let ids = self
            .categories
            .get(category)
            .ok_or_else(|| FetchError::NotFound(format!("type/{category}")))?;
        let members: Vec<EntitySummary> = ids
            .iter()
            .map(|id| EntitySummary {
                id: EntityId::new(*id),
                name: format!("mon-{id}"),
                source_url: format!("https://pokeapi.co/api/v2/pokemon/{id}/"),
            })
            .collect();
        let page = paginate_locally(members, offset, limit);
        Ok(ListSlice {
            summaries: page.items,
            total: page.total,
            next: page.has_next.then(|| "has-next".to_string()),
            previous: page.has_previous.then(|| "has-previous".to_string()),
        })
    }

    async fn fetch_by_name_fragment(
        &self,
        fragment: &str,
    ) -> Result<Vec<EntitySummary>, FetchError> {
        self.record(Call::Fragment(fragment.to_string()));
        self.pause().await;
        Ok(filter_by_name_fragment(self.summaries(), fragment))
    }
}
