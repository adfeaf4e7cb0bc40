//! PokeAPI client for the creature catalog

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::application::ports::outbound::{EntityClientPort, FetchError, ListSlice};
use crate::domain::entities::{
    Ability, AnimatedSprites, EntityDetails, EntitySummary, Sprites, Stat, TypeSlot,
};
use crate::domain::services::{extract_id_from_url, filter_by_name_fragment, paginate_locally};
use crate::domain::value_objects::EntityId;

/// Cursor markers for category pages, which the remote does not paginate
const HAS_NEXT: &str = "has-next";
const HAS_PREVIOUS: &str = "has-previous";

/// Number of catalog entries scanned by a fragment search
pub const DEFAULT_SEARCH_CANDIDATE_LIMIT: u32 = 1000;

/// Client for the PokeAPI REST API
pub struct PokeApiClient {
    client: Client,
    base_url: String,
    search_candidate_limit: u32,
}

impl PokeApiClient {
    pub fn new(base_url: &str, search_candidate_limit: u32) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            search_candidate_limit,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build `<base>/<segments...>`, percent-encoding each segment.
    ///
    /// Empty, `.` and `..` segments would be dropped or resolved by the URL
    /// parser and address a different resource, so no such resource exists.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        if let Some(segment) = segments
            .iter()
            .find(|segment| matches!(**segment, "" | "." | ".."))
        {
            return Err(FetchError::NotFound(format!(
                "no resource named {:?}",
                segment
            )));
        }

        let mut url = Url::parse(&self.base_url).map_err(|e| {
            FetchError::InvalidQuery(format!("bad base URL {}: {}", self.base_url, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                FetchError::InvalidQuery(format!("base URL cannot take a path: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, u32)],
    ) -> Result<T, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .query(query)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(url.path().to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response.json::<T>().await.map_err(transport_error)
    }

    async fn fetch_details(&self, id_or_name: &str) -> Result<EntityDetails, FetchError> {
        let url = self.endpoint(&["pokemon", id_or_name])?;
        let details: DetailsResponse = self.get_json(url, &[]).await?;
        Ok(details.into())
    }

    async fn fetch_summaries(&self, offset: u32, limit: u32) -> Result<ListResponse, FetchError> {
        let url = self.endpoint(&["pokemon"])?;
        self.get_json(url, &[("offset", offset), ("limit", limit)])
            .await
    }

}

fn transport_error(e: reqwest::Error) -> FetchError {
    if e.is_decode() {
        FetchError::Decode(e.to_string())
    } else {
        FetchError::Network(e.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct NamedResource {
    name: String,
    url: String,
}

impl From<NamedResource> for EntitySummary {
    fn from(resource: NamedResource) -> Self {
        Self {
            id: extract_id_from_url(&resource.url),
            name: resource.name,
            source_url: resource.url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    count: u32,
    next: Option<String>,
    previous: Option<String>,
    #[serde(default)]
    results: Vec<NamedResource>,
}

#[derive(Debug, Deserialize)]
struct TypeResponse {
    name: String,
    #[serde(default)]
    pokemon: Vec<TypeMember>,
}

#[derive(Debug, Deserialize)]
struct TypeMember {
    pokemon: NamedResource,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    id: u32,
    name: String,
    #[serde(default)]
    height: u32,
    #[serde(default)]
    weight: u32,
    base_experience: Option<u32>,
    #[serde(default)]
    abilities: Vec<AbilityEntry>,
    #[serde(default)]
    stats: Vec<StatEntry>,
    #[serde(default)]
    types: Vec<TypeEntry>,
    #[serde(default)]
    sprites: SpritesResponse,
}

#[derive(Debug, Deserialize)]
struct AbilityEntry {
    ability: NamedResource,
    is_hidden: bool,
    slot: u32,
}

#[derive(Debug, Deserialize)]
struct StatEntry {
    base_stat: u32,
    effort: u32,
    stat: NamedResource,
}

#[derive(Debug, Deserialize)]
struct TypeEntry {
    slot: u32,
    #[serde(rename = "type")]
    kind: NamedResource,
}

#[derive(Debug, Default, Deserialize)]
struct SpritesResponse {
    front_default: Option<String>,
    front_shiny: Option<String>,
    front_female: Option<String>,
    front_shiny_female: Option<String>,
    other: Option<OtherSprites>,
    versions: Option<VersionSprites>,
}

#[derive(Debug, Deserialize)]
struct OtherSprites {
    #[serde(rename = "official-artwork")]
    official_artwork: Option<ArtworkSprites>,
}

#[derive(Debug, Deserialize)]
struct ArtworkSprites {
    front_default: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VersionSprites {
    #[serde(rename = "generation-v")]
    generation_v: Option<GenerationVSprites>,
}

#[derive(Debug, Deserialize)]
struct GenerationVSprites {
    #[serde(rename = "black-white")]
    black_white: Option<BlackWhiteSprites>,
}

#[derive(Debug, Deserialize)]
struct BlackWhiteSprites {
    animated: Option<AnimatedResponse>,
}

#[derive(Debug, Deserialize)]
struct AnimatedResponse {
    front_default: Option<String>,
    front_female: Option<String>,
    front_shiny: Option<String>,
    front_shiny_female: Option<String>,
}

impl From<SpritesResponse> for Sprites {
    fn from(sprites: SpritesResponse) -> Self {
        let official_artwork = sprites
            .other
            .and_then(|other| other.official_artwork)
            .and_then(|artwork| artwork.front_default);
        let animated = sprites
            .versions
            .and_then(|v| v.generation_v)
            .and_then(|g| g.black_white)
            .and_then(|bw| bw.animated)
            .map(|a| AnimatedSprites {
                front_default: a.front_default,
                front_female: a.front_female,
                front_shiny: a.front_shiny,
                front_shiny_female: a.front_shiny_female,
            });

        Self {
            front_default: sprites.front_default,
            front_shiny: sprites.front_shiny,
            front_female: sprites.front_female,
            front_shiny_female: sprites.front_shiny_female,
            official_artwork,
            animated,
        }
    }
}

impl From<DetailsResponse> for EntityDetails {
    fn from(details: DetailsResponse) -> Self {
        Self {
            id: EntityId::new(details.id),
            name: details.name,
            height_decimeters: details.height,
            weight_decigrams: details.weight,
            base_experience: details.base_experience,
            abilities: details
                .abilities
                .into_iter()
                .map(|a| Ability {
                    name: a.ability.name,
                    is_hidden: a.is_hidden,
                    slot: a.slot,
                })
                .collect(),
            stats: details
                .stats
                .into_iter()
                .map(|s| Stat {
                    stat_name: s.stat.name,
                    base_value: s.base_stat,
                    effort: s.effort,
                })
                .collect(),
            types: details
                .types
                .into_iter()
                .map(|t| TypeSlot {
                    slot: t.slot,
                    type_name: t.kind.name,
                })
                .collect(),
            sprites: details.sprites.into(),
        }
    }
}

// =============================================================================
// EntityClientPort Implementation
// =============================================================================

#[async_trait]
impl EntityClientPort for PokeApiClient {
    #[instrument(skip(self))]
    async fn fetch_by_id(&self, id: EntityId) -> Result<EntityDetails, FetchError> {
        self.fetch_details(&id.to_string()).await
    }

    #[instrument(skip(self))]
    async fn fetch_by_name(&self, name: &str) -> Result<EntityDetails, FetchError> {
        self.fetch_details(name).await
    }

    #[instrument(skip(self))]
    async fn fetch_list_page(&self, offset: u32, limit: u32) -> Result<ListSlice, FetchError> {
        let list = self.fetch_summaries(offset, limit).await?;
        Ok(ListSlice {
            summaries: list.results.into_iter().map(EntitySummary::from).collect(),
            total: list.count,
            next: list.next,
            previous: list.previous,
        })
    }

    #[instrument(skip(self))]
    async fn fetch_by_category(
        &self,
        category: &str,
        offset: u32,
        limit: u32,
    ) -> Result<ListSlice, FetchError> {
        let url = self.endpoint(&["type", category])?;
        let response: TypeResponse = self.get_json(url, &[]).await?;
        debug!(
            category = %response.name,
            members = response.pokemon.len(),
            "Fetched category members"
        );

        let members = response
            .pokemon
            .into_iter()
            .map(|member| EntitySummary::from(member.pokemon))
            .collect();
        let page = paginate_locally(members, offset, limit);

        Ok(ListSlice {
            summaries: page.items,
            total: page.total,
            next: page.has_next.then(|| HAS_NEXT.to_string()),
            previous: page.has_previous.then(|| HAS_PREVIOUS.to_string()),
        })
    }

    #[instrument(skip(self))]
    async fn fetch_by_name_fragment(
        &self,
        fragment: &str,
    ) -> Result<Vec<EntitySummary>, FetchError> {
        let candidates = self
            .fetch_summaries(0, self.search_candidate_limit)
            .await?
            .results
            .into_iter()
            .map(EntitySummary::from)
            .collect();
        let matches = filter_by_name_fragment(candidates, fragment);
        debug!(matches = matches.len(), "Filtered candidates by name fragment");
        Ok(matches)
    }
}
