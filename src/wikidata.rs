use std::path::Path;
use std::time::Duration;

use log::{debug, error};
use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::app_config::WikidataConfig;
use crate::errors::WikidataError;

// @module: Wikidata entity lookups and works-table enrichment

/// Wikidata property for the author of a work.
pub const PROPERTY_AUTHOR: &str = "P50";
/// Wikidata property for the composer of a work.
pub const PROPERTY_COMPOSER: &str = "P86";
/// Wikidata property for the librettist of a work.
pub const PROPERTY_LIBRETTIST: &str = "P87";

/// Columns appended to an enriched works table, one per property.
pub const OUTPUT_COLUMNS: [&str; 3] = ["Author_P50", "Composer_P86", "Librettist_P87"];

const ENTITY_ID_COLUMN: &str = "wikidataId";
const USER_AGENT: &str = concat!("dramatis/", env!("CARGO_PKG_VERSION"));

/// Client for the Wikidata entity-data endpoint.
///
/// Lookups are issued strictly sequentially with a fixed delay between
/// consecutive requests.
pub struct WikidataClient {
    client: Client,
    endpoint: Url,
    request_delay: Duration,
}

impl WikidataClient {
    /// Build a client from the application configuration.
    pub fn from_config(config: &WikidataConfig) -> Result<Self, WikidataError> {
        let endpoint = Url::parse(&config.endpoint)
            .map_err(|e| WikidataError::InvalidEndpoint(format!("{}: {}", config.endpoint, e)))?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WikidataError::RequestFailed(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            request_delay: Duration::from_millis(config.request_delay_ms),
        })
    }

    /// Fetch the entity-data document for one entity id (e.g. "Q123").
    pub async fn fetch_entity(&self, entity_id: &str) -> Result<Value, WikidataError> {
        let url = format!(
            "{}/wiki/Special:EntityData/{}.json",
            self.endpoint.as_str().trim_end_matches('/'),
            entity_id
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| WikidataError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WikidataError::ApiError {
                status_code: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| WikidataError::ParseError(e.to_string()))
    }

    /// Enrich a works table with author, composer and librettist person ids.
    ///
    /// Every input row and column passes through unchanged; the three
    /// [`OUTPUT_COLUMNS`] are appended. A failed lookup is logged and leaves
    /// that row's new cells empty; the run continues with the next row.
    /// Returns the number of rows whose entity document was fetched.
    pub async fn enrich_works_table<P1: AsRef<Path>, P2: AsRef<Path>>(
        &self,
        input: P1,
        output: P2,
    ) -> Result<usize, WikidataError> {
        let input = input.as_ref();

        let mut reader = csv::Reader::from_path(input)
            .map_err(|e| WikidataError::Table(format!("{}: {}", input.display(), e)))?;
        let headers = reader
            .headers()
            .map_err(|e| WikidataError::Table(format!("{}: {}", input.display(), e)))?
            .clone();

        let id_index = headers
            .iter()
            .position(|h| h == ENTITY_ID_COLUMN)
            .ok_or_else(|| {
                WikidataError::Table(format!(
                    "Column '{}' not found in {}",
                    ENTITY_ID_COLUMN,
                    input.display()
                ))
            })?;

        let mut writer = csv::Writer::from_path(output.as_ref())
            .map_err(|e| WikidataError::Table(format!("{}: {}", output.as_ref().display(), e)))?;

        let mut out_headers = headers.clone();
        for column in OUTPUT_COLUMNS {
            out_headers.push_field(column);
        }
        writer
            .write_record(&out_headers)
            .map_err(|e| WikidataError::Table(e.to_string()))?;

        let mut fetched = 0usize;
        for (row_index, row) in reader.records().enumerate() {
            let row = row.map_err(|e| WikidataError::Table(format!("{}: {}", input.display(), e)))?;
            let entity_id = row.get(id_index).unwrap_or("").trim().to_string();

            let mut person_ids = [String::new(), String::new(), String::new()];
            if entity_id.is_empty() {
                debug!("Row {} carries no entity id, skipping lookup", row_index + 1);
            } else {
                match self.fetch_entity(&entity_id).await {
                    Ok(document) => {
                        let claims = entity_claims(&document, &entity_id);
                        for (slot, property) in person_ids.iter_mut().zip([
                            PROPERTY_AUTHOR,
                            PROPERTY_COMPOSER,
                            PROPERTY_LIBRETTIST,
                        ]) {
                            *slot = extract_person_ids(claims, property).join(", ");
                        }
                        fetched += 1;
                    }
                    Err(e) => error!("Lookup failed for {}: {}", entity_id, e),
                }
                tokio::time::sleep(self.request_delay).await;
            }

            let mut out_row = row.clone();
            for cell in &person_ids {
                out_row.push_field(cell);
            }
            writer
                .write_record(&out_row)
                .map_err(|e| WikidataError::Table(e.to_string()))?;
        }

        writer
            .flush()
            .map_err(|e| WikidataError::Table(e.to_string()))?;
        Ok(fetched)
    }
}

/// The claims object of one entity inside an entity-data document.
///
/// Missing levels resolve to JSON null, which yields no person ids.
pub fn entity_claims<'a>(document: &'a Value, entity_id: &str) -> &'a Value {
    &document["entities"][entity_id]["claims"]
}

/// Extract the person ids claimed for one property.
///
/// Claims with a missing datavalue or a value that is not an id-carrying
/// object are ignored.
pub fn extract_person_ids(claims: &Value, property: &str) -> Vec<String> {
    let Some(entries) = claims.get(property).and_then(Value::as_array) else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|claim| {
            claim
                .get("mainsnak")
                .and_then(|snak| snak.get("datavalue"))
                .and_then(|datavalue| datavalue.get("value"))
                .and_then(|value| value.get("id"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .collect()
}
