/*!
 * Tests for Wikidata claim traversal and client construction
 */

use anyhow::Result;
use serde_json::json;
use dramatis::app_config::WikidataConfig;
use dramatis::errors::WikidataError;
use dramatis::wikidata::{
    self, WikidataClient, OUTPUT_COLUMNS, PROPERTY_AUTHOR, PROPERTY_COMPOSER,
};

/// Test that every id claimed for a property is extracted
#[test]
fn test_extract_person_ids_withMultipleClaims_shouldReturnAllIds() {
    let claims = json!({
        "P50": [
            { "mainsnak": { "datavalue": { "value": { "id": "Q111" } } } },
            { "mainsnak": { "datavalue": { "value": { "id": "Q222" } } } }
        ]
    });

    let ids = wikidata::extract_person_ids(&claims, PROPERTY_AUTHOR);

    assert_eq!(ids, vec!["Q111".to_string(), "Q222".to_string()]);
}

/// Test that claims without a usable datavalue are ignored
#[test]
fn test_extract_person_ids_withMalformedClaims_shouldSkipThem() {
    let claims = json!({
        "P50": [
            { "mainsnak": {} },
            { "mainsnak": { "datavalue": { "value": "novalue" } } },
            { "mainsnak": { "datavalue": { "value": { "id": "Q333" } } } }
        ]
    });

    let ids = wikidata::extract_person_ids(&claims, PROPERTY_AUTHOR);

    assert_eq!(ids, vec!["Q333".to_string()]);
}

/// Test that an absent property yields no ids
#[test]
fn test_extract_person_ids_withAbsentProperty_shouldReturnEmpty() {
    let claims = json!({ "P50": [] });

    assert!(wikidata::extract_person_ids(&claims, PROPERTY_COMPOSER).is_empty());
    assert!(wikidata::extract_person_ids(&claims, PROPERTY_AUTHOR).is_empty());
}

/// Test claim navigation through a whole entity-data document
#[test]
fn test_entity_claims_withFullDocument_shouldFindClaims() {
    let document = json!({
        "entities": {
            "Q42": {
                "claims": {
                    "P50": [
                        { "mainsnak": { "datavalue": { "value": { "id": "Q777" } } } }
                    ]
                }
            }
        }
    });

    let claims = wikidata::entity_claims(&document, "Q42");
    let ids = wikidata::extract_person_ids(claims, PROPERTY_AUTHOR);

    assert_eq!(ids, vec!["Q777".to_string()]);
}

/// Test that navigation of a document for the wrong entity finds nothing
#[test]
fn test_entity_claims_withMissingEntity_shouldYieldNoIds() {
    let document = json!({ "entities": {} });

    let claims = wikidata::entity_claims(&document, "Q42");

    assert!(wikidata::extract_person_ids(claims, PROPERTY_AUTHOR).is_empty());
}

/// Test that the appended column names carry the property ids
#[test]
fn test_output_columns_shouldMatchProperties() {
    assert_eq!(
        OUTPUT_COLUMNS,
        ["Author_P50", "Composer_P86", "Librettist_P87"]
    );
}

/// Test client construction from a valid configuration
#[test]
fn test_wikidata_client_withDefaultConfig_shouldBuild() -> Result<()> {
    let config = WikidataConfig::default();

    let client = WikidataClient::from_config(&config);

    assert!(client.is_ok());
    Ok(())
}

/// Test that an unparseable endpoint is rejected at construction
#[test]
fn test_wikidata_client_withInvalidEndpoint_shouldFail() {
    let config = WikidataConfig {
        endpoint: "not a url".to_string(),
        ..WikidataConfig::default()
    };

    let result = WikidataClient::from_config(&config);

    assert!(matches!(result, Err(WikidataError::InvalidEndpoint(_))));
}
