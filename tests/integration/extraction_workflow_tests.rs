/*!
 * End-to-end tests for the extraction and stats pipelines
 */

use std::fs;
use anyhow::Result;
use dramatis::app_config::{Config, GenderLabelMode};
use dramatis::app_controller::{Controller, ExtractionMode};
use crate::common;

fn config_for(input_dir: &std::path::Path, output_dir: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.input_directory = input_dir.to_string_lossy().to_string();
    config.output_directory = output_dir.to_string_lossy().to_string();
    config
}

/// Test the whole-play pipeline: artifact names and contents
#[test]
fn test_run_extraction_withSamplePlay_shouldWritePerSpeakerArtifacts() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input_dir = temp_dir.path().join("plays");
    let output_dir = temp_dir.path().join("out");
    fs::create_dir_all(&input_dir)?;
    common::create_test_play(&input_dir, "probe.xml")?;

    let controller = Controller::with_config(config_for(&input_dir, &output_dir))?;
    let processed = controller.run_extraction(ExtractionMode::FullPlay)?;

    assert_eq!(processed, 1);
    let anna = output_dir.join("F_Die Probe_Anna.txt");
    assert!(anna.exists());
    assert_eq!(
        fs::read_to_string(&anna)?,
        "Guten Morgen , Karl.\n\nWir gehen."
    );

    let karl = output_dir.join("M_Die Probe_Karl.txt");
    assert_eq!(
        fs::read_to_string(&karl)?,
        "Wir gehen.\n\nDie Nacht ist still,\nder Wind ist kalt."
    );

    // Speaker without a header record falls back to the raw id and U
    assert!(output_dir.join("U_Die Probe_mueller.txt").exists());
    // Person group is emitted like a person
    assert!(output_dir.join("U_Die Probe_Chor der Frauen.txt").exists());
    Ok(())
}

/// Test the full gender label mode
#[test]
fn test_run_extraction_withFullGenderLabels_shouldPrefixWithWords() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input_dir = temp_dir.path().join("plays");
    let output_dir = temp_dir.path().join("out");
    fs::create_dir_all(&input_dir)?;
    common::create_test_play(&input_dir, "probe.xml")?;

    let mut config = config_for(&input_dir, &output_dir);
    config.extraction.gender_labels = GenderLabelMode::Full;
    let controller = Controller::with_config(config)?;
    controller.run_extraction(ExtractionMode::FullPlay)?;

    assert!(output_dir.join("Female_Die Probe_Anna.txt").exists());
    assert!(output_dir.join("Unknown_Die Probe_mueller.txt").exists());
    Ok(())
}

/// Test the segmented pipeline over a single-act play with two scenes
#[test]
fn test_run_extraction_withSingleActPlay_shouldSegmentByScene() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input_dir = temp_dir.path().join("plays");
    let output_dir = temp_dir.path().join("out");
    fs::create_dir_all(&input_dir)?;
    common::create_test_file(&input_dir, "besuch.xml", common::SINGLE_ACT_PLAY)?;

    let controller = Controller::with_config(config_for(&input_dir, &output_dir))?;
    let processed = controller.run_extraction(ExtractionMode::Segmented)?;

    assert_eq!(processed, 1);
    assert_eq!(
        fs::read_to_string(output_dir.join("F_Lina_1.txt"))?,
        "Da bist du ja."
    );
    assert_eq!(
        fs::read_to_string(output_dir.join("F_Lina_2.txt"))?,
        "Nun geh wieder."
    );
    assert_eq!(
        fs::read_to_string(output_dir.join("U_mueller_1.txt"))?,
        "Hier bin ich."
    );
    Ok(())
}

/// Test that running twice over unchanged input produces identical artifacts
#[test]
fn test_run_extraction_withRepeatedRun_shouldBeIdempotent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input_dir = temp_dir.path().join("plays");
    let output_dir = temp_dir.path().join("out");
    fs::create_dir_all(&input_dir)?;
    common::create_test_play(&input_dir, "probe.xml")?;

    let controller = Controller::with_config(config_for(&input_dir, &output_dir))?;
    controller.run_extraction(ExtractionMode::FullPlay)?;
    let first = fs::read(output_dir.join("F_Die Probe_Anna.txt"))?;

    controller.run_extraction(ExtractionMode::FullPlay)?;
    let second = fs::read(output_dir.join("F_Die Probe_Anna.txt"))?;

    assert_eq!(first, second);
    Ok(())
}

/// Test that a malformed document is skipped while the batch continues
#[test]
fn test_run_extraction_withMalformedDocument_shouldContinueBatch() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input_dir = temp_dir.path().join("plays");
    let output_dir = temp_dir.path().join("out");
    fs::create_dir_all(&input_dir)?;
    common::create_test_file(&input_dir, "broken.xml", "<TEI")?;
    common::create_test_play(&input_dir, "probe.xml")?;

    let controller = Controller::with_config(config_for(&input_dir, &output_dir))?;
    let processed = controller.run_extraction(ExtractionMode::FullPlay)?;

    assert_eq!(processed, 1);
    assert!(output_dir.join("F_Die Probe_Anna.txt").exists());
    Ok(())
}

/// Test that a missing input directory fails the run
#[test]
fn test_run_extraction_withMissingInputDir_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input_dir = temp_dir.path().join("does_not_exist");
    let output_dir = temp_dir.path().join("out");

    let controller = Controller::with_config(config_for(&input_dir, &output_dir))?;
    let result = controller.run_extraction(ExtractionMode::FullPlay);

    assert!(result.is_err());
    Ok(())
}

/// Test the stats pipeline end to end
#[test]
fn test_run_stats_withWorksTables_shouldWriteChartData() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let data_dir = temp_dir.path().to_path_buf();
    let output_dir = temp_dir.path().join("out");

    let outside_csv = common::create_test_file(
        &data_dir,
        "outside.csv",
        "author-name,genre,year\nGottsched,comedy,1736\nBirch-Pfeiffer,,1840\nBirch-Pfeiffer,tragedy,1845\n",
    )?;
    let corpus_csv = common::create_test_file(
        &data_dir,
        "corpus.csv",
        "author-name,genre,year\nGottsched,tragedy,1739\n",
    )?;

    let controller = Controller::with_config(config_for(&data_dir, &output_dir))?;
    controller.run_stats(&outside_csv, &corpus_csv)?;

    let genres: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(output_dir.join("genre_distribution.json"))?)?;
    assert_eq!(genres[0]["category"], "comedy");
    assert_eq!(genres[0]["outside_corpus"], 1);
    assert_eq!(genres[1]["in_corpus"], 1);

    let authors: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(output_dir.join("top_authors.json"))?)?;
    assert_eq!(authors[0]["name"], "Birch-Pfeiffer");
    assert_eq!(authors[0]["total"], 2);
    assert_eq!(authors[1]["name"], "Gottsched");

    let decades: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(output_dir.join("works_by_decade.json"))?)?;
    assert_eq!(decades[0]["decade"], 1730);
    assert_eq!(decades[0]["outside_corpus"], 1);
    assert_eq!(decades[0]["in_corpus"], 1);
    Ok(())
}
