use std::collections::{btree_map, BTreeMap, HashMap};

use log::debug;
use roxmltree::{Document, Node};

use crate::ordinal_utils;

// @module: TEI speech extraction

/// The TEI namespace every element of a play document lives in.
pub const TEI_NS: &str = "http://www.tei-c.org/ns/1.0";

/// Namespace of the `xml:id` attribute.
const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// Local tag names whose subtrees are excluded from speech text.
const EXCLUDED_TAGS: [&str; 2] = ["stage", "speaker"];

/// Title used when a document's header carries none.
const UNKNOWN_TITLE: &str = "UnknownTitle";

/// Gender label attached to a character record.
///
/// Derived from the `sex` attribute of a person or person-group record;
/// anything but "male" and "female" (case-insensitive) is [`Gender::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unknown,
}

impl Gender {
    // @creates: Gender from a raw attribute value
    pub fn from_attr(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()).as_deref() {
            Some("male") => Self::Male,
            Some("female") => Self::Female,
            _ => Self::Unknown,
        }
    }

    // @returns: Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Unknown => "Unknown",
        }
    }

    // @returns: Single-letter abbreviation
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
            Self::Unknown => "U",
        }
    }
}

/// Identity tables for one document: speaker identifier to display name and
/// to gender.
///
/// Built once per document from the `person` and `personGrp` records of the
/// header. A record without an `xml:id` is skipped entirely; a record without
/// a name element still receives a gender entry. Lookups never fail: a
/// missing name falls back to the raw identifier, a missing gender to
/// [`Gender::Unknown`].
#[derive(Debug, Default)]
pub struct PersonRegistry {
    names: HashMap<String, String>,
    genders: HashMap<String, Gender>,
}

impl PersonRegistry {
    /// Build the identity tables from a parsed play document.
    pub fn from_document(document: &Document) -> Self {
        let mut registry = Self::default();

        for person in document
            .descendants()
            .filter(|n| n.has_tag_name((TEI_NS, "person")))
        {
            registry.add_record(person, "persName");
        }

        // Groups (a chorus, "all") share the identifier space with persons.
        for group in document
            .descendants()
            .filter(|n| n.has_tag_name((TEI_NS, "personGrp")))
        {
            registry.add_record(group, "name");
        }

        debug!(
            "Registry built: {} names, {} gender entries",
            registry.names.len(),
            registry.genders.len()
        );
        registry
    }

    fn add_record(&mut self, record: Node, name_tag: &str) {
        let Some(id) = record.attribute((XML_NS, "id")) else {
            return;
        };

        self.genders
            .insert(id.to_string(), Gender::from_attr(record.attribute("sex")));

        if let Some(name_el) = record
            .children()
            .find(|c| c.has_tag_name((TEI_NS, name_tag)))
        {
            let name = inner_text(name_el);
            if !name.is_empty() {
                self.names.insert(id.to_string(), name);
            }
        }
    }

    /// Display name for a speaker identifier, falling back to the raw
    /// identifier when the document declared no matching record.
    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.names.get(id).map(String::as_str).unwrap_or(id)
    }

    /// Gender for a speaker identifier, [`Gender::Unknown`] when absent.
    pub fn gender(&self, id: &str) -> Gender {
        self.genders.get(id).copied().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty() && self.genders.is_empty()
    }
}

/// Key of one accumulator bucket: the speaker identifier, plus the
/// structural-unit key in segmented extraction.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SpeechKey {
    /// Speaker identifier as referenced by speech blocks
    pub speaker: String,

    /// Act or scene key, `None` for whole-play extraction
    pub unit: Option<String>,
}

impl SpeechKey {
    pub fn new(speaker: impl Into<String>, unit: Option<&str>) -> Self {
        Self {
            speaker: speaker.into(),
            unit: unit.map(str::to_string),
        }
    }
}

/// Ordered multimap from [`SpeechKey`] to the text blocks accumulated for it.
///
/// Append-only during a document pass and consumed once at the end. Keys that
/// collide (repeated or missing unit headings) accumulate into the same
/// bucket. Iteration order is the key order, so artifact emission is
/// deterministic.
#[derive(Debug, Default)]
pub struct SpeechAccumulator {
    entries: BTreeMap<SpeechKey, Vec<String>>,
}

impl SpeechAccumulator {
    /// Append one text block under a key.
    pub fn append(&mut self, key: SpeechKey, block: String) {
        self.entries.entry(key).or_default().push(block);
    }

    /// Blocks accumulated under a key, in insertion order.
    pub fn blocks(&self, key: &SpeechKey) -> Option<&[String]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &SpeechKey> {
        self.entries.keys()
    }
}

impl IntoIterator for SpeechAccumulator {
    type Item = (SpeechKey, Vec<String>);
    type IntoIter = btree_map::IntoIter<SpeechKey, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Concatenate the text of an element in document order, skipping the
/// subtrees of nested stage directions and speaker labels.
///
/// Exclusion matches the local tag name only, independent of namespace
/// prefix. Text that follows an excluded element is a sibling text node and
/// stays part of the surrounding flow, so punctuation after a stage
/// direction survives. The result is not trimmed.
pub fn flow_text(element: Node) -> String {
    let mut text = String::new();
    collect_flow_text(element, &mut text);
    text
}

fn collect_flow_text(node: Node, out: &mut String) {
    for child in node.children() {
        if child.is_text() {
            if let Some(chunk) = child.text() {
                out.push_str(chunk);
            }
        } else if child.is_element() && !EXCLUDED_TAGS.contains(&child.tag_name().name()) {
            collect_flow_text(child, out);
        }
    }
}

/// Process one `sp` block into the accumulator.
///
/// The `who` attribute is split on whitespace and each token stripped of its
/// leading `#` markers; a block with no resolved identifiers is skipped.
/// Paragraph units are preferred; verse lines are the fallback when the block
/// has no paragraphs at all. Non-empty unit texts are joined with a single
/// newline into one block per speech event, appended under every resolved
/// speaker so shared lines show up for each of them.
pub fn process_speech_block(sp: Node, unit: Option<&str>, accumulator: &mut SpeechAccumulator) {
    let who = sp.attribute("who").unwrap_or("");
    let speaker_ids: Vec<&str> = who
        .split_whitespace()
        .map(|token| token.trim_start_matches('#'))
        .filter(|token| !token.is_empty())
        .collect();
    if speaker_ids.is_empty() {
        return;
    }

    let mut unit_nodes: Vec<Node> = sp
        .descendants()
        .filter(|n| n.has_tag_name((TEI_NS, "p")))
        .collect();
    if unit_nodes.is_empty() {
        unit_nodes = sp
            .descendants()
            .filter(|n| n.has_tag_name((TEI_NS, "l")))
            .collect();
    }

    let texts: Vec<String> = unit_nodes
        .iter()
        .map(|n| flow_text(*n).trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    if texts.is_empty() {
        return;
    }

    let block = texts.join("\n");
    for id in speaker_ids {
        accumulator.append(SpeechKey::new(id, unit), block.clone());
    }
}

/// Accumulate every speech block of the document under its speakers,
/// ignoring act and scene boundaries.
pub fn collect_speeches(document: &Document) -> SpeechAccumulator {
    let mut accumulator = SpeechAccumulator::default();

    for sp in document
        .descendants()
        .filter(|n| n.has_tag_name((TEI_NS, "sp")))
    {
        process_speech_block(sp, None, &mut accumulator);
    }

    accumulator
}

/// Accumulate speech per speaker and structural unit.
///
/// The units are the act-level divisions; a single-act play is segmented by
/// the scenes of that act instead. A document without act divisions yields an
/// empty accumulator.
pub fn collect_speeches_segmented(document: &Document) -> SpeechAccumulator {
    let mut accumulator = SpeechAccumulator::default();

    let acts: Vec<Node> = document
        .descendants()
        .filter(|n| n.has_tag_name((TEI_NS, "div")) && n.attribute("type") == Some("act"))
        .collect();

    if acts.len() == 1 {
        let scenes = acts[0]
            .descendants()
            .filter(|n| n.has_tag_name((TEI_NS, "div")) && n.attribute("type") == Some("scene"));
        for scene in scenes {
            accumulate_unit(scene, &mut accumulator);
        }
    } else {
        for act in acts {
            accumulate_unit(act, &mut accumulator);
        }
    }

    accumulator
}

fn accumulate_unit(unit: Node, accumulator: &mut SpeechAccumulator) {
    let key = unit_key(unit);

    for sp in unit
        .descendants()
        .filter(|n| n.has_tag_name((TEI_NS, "sp")))
    {
        process_speech_block(sp, Some(key.as_str()), accumulator);
    }
}

/// Grouping key of an act or scene division, derived from its heading.
fn unit_key(unit: Node) -> String {
    unit.children()
        .find(|c| c.has_tag_name((TEI_NS, "head")))
        .and_then(|head| head.text())
        .map(ordinal_utils::normalize_ordinal)
        .unwrap_or_else(|| ordinal_utils::UNKNOWN_UNIT.to_string())
}

/// Title of the play from the header's title statement.
pub fn play_title(document: &Document) -> String {
    document
        .descendants()
        .find(|n| n.has_tag_name((TEI_NS, "titleStmt")))
        .and_then(|stmt| stmt.children().find(|c| c.has_tag_name((TEI_NS, "title"))))
        .and_then(|title| title.text())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN_TITLE.to_string())
}

/// Full inner text of a name element, chunks joined by a single space.
fn inner_text(node: Node) -> String {
    let chunks: Vec<&str> = node
        .descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect();
    chunks.join(" ").trim().to_string()
}
