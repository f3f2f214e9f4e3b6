/// Ordinal utilities for act and scene headings
///
/// German plays head their acts and scenes with ordinal words
/// ("Erster Aufzug", "Zweiter Auftritt"). This module normalizes such a
/// heading to the numeral string used as the grouping key in segmented
/// extraction.
/// Grouping key used when a heading is missing or not recognized.
pub const UNKNOWN_UNIT: &str = "Unknown";

/// Normalize an act or scene heading to a numeral string.
///
/// Only the first whitespace-separated token of the heading is considered.
/// Headings outside the twelve known ordinals map to [`UNKNOWN_UNIT`].
pub fn normalize_ordinal(heading: &str) -> String {
    let token = heading.split_whitespace().next().unwrap_or("");

    let numeral = match token {
        "Erster" => "1",
        "Zweiter" => "2",
        "Dritter" => "3",
        "Vierter" => "4",
        "Fünfter" => "5",
        "Sechster" => "6",
        "Siebter" => "7",
        "Achter" => "8",
        "Neunter" => "9",
        "Zehnter" => "10",
        "Elfter" => "11",
        "Zwölfter" => "12",
        _ => UNKNOWN_UNIT,
    };

    numeral.to_string()
}
