/*!
 * Tests for ordinal heading normalization
 */

use dramatis::ordinal_utils::{normalize_ordinal, UNKNOWN_UNIT};

/// Test that a known ordinal heading maps to its numeral
#[test]
fn test_normalize_ordinal_withKnownOrdinal_shouldReturnNumeral() {
    assert_eq!(normalize_ordinal("Erster Auftritt"), "1");
    assert_eq!(normalize_ordinal("Zweiter Aufzug"), "2");
    assert_eq!(normalize_ordinal("Zwölfter Auftritt"), "12");
}

/// Test that only the first token of the heading is considered
#[test]
fn test_normalize_ordinal_withExtraTokens_shouldUseFirstToken() {
    assert_eq!(normalize_ordinal("Dritter Aufzug, erste Szene"), "3");
    assert_eq!(normalize_ordinal("  Vierter   Auftritt  "), "4");
}

/// Test that an unrecognized heading falls back to the unknown key
#[test]
fn test_normalize_ordinal_withUnrecognizedHeading_shouldReturnUnknown() {
    assert_eq!(normalize_ordinal("Vorspiel"), UNKNOWN_UNIT);
    assert_eq!(normalize_ordinal("Dreizehnter Auftritt"), UNKNOWN_UNIT);
}

/// Test that an empty heading falls back to the unknown key
#[test]
fn test_normalize_ordinal_withEmptyHeading_shouldReturnUnknown() {
    assert_eq!(normalize_ordinal(""), UNKNOWN_UNIT);
    assert_eq!(normalize_ordinal("   "), UNKNOWN_UNIT);
}

/// Test that matching is case-sensitive like the headings in the corpus
#[test]
fn test_normalize_ordinal_withLowercaseToken_shouldReturnUnknown() {
    assert_eq!(normalize_ordinal("erster Auftritt"), UNKNOWN_UNIT);
}
