// src/enrichment/gate.rs
// Keyword heuristic deciding whether a web lookup is worth making

/// Public places where live information (closures, crowds) matters
const PLACE_KEYWORDS: &[&str] = &[
    "stadium",
    "arena",
    "airport",
    "station",
    "mall",
    "park",
    "school",
    "university",
    "hospital",
    "museum",
    "theater",
    "theatre",
    "highway",
    "freeway",
    "bridge",
    "tunnel",
    "downtown",
    "market",
];

/// Scheduled or ongoing events
const EVENT_KEYWORDS: &[&str] = &[
    "concert",
    "festival",
    "parade",
    "protest",
    "rally",
    "marathon",
    "match",
    "tournament",
    "conference",
    "ceremony",
    "game",
];

/// Topics that usually have current public coverage
const TOPIC_KEYWORDS: &[&str] = &[
    "traffic",
    "weather",
    "storm",
    "flood",
    "earthquake",
    "wildfire",
    "hurricane",
    "tornado",
    "evacuation",
    "outage",
    "closure",
    "news",
];

/// True if any keyword from any set appears in the lower-cased text
pub fn should_augment(text: &str) -> bool {
    let lowered = text.to_lowercase();
    [PLACE_KEYWORDS, EVENT_KEYWORDS, TOPIC_KEYWORDS]
        .iter()
        .flat_map(|set| set.iter())
        .any(|keyword| lowered.contains(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_keyword() {
        assert!(should_augment("There was a fire at the stadium"));
    }

    #[test]
    fn test_no_keyword() {
        assert!(!should_augment("I like apples"));
        assert!(!should_augment("My chest hurts and I feel dizzy"));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(should_augment("FLOOD warning near the river"));
        assert!(should_augment("Huge crowd at the Festival"));
    }

    #[test]
    fn test_substring_match() {
        assert!(should_augment("gridlock on the highways tonight"));
    }

    #[test]
    fn test_every_set_contributes() {
        assert!(should_augment("stuck at the airport"));
        assert!(should_augment("the parade is blocked"));
        assert!(should_augment("power outage on my street"));
    }

    #[test]
    fn test_keywords_are_lowercase() {
        for keyword in PLACE_KEYWORDS.iter().chain(EVENT_KEYWORDS).chain(TOPIC_KEYWORDS) {
            assert_eq!(*keyword, keyword.to_lowercase());
        }
    }
}
