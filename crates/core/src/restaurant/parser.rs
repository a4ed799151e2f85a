//! Free-text restaurant parser.
//!
//! Recovers restaurant records from loosely formatted model output. Each line
//! is handled on its own, trying in order:
//!
//! 1. The strict `Name || Cuisine || Description` format.
//! 2. A list item (`1.`, `-`, `*`, `•`) whose name is emphasized (`**Name**`).
//! 3. A list item split at the first `:`, `-` or `–`.
//! 4. A short list item taken whole as the name.
//!
//! Conversational preambles ("Here are...", "Sure, ...") are skipped.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use tracing::debug;
use uuid::Uuid;

use super::citation::{find_map_uri, map_search_uri};
use super::types::{Citation, Restaurant, DEFAULT_CUISINE, DEFAULT_DESCRIPTION};

/// Separator of the strict triple-field format.
pub const FIELD_SEPARATOR: &str = "||";

/// Markup wrapping an emphasized span.
const EMPHASIS_SENTINEL: &str = "**";

/// Lowercased prefixes of lines that are chatter, not restaurants.
const PREAMBLE_PREFIXES: &[&str] = &["here are", "sure,"];

static LIST_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\d\-\*•]+[\.\)]?\s+").unwrap());

static EMPHASIS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());

/// Fields extracted from one line, before defaults and map resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineFields {
    pub name: String,
    pub cuisine: Option<String>,
    pub description: Option<String>,
}

/// Parser turning model text plus citations into restaurant records.
#[derive(Debug, Clone, Copy)]
pub struct RestaurantParser {
    synthesize_map_uri: bool,
}

impl Default for RestaurantParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RestaurantParser {
    /// Create a parser that synthesizes a map search URL when no citation matches.
    pub fn new() -> Self {
        Self {
            synthesize_map_uri: true,
        }
    }

    /// Set whether unmatched names get a synthesized map search URL.
    pub fn with_synthesized_map_uri(mut self, synthesize: bool) -> Self {
        self.synthesize_map_uri = synthesize;
        self
    }

    /// Parse `text` line by line into restaurants, in input order.
    pub fn parse(&self, text: &str, citations: &[Citation]) -> Vec<Restaurant> {
        text.lines()
            .filter_map(extract_line)
            .map(|fields| self.build(fields, citations))
            .collect()
    }

    fn build(&self, fields: LineFields, citations: &[Citation]) -> Restaurant {
        let map_uri = find_map_uri(&fields.name, citations).or_else(|| {
            self.synthesize_map_uri
                .then(|| map_search_uri(&fields.name))
        });

        Restaurant {
            id: Uuid::new_v4().to_string(),
            cuisine: fields
                .cuisine
                .unwrap_or_else(|| DEFAULT_CUISINE.to_string()),
            description: fields
                .description
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            name: fields.name,
            map_uri,
        }
    }
}

/// Parse with the default (synthesizing) parser.
pub fn parse_restaurants(text: &str, citations: &[Citation]) -> Vec<Restaurant> {
    RestaurantParser::new().parse(text, citations)
}

/// Extract restaurant fields from a single line, if it holds one.
pub fn extract_line(line: &str) -> Option<LineFields> {
    let line = line.trim();
    if line.is_empty() || is_preamble(line) {
        return None;
    }

    let fields = if line.contains(FIELD_SEPARATOR) {
        extract_strict(line)
    } else {
        extract_list_item(line)?
    };

    let name = fields.name.replace(EMPHASIS_SENTINEL, "").trim().to_string();
    if name.chars().count() <= 1 {
        debug!("Skipping line without a usable name: {:?}", line);
        return None;
    }

    Some(LineFields { name, ..fields })
}

fn is_preamble(line: &str) -> bool {
    let lower = line.to_lowercase();
    PREAMBLE_PREFIXES
        .iter()
        .any(|prefix| lower.starts_with(prefix))
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// `Name || Cuisine || Description`; missing or empty fields stay unset.
fn extract_strict(line: &str) -> LineFields {
    let parts: Vec<&str> = line.split(FIELD_SEPARATOR).map(str::trim).collect();

    LineFields {
        name: parts.first().copied().unwrap_or_default().to_string(),
        cuisine: parts.get(1).and_then(|part| non_empty(part)),
        description: parts.get(2).and_then(|part| non_empty(part)),
    }
}

fn extract_list_item(line: &str) -> Option<LineFields> {
    let marker = LIST_MARKER.find(line)?;
    let content = &line[marker.end()..];

    if let Some(captures) = EMPHASIS.captures(content) {
        let name = captures.get(1).map_or("", |m| m.as_str()).to_string();
        let remaining = EMPHASIS.replace(content, "");
        let description = remaining
            .trim()
            .trim_start_matches(|c: char| matches!(c, ':' | '-' | '–' | ',') || c.is_whitespace());

        return Some(LineFields {
            name,
            cuisine: None,
            description: non_empty(description),
        });
    }

    if let Some(separator) = content
        .chars()
        .find(|c| matches!(c, ':' | '-' | '–'))
    {
        let parts: Vec<&str> = content.split(separator).collect();
        let name = parts[0].trim().to_string();
        let description = parts[1..].join(" ");

        return Some(LineFields {
            name,
            cuisine: None,
            description: non_empty(&description),
        });
    }

    let length = content.chars().count();
    if length > 2 && length < 50 {
        return Some(LineFields {
            name: content.to_string(),
            cuisine: None,
            description: None,
        });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::restaurant::fallback::demo_restaurants;

    #[test]
    fn test_strict_format() {
        let restaurants = parse_restaurants("Joe's Pizza || Italian || Famous for thin crust.", &[]);

        assert_eq!(restaurants.len(), 1);
        assert_eq!(restaurants[0].name, "Joe's Pizza");
        assert_eq!(restaurants[0].cuisine, "Italian");
        assert_eq!(restaurants[0].description, "Famous for thin crust.");
    }

    #[test]
    fn test_strict_format_defaults_missing_fields() {
        let restaurants = parse_restaurants("Pho 24 ||", &[]);

        assert_eq!(restaurants.len(), 1);
        assert_eq!(restaurants[0].name, "Pho 24");
        assert_eq!(restaurants[0].cuisine, DEFAULT_CUISINE);
        assert_eq!(restaurants[0].description, DEFAULT_DESCRIPTION);
    }

    #[test]
    fn test_strict_format_empty_cuisine_defaults() {
        let fields = extract_line("Pho 24 ||  || Late-night noodles").unwrap();
        assert_eq!(fields.cuisine, None);
        assert_eq!(fields.description.as_deref(), Some("Late-night noodles"));
    }

    #[test]
    fn test_strict_format_strips_emphasis() {
        let fields = extract_line("**Sushi Zen** || Japanese || Rolls").unwrap();
        assert_eq!(fields.name, "Sushi Zen");
    }

    #[test]
    fn test_strict_format_ignores_extra_fields() {
        let fields = extract_line("A1 Diner || American || Pancakes || $$").unwrap();
        assert_eq!(fields.name, "A1 Diner");
        assert_eq!(fields.description.as_deref(), Some("Pancakes"));
    }

    #[test]
    fn test_numbered_emphasized_name() {
        let restaurants = parse_restaurants("1. **Sushi Zen**: Fresh sashimi and rolls.", &[]);

        assert_eq!(restaurants.len(), 1);
        assert_eq!(restaurants[0].name, "Sushi Zen");
        assert_eq!(restaurants[0].description, "Fresh sashimi and rolls.");
        assert_eq!(restaurants[0].cuisine, DEFAULT_CUISINE);
    }

    #[test]
    fn test_emphasized_name_strips_separator_run() {
        let fields = extract_line("- **Taco Fiesta** –, Street tacos").unwrap();
        assert_eq!(fields.name, "Taco Fiesta");
        assert_eq!(fields.description.as_deref(), Some("Street tacos"));
    }

    #[test]
    fn test_emphasized_name_without_description() {
        let fields = extract_line("* **Golden Dragon**").unwrap();
        assert_eq!(fields.name, "Golden Dragon");
        assert_eq!(fields.description, None);
    }

    #[test]
    fn test_bullet_marker() {
        let fields = extract_line("• Pasta Paradise: Wood-fired pizza").unwrap();
        assert_eq!(fields.name, "Pasta Paradise");
        assert_eq!(fields.description.as_deref(), Some("Wood-fired pizza"));
    }

    #[test]
    fn test_separator_split_rejoins_recurring_separator() {
        let fields = extract_line("2) Burger Barn - smash burgers - late hours").unwrap();
        assert_eq!(fields.name, "Burger Barn");
        assert_eq!(
            fields.description.as_deref(),
            Some("smash burgers   late hours")
        );
    }

    #[test]
    fn test_separator_split_uses_first_separator_char() {
        let fields = extract_line("3. Chez Nous: French – classic bistro").unwrap();
        assert_eq!(fields.name, "Chez Nous");
        assert_eq!(
            fields.description.as_deref(),
            Some("French – classic bistro")
        );
    }

    #[test]
    fn test_short_list_item_is_name() {
        let fields = extract_line("4. Bella Napoli").unwrap();
        assert_eq!(fields.name, "Bella Napoli");
        assert_eq!(fields.cuisine, None);
        assert_eq!(fields.description, None);
    }

    #[test]
    fn test_long_list_item_without_separator_is_skipped() {
        let line = format!("5. {}", "a very long sentence without any separator ".repeat(2));
        assert!(extract_line(&line).is_none());
    }

    #[test]
    fn test_list_item_too_short_is_skipped() {
        assert!(extract_line("6. Ab").is_none());
        assert!(extract_line("- X: tasty").is_none());
    }

    #[test]
    fn test_marker_requires_whitespace() {
        assert!(extract_line("**Sushi Zen**: Fresh sashimi").is_none());
        assert!(extract_line("1.Sushi Zen").is_none());
    }

    #[test]
    fn test_plain_prose_is_skipped() {
        assert!(extract_line("Enjoy your meal and let me know if you need more!").is_none());
    }

    #[test]
    fn test_preamble_is_skipped() {
        assert!(parse_restaurants("Here are some great options:", &[]).is_empty());
        assert!(parse_restaurants("SURE, here you go || x || y", &[]).is_empty());
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        assert!(parse_restaurants("", &[]).is_empty());
        assert!(parse_restaurants("\n   \n\t\n", &[]).is_empty());
    }

    #[test]
    fn test_mixed_response_keeps_line_order() {
        let text = "Here are 4 places near you:\n\
                    \n\
                    Joe's Pizza || Italian || Thin crust.\n\
                    1. **Sushi Zen**: Fresh sashimi.\n\
                    - Taco Fiesta - street tacos\n\
                    Enjoy!\n\
                    * Golden Dragon\n";

        let names: Vec<String> = parse_restaurants(text, &[])
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(
            names,
            vec!["Joe's Pizza", "Sushi Zen", "Taco Fiesta", "Golden Dragon"]
        );
    }

    #[test]
    fn test_duplicates_are_kept() {
        let text = "Sushi Zen || Japanese || A\nSushi Zen || Japanese || A";
        let restaurants = parse_restaurants(text, &[]);
        assert_eq!(restaurants.len(), 2);
        assert_ne!(restaurants[0].id, restaurants[1].id);
    }

    #[test]
    fn test_citation_uri_is_preferred() {
        let citations = vec![Citation::maps("Sushi Zen Restaurant", "https://maps/sushi")];
        let restaurants = parse_restaurants("Sushi Zen || Japanese || Rolls", &citations);
        assert_eq!(restaurants[0].map_uri.as_deref(), Some("https://maps/sushi"));
    }

    #[test]
    fn test_unmatched_name_gets_search_uri() {
        let restaurants = parse_restaurants("Sushi Zen || Japanese || Rolls", &[]);
        assert_eq!(
            restaurants[0].map_uri.as_deref(),
            Some("https://www.google.com/maps/search/Sushi%20Zen")
        );
    }

    #[test]
    fn test_non_synthesizing_parser_leaves_uri_unset() {
        let parser = RestaurantParser::new().with_synthesized_map_uri(false);
        let restaurants = parser.parse("Sushi Zen || Japanese || Rolls", &[]);
        assert_eq!(restaurants[0].map_uri, None);
    }

    #[test]
    fn test_every_record_has_usable_name() {
        let text = "|| Italian || x\n- **A**: b\n1. **  ** nothing\nOk Cafe || Cafe || Coffee";
        let restaurants = parse_restaurants(text, &[]);
        assert_eq!(restaurants.len(), 1);
        assert!(restaurants.iter().all(|r| r.name.chars().count() > 1));
    }

    #[test]
    fn test_demo_dataset_reparses_identically() {
        let demo = demo_restaurants();
        let text = demo
            .iter()
            .map(Restaurant::to_triple_line)
            .collect::<Vec<_>>()
            .join("\n");

        let reparsed = parse_restaurants(&text, &[]);

        assert_eq!(reparsed.len(), demo.len());
        for (original, parsed) in demo.iter().zip(&reparsed) {
            assert!(
                original.same_place(parsed),
                "{:?} != {:?}",
                original,
                parsed
            );
        }
    }
}
