//! Restaurant records and the text parsing that produces them.

mod citation;
mod fallback;
mod parser;
mod types;

pub use citation::{find_map_uri, map_search_uri, MAP_SEARCH_BASE};
pub use fallback::demo_restaurants;
pub use parser::{extract_line, parse_restaurants, LineFields, RestaurantParser, FIELD_SEPARATOR};
pub use types::{
    Citation, CitationKind, Coordinates, Restaurant, DEFAULT_CUISINE, DEFAULT_DESCRIPTION,
};
