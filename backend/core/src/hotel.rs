use serde_json::Number;

/// One accommodation as returned by the keyword hotel search.
///
/// Numeric fields keep the exact decimal form the API sent so that rendered
/// prices and coordinates match the source text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hotel {
    pub name: String,
    pub image_url: String,
    pub information_url: String,
    pub address1: String,
    pub address2: String,
    pub min_charge: Option<Number>,
    pub telephone_no: String,
    pub latitude: Option<Number>,
    pub longitude: Option<Number>,
}

/// Interpreted outcome of a successful search call.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchResult {
    /// The API reported that nothing matched the keyword.
    Error,
    /// Hotels in the order the API ranked them.
    HotelList(Vec<Hotel>),
}

impl SearchResult {
    pub fn hotels(&self) -> &[Hotel] {
        match self {
            SearchResult::Error => &[],
            SearchResult::HotelList(hotels) => hotels,
        }
    }
}
