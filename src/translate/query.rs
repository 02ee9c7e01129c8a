//! Query parameter translation.

use serde::Deserialize;

/// Inbound query parameters accepted on every list route.
///
/// `sort_order` and `top` stay raw strings here; they are validated where
/// the response is post-processed, not forwarded upstream.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListQuery {
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub availability: Option<String>,
    pub sort_order: Option<String>,
    pub top: Option<String>,
}

/// Scan order is fixed: minPrice, maxPrice, availability. Input order and
/// any unrecognized parameters are ignored.
const FILTER_KEYS: [(&str, fn(&ListQuery) -> Option<&String>); 3] = [
    ("price_gte", |q| q.min_price.as_ref()),
    ("price_lte", |q| q.max_price.as_ref()),
    ("availability", |q| q.availability.as_ref()),
];

/// Map recognized inbound keys to the upstream dialect.
///
/// A parameter is included only when present and non-empty; values pass
/// through verbatim. An empty result means the upstream URL carries no
/// query string at all.
pub fn translate_query(query: &ListQuery) -> Vec<(&'static str, &str)> {
    FILTER_KEYS
        .iter()
        .filter_map(|(upstream_key, get)| {
            get(query)
                .filter(|value| !value.is_empty())
                .map(|value| (*upstream_key, value.as_str()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_all_three_keys_in_scan_order() {
        let query = ListQuery {
            min_price: Some("10".into()),
            max_price: Some("50".into()),
            availability: Some("yes".into()),
            ..Default::default()
        };
        assert_eq!(
            translate_query(&query),
            vec![("price_gte", "10"), ("price_lte", "50"), ("availability", "yes")]
        );
    }

    #[test]
    fn omits_absent_and_empty_values() {
        let query = ListQuery {
            min_price: None,
            max_price: Some(String::new()),
            availability: Some("no".into()),
            ..Default::default()
        };
        assert_eq!(translate_query(&query), vec![("availability", "no")]);
    }

    #[test]
    fn sort_and_top_are_never_forwarded() {
        let query = ListQuery {
            sort_order: Some("priceAsc".into()),
            top: Some("3".into()),
            ..Default::default()
        };
        assert!(translate_query(&query).is_empty());
    }

    #[test]
    fn values_pass_through_verbatim() {
        let query = ListQuery {
            min_price: Some("0".into()),
            ..Default::default()
        };
        assert_eq!(translate_query(&query), vec![("price_gte", "0")]);
    }
}
