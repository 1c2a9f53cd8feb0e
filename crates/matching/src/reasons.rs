//! "Why we recommend this" reasons built from matched attributes.

use crate::scorer::MatchedAttributes;
use crate::vectors::AttributeCategory;
use crate::weights::CategoryWeights;

/// Tags quoted per reason before the rest is summarized as "+N more".
const TAGS_PER_REASON: usize = 3;

/// Build at most `limit` reasons, one per matched category.
///
/// Categories are ordered by weight, then by how many tags matched, then by
/// declaration order.
pub fn explain(matched: &MatchedAttributes, weights: &CategoryWeights, limit: usize) -> Vec<String> {
    let mut ranked: Vec<(AttributeCategory, &Vec<String>)> = matched
        .iter()
        .filter(|(_, tags)| !tags.is_empty())
        .map(|(&category, tags)| (category, tags))
        .collect();

    ranked.sort_by(|(cat_a, tags_a), (cat_b, tags_b)| {
        let weight_a = weights.get(*cat_a).unwrap_or(0.0);
        let weight_b = weights.get(*cat_b).unwrap_or(0.0);
        weight_b
            .total_cmp(&weight_a)
            .then_with(|| tags_b.len().cmp(&tags_a.len()))
            .then_with(|| cat_a.cmp(cat_b))
    });

    ranked
        .into_iter()
        .take(limit)
        .map(|(category, tags)| reason(category, tags))
        .collect()
}

fn reason(category: AttributeCategory, tags: &[String]) -> String {
    let list = quote(tags);
    match category {
        AttributeCategory::StylePreferences => format!("Shares your {} style", list),
        AttributeCategory::Interests => format!("Into {}, just like you", list),
        AttributeCategory::FavoriteCategories => format!("In categories you browse: {}", list),
        AttributeCategory::FavoriteColors => format!("Comes in colors you love: {}", list),
        AttributeCategory::FavoriteStores => format!("From brands you shop: {}", list),
        AttributeCategory::PriceAffinity => format!("Fits your {} budget", list),
    }
}

fn quote(tags: &[String]) -> String {
    let shown = tags
        .iter()
        .take(TAGS_PER_REASON)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if tags.len() > TAGS_PER_REASON {
        format!("{} +{} more", shown, tags.len() - TAGS_PER_REASON)
    } else {
        shown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_orders_by_weight_then_count() {
        let mut matched = MatchedAttributes::new();
        matched.insert(AttributeCategory::FavoriteColors, tags(&["Black", "White"]));
        matched.insert(AttributeCategory::StylePreferences, tags(&["Minimalist"]));
        matched.insert(AttributeCategory::Interests, tags(&["Hiking"]));

        let weights = CategoryWeights::default().with(AttributeCategory::StylePreferences, 2.0);
        let reasons = explain(&matched, &weights, 2);

        assert_eq!(
            reasons,
            vec![
                "Shares your Minimalist style".to_string(),
                "Comes in colors you love: Black, White".to_string(),
            ]
        );
    }

    #[test]
    fn test_long_lists_are_summarized() {
        let mut matched = MatchedAttributes::new();
        matched.insert(
            AttributeCategory::Interests,
            tags(&["Hiking", "Yoga", "Cooking", "Travel", "Running"]),
        );
        let reasons = explain(&matched, &CategoryWeights::default(), 3);
        assert_eq!(reasons, vec!["Into Hiking, Yoga, Cooking +2 more, just like you".to_string()]);
    }

    #[test]
    fn test_no_matches_no_reasons() {
        assert!(explain(&MatchedAttributes::new(), &CategoryWeights::default(), 3).is_empty());
    }
}
