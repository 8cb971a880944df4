//! Client-side text filter over the crop list.

use crate::api::Crop;

/// Lowercase and trim a raw query
pub fn normalize_query(query: &str) -> String {
  query.trim().to_lowercase()
}

/// Text the query is matched against: name, zone, notes and harvest date
fn haystack(crop: &Crop) -> String {
  format!(
    "{}{}{}{}",
    crop.name, crop.zone, crop.notes, crop.harvest_on
  )
  .to_lowercase()
}

/// Crops matching `query`, in their original order.
///
/// An empty (or blank) query keeps everything. Never modifies `crops`.
pub fn filter_crops<'a>(crops: &'a [Crop], query: &str) -> Vec<&'a Crop> {
  let needle = normalize_query(query);
  if needle.is_empty() {
    return crops.iter().collect();
  }
  crops
    .iter()
    .filter(|crop| haystack(crop).contains(&needle))
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::fake::crop;

  fn sample() -> Vec<Crop> {
    let mut tomato = crop("Tomate Cherry", 1.0, 2.0);
    tomato.zone = "Invernadero".to_string();
    tomato.notes = "Riego por goteo".to_string();
    tomato.harvest_on = "2026-06-15".to_string();

    let mut garlic = crop("Ajo", 0.5, 1.0);
    garlic.zone = String::new();
    garlic.notes = String::new();
    garlic.harvest_on = "2026-11-02".to_string();

    let mut pepper = crop("Pimiento", 1.0, 3.0);
    pepper.zone = "Bancal Norte".to_string();
    pepper.notes = "Plantado junto al tomate".to_string();
    pepper.harvest_on = "2026-08-20".to_string();

    vec![tomato, garlic, pepper]
  }

  fn names(crops: &[&Crop]) -> Vec<String> {
    crops.iter().map(|c| c.name.clone()).collect()
  }

  #[test]
  fn test_empty_query_returns_everything_in_order() {
    let crops = sample();
    for query in ["", "   ", "\t"] {
      let result = filter_crops(&crops, query);
      assert_eq!(names(&result), vec!["Tomate Cherry", "Ajo", "Pimiento"]);
    }
  }

  #[test]
  fn test_query_is_case_insensitive_and_trimmed() {
    let crops = sample();
    let result = filter_crops(&crops, "  TOMATE ");
    // Matches the name of one and the notes of another
    assert_eq!(names(&result), vec!["Tomate Cherry", "Pimiento"]);
  }

  #[test]
  fn test_matches_zone_and_harvest_date() {
    let crops = sample();
    assert_eq!(names(&filter_crops(&crops, "norte")), vec!["Pimiento"]);
    assert_eq!(names(&filter_crops(&crops, "2026-11")), vec!["Ajo"]);
  }

  #[test]
  fn test_planting_date_is_not_searched() {
    let mut crops = sample();
    for c in crops.iter_mut() {
      c.planted_on = "1999-01-01".to_string();
    }
    assert!(filter_crops(&crops, "1999").is_empty());
  }

  #[test]
  fn test_match_can_span_field_boundary() {
    let crops = sample();
    // "ajo" + "" + "" + "2026-11-02"
    assert_eq!(names(&filter_crops(&crops, "ajo2026")), vec!["Ajo"]);
  }

  #[test]
  fn test_filtered_results_are_subset_containing_query() {
    let crops = sample();
    for query in ["a", "to", "2026", "ri", "zzz", "Bancal"] {
      let needle = normalize_query(query);
      let result = filter_crops(&crops, query);
      assert!(result.len() <= crops.len());
      for c in &result {
        assert!(crops.iter().any(|orig| orig == *c));
        assert!(haystack(c).contains(&needle));
      }
    }
  }

  #[test]
  fn test_non_ascii_query() {
    let mut crops = sample();
    crops[1].notes = "Cosecha en OTOÑO".to_string();
    assert_eq!(names(&filter_crops(&crops, "otoño")), vec!["Ajo"]);
  }

  #[test]
  fn test_no_match() {
    let crops = sample();
    assert!(filter_crops(&crops, "lechuga").is_empty());
  }
}
