#[cfg(test)]
mod tests {
    use cuboid::model::types::{canonical_cmp, AggregationKind, Scalar};
    use std::cmp::Ordering;

    #[test]
    fn test_scalar_deserializes_untagged() {
        let number: Scalar = serde_json::from_str("2023").unwrap();
        assert_eq!(number, Scalar::Number(2023.0));

        let text: Scalar = serde_json::from_str("\"North America\"").unwrap();
        assert_eq!(text, Scalar::Str("North America".to_string()));
    }

    #[test]
    fn test_year_labels_have_no_fractional_suffix() {
        let year: Scalar = serde_json::from_str("2023").unwrap();
        assert_eq!(year.to_string(), "2023");
        assert_eq!(year.key_string(), "2023");
    }

    #[test]
    fn test_fractional_values_keep_digits() {
        assert_eq!(Scalar::Number(0.25).key_string(), "0.25");
    }

    #[test]
    fn test_all_sentinel() {
        assert_eq!(Scalar::all(), Scalar::Str("All".to_string()));
    }

    #[test]
    fn test_canonical_cmp_is_total_over_mixed_values() {
        let values = [
            Scalar::Number(10.0),
            Scalar::Str("Europe".to_string()),
            Scalar::Number(9.0),
            Scalar::Str("Asia".to_string()),
        ];

        let mut sorted = values.to_vec();
        sorted.sort_by(canonical_cmp);

        // Numeric pairs compare numerically; mixed pairs fall back to the
        // canonical string forms.
        assert_eq!(
            canonical_cmp(&Scalar::Number(9.0), &Scalar::Number(10.0)),
            Ordering::Less
        );
        let resorted = {
            let mut again = sorted.clone();
            again.sort_by(canonical_cmp);
            again
        };
        assert_eq!(sorted, resorted); // stable under re-sorting
    }

    #[test]
    fn test_aggregation_kinds_deserialize_lowercase() {
        for (text, kind) in [
            ("\"sum\"", AggregationKind::Sum),
            ("\"count\"", AggregationKind::Count),
            ("\"avg\"", AggregationKind::Avg),
            ("\"min\"", AggregationKind::Min),
            ("\"max\"", AggregationKind::Max),
            ("\"distinct\"", AggregationKind::Distinct),
        ] {
            let parsed: AggregationKind = serde_json::from_str(text).unwrap();
            assert_eq!(parsed, kind);
        }
    }
}
