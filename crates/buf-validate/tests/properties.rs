//! Property tests for duplicate detection and flag projection.

use std::sync::Arc;

use buf_ingest::TabularDocument;
use buf_model::{CatalogData, CheckResult, StageLevel};
use buf_validate::rules::Unique;
use buf_validate::{Check, CheckGroup};
use proptest::prelude::*;

fn catalog() -> CatalogData {
    CatalogData {
        columns: vec!["k".to_string()],
        date_format: "%m/%d/%Y".to_string(),
        date_format_desc: "MM/DD/YY".to_string(),
        valid_string: ".*".to_string(),
        valid_filename: ".*".to_string(),
        valid_filename_example: "x.csv".to_string(),
        extension: ".csv".to_string(),
        encoding: "ascii".to_string(),
        extra: Default::default(),
    }
}

proptest! {
    #[test]
    fn duplicate_flags_are_symmetric(keys in prop::collection::vec("[ab]|NULL", 1..24)) {
        let text = format!("k\n{}\n", keys.join("\n"));
        let group = CheckGroup::new(
            StageLevel::Data,
            vec![Check::new(StageLevel::Data, "dupes", "dupes", "", Arc::new(Unique::new(["k"])))],
        );
        let mut document = TabularDocument::new("x.csv", text.into_bytes());
        let rows = group.evaluate(&catalog(), &mut document).unwrap();
        let flagged = rows[0].result.row_indices().map(<[usize]>::to_vec).unwrap_or_default();

        for (idx, key) in keys.iter().enumerate() {
            let count = keys.iter().filter(|other| *other == key).count();
            prop_assert_eq!(flagged.contains(&idx), count > 1);
        }
    }

    #[test]
    fn flag_projection_counts_false_rows(flags in prop::collection::vec(any::<bool>(), 0..48)) {
        let result = CheckResult::from_flags(&flags);
        prop_assert_eq!(result.passed(), flags.iter().all(|ok| *ok));
        prop_assert_eq!(
            result.row_indices().map_or(0, <[usize]>::len),
            flags.iter().filter(|ok| !**ok).count()
        );
    }
}
