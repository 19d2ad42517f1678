//! Tests for label maps

#[cfg(test)]
mod tests {
    use ndarray::array;
    use patchwork::analysis::labels::LabelMap;

    // Tests that sparse numbering yields only the labels present
    // Verified by returning 0..max instead of the occupied labels
    #[test]
    fn test_distinct_labels_skip_gaps() {
        let labels = LabelMap::new(array![[0, 0, 5], [5, 2, 2]]);
        assert_eq!(labels.distinct_labels(), vec![0, 2, 5]);
        assert_eq!(labels.label_count(), 3);
    }

    // Tests per-label pixel counts add up to the image area
    #[test]
    fn test_pixel_counts_partition_image() {
        let labels = LabelMap::new(array![[1, 1, 3], [3, 3, 7], [7, 1, 1]]);
        let total: usize = labels
            .distinct_labels()
            .into_iter()
            .map(|label| labels.pixel_count(label))
            .sum();
        assert_eq!(total, 9);
        assert_eq!(labels.pixel_count(1), 4);
        assert_eq!(labels.pixel_count(4), 0);
    }

    // Tests the uniform constructor and accessors
    #[test]
    fn test_uniform() {
        let labels = LabelMap::uniform(3, 2);
        assert_eq!(labels.dim(), (3, 2));
        assert_eq!(labels.distinct_labels(), vec![0]);
        assert_eq!(labels.get(2, 1), Some(0));
        assert_eq!(labels.get(3, 0), None);
        assert_eq!(labels.as_array().len(), 6);
    }

    // Tests that an empty map has no labels
    #[test]
    fn test_empty_map() {
        let labels = LabelMap::uniform(0, 4);
        assert!(labels.distinct_labels().is_empty());
    }
}
