//! Stateless helpers: Cartesian products, header merge planning, text width.

use crate::spec::SpecMergeRange;

////////////////////////////////////////////////////////////////////////////////
// #region CartesianProduct

/// N-ary Cartesian product, one combination per item, first list outermost.
///
/// No lists yield a single empty combination; any empty list yields none.
pub fn generate_cartesian_product<T: Clone>(lists: &[Vec<T>]) -> Vec<Vec<T>> {
    lists.iter().fold(vec![Vec::new()], |l_combinations, list| {
        l_combinations
            .iter()
            .flat_map(|prefix| {
                list.iter().map(move |item| {
                    let mut combination = prefix.clone();
                    combination.push(item.clone());
                    combination
                })
            })
            .collect()
    })
}

/// Column-major ("unzipped") Cartesian product: one row per input list.
///
/// Row `i` holds the item of list `i` for every combination, so each item is
/// repeated by the product of the sizes after `i` and the whole sequence is
/// cycled by the product of the sizes before `i`.
pub fn derive_cartesian_columns<T: Clone>(lists: &[Vec<T>]) -> Vec<Vec<T>> {
    let n_width = lists.iter().map(Vec::len).product::<usize>();

    lists
        .iter()
        .enumerate()
        .map(|(n_idx_list, list)| {
            if n_width == 0 {
                return Vec::new();
            }
            let n_repeat_item = lists[n_idx_list + 1..]
                .iter()
                .map(Vec::len)
                .product::<usize>();
            let n_repeat_cycle = n_width / (n_repeat_item * list.len());

            let mut l_row = Vec::with_capacity(n_width);
            for _ in 0..n_repeat_cycle {
                for item in list {
                    l_row.extend(std::iter::repeat_n(item.clone(), n_repeat_item));
                }
            }
            l_row
        })
        .collect()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region HeaderMergeUtils

/// Plan merges for one header row.
///
/// Returns inclusive `(col_start, col_end)` runs of identical non-empty labels;
/// single cells and empty/absent labels are never merged.
pub fn derive_merge_ranges(row: &[Option<String>]) -> Vec<(usize, usize)> {
    let n_cols = row.len();
    let mut l_ranges = Vec::new();
    let mut n_col_idx = 0;

    while n_col_idx < n_cols {
        let Some(c_cell_val) = row[n_col_idx].as_deref().filter(|val| !val.is_empty()) else {
            n_col_idx += 1;
            continue;
        };

        let mut n_col_idx_end = n_col_idx + 1;
        while n_col_idx_end < n_cols && row[n_col_idx_end].as_deref() == Some(c_cell_val) {
            n_col_idx_end += 1;
        }

        if n_col_idx_end - n_col_idx > 1 {
            l_ranges.push((n_col_idx, n_col_idx_end - 1));
        }
        n_col_idx = n_col_idx_end;
    }

    l_ranges
}

/// Plan merges for a header band whose first row sits at `row_idx_offset`.
pub fn plan_header_merges(
    header_rows: &[Vec<Option<String>>],
    row_idx_offset: usize,
) -> Vec<SpecMergeRange> {
    header_rows
        .iter()
        .enumerate()
        .flat_map(|(n_idx_row, row)| {
            derive_merge_ranges(row)
                .into_iter()
                .map(move |(col_idx_start, col_idx_end)| SpecMergeRange {
                    row_idx: row_idx_offset + n_idx_row,
                    col_idx_start,
                    col_idx_end,
                    text: row[col_idx_start].clone().unwrap_or_default(),
                })
        })
        .collect()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region TextWidth

/// Display length in characters.
pub fn derive_text_width(value: &str) -> usize {
    value.chars().count()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    fn make_row(values: &[Option<&str>]) -> Vec<Option<String>> {
        values.iter().map(|val| val.map(str::to_string)).collect()
    }

    #[test]
    fn test_generate_cartesian_product_first_list_outermost() {
        let lists = vec![vec!["a", "b"], vec!["1", "2", "3"]];
        assert_eq!(
            generate_cartesian_product(&lists),
            vec![
                vec!["a", "1"],
                vec!["a", "2"],
                vec!["a", "3"],
                vec!["b", "1"],
                vec!["b", "2"],
                vec!["b", "3"],
            ]
        );
    }

    #[test]
    fn test_generate_cartesian_product_edge_sizes() {
        let no_lists: Vec<Vec<u8>> = vec![];
        assert_eq!(generate_cartesian_product(&no_lists), vec![Vec::<u8>::new()]);
        assert!(generate_cartesian_product(&[vec![1, 2], vec![]]).is_empty());
    }

    #[test]
    fn test_derive_cartesian_columns_is_transposed_product() {
        let lists = vec![vec!["F", "M"], vec!["<5", "5-14", "15+"], vec!["new", "old"]];

        let l_columns = derive_cartesian_columns(&lists);
        let l_product = generate_cartesian_product(&lists);

        assert_eq!(l_columns.len(), 3);
        for (n_idx_col, combination) in l_product.iter().enumerate() {
            for (n_idx_row, item) in combination.iter().enumerate() {
                assert_eq!(&l_columns[n_idx_row][n_idx_col], item);
            }
        }
        assert_eq!(
            l_columns[0],
            vec!["F", "F", "F", "F", "F", "F", "M", "M", "M", "M", "M", "M"]
        );
        assert_eq!(
            l_columns[2],
            vec!["new", "old", "new", "old", "new", "old", "new", "old", "new", "old", "new", "old"]
        );
    }

    #[test]
    fn test_derive_cartesian_columns_with_empty_list_yields_empty_rows() {
        let l_columns = derive_cartesian_columns(&[vec![1, 2], vec![]]);
        assert_eq!(l_columns, vec![Vec::<i32>::new(), Vec::new()]);
    }

    #[test]
    fn test_derive_merge_ranges_groups_repeated_labels() {
        let row = make_row(&[
            None,
            Some("X"),
            Some("X"),
            Some("Y"),
            Some("Y"),
            Some("Y"),
            Some("Z"),
        ]);

        let l_ranges = derive_merge_ranges(&row);
        assert_eq!(l_ranges, vec![(1, 2), (3, 5)]);

        // Same spans as 1-indexed sheet columns.
        let l_ranges_1based: Vec<[usize; 2]> = l_ranges
            .iter()
            .map(|(start, end)| [start + 1, end + 1])
            .collect();
        assert_eq!(l_ranges_1based, vec![[2, 3], [4, 6]]);
    }

    #[test]
    fn test_derive_merge_ranges_never_merges_blanks_or_non_adjacent_repeats() {
        let row = make_row(&[None, None, Some(""), Some(""), Some("A"), Some("B"), Some("A")]);
        assert!(derive_merge_ranges(&row).is_empty());
        assert!(derive_merge_ranges(&[]).is_empty());
    }

    #[test]
    fn test_plan_header_merges_uses_absolute_rows() {
        let header_rows = vec![
            make_row(&[None, Some("F"), Some("F"), Some("M"), Some("M")]),
            make_row(&[None, Some("<5"), Some("5+"), Some("<5"), Some("5+")]),
        ];

        let l_merges = plan_header_merges(&header_rows, 10);
        assert_eq!(
            l_merges,
            vec![
                SpecMergeRange {
                    row_idx: 10,
                    col_idx_start: 1,
                    col_idx_end: 2,
                    text: "F".to_string(),
                },
                SpecMergeRange {
                    row_idx: 10,
                    col_idx_start: 3,
                    col_idx_end: 4,
                    text: "M".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_derive_text_width_counts_chars() {
        assert_eq!(derive_text_width("Niños"), 5);
        assert_eq!(derive_text_width(""), 0);
    }
}
