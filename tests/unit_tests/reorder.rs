use fenris_fe::reorder::cuthill_mckee_subgraph;
use nalgebra::DMatrix;
use nalgebra_sparse::pattern::SparsityPattern;
use nalgebra_sparse::CsrMatrix;

fn all_vertices(pattern: &SparsityPattern) -> Vec<usize> {
    (0..pattern.major_dim()).collect()
}

#[test]
fn cuthill_mckee_basic_examples() {
    // Basic example
    {
        let matrix = DMatrix::from_row_slice(4, 4, &[1, 0, 1, 1, 0, 1, 0, 1, 1, 0, 1, 0, 1, 1, 0, 1]);
        let pattern = CsrMatrix::from(&matrix).pattern().clone();
        assert_eq!(cuthill_mckee_subgraph(&pattern, &all_vertices(&pattern)), vec![1, 3, 0, 2]);
    }

    // Diagonal pattern
    {
        let matrix = DMatrix::from_row_slice(4, 4, &[1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1]);
        let pattern = CsrMatrix::from(&matrix).pattern().clone();
        assert_eq!(cuthill_mckee_subgraph(&pattern, &all_vertices(&pattern)), vec![0, 1, 2, 3]);
    }
}

/// The path graph 0 - 1 - 2 - 3 - 4, with self loops.
fn path_pattern() -> SparsityPattern {
    SparsityPattern::try_from_offsets_and_indices(
        5,
        5,
        vec![0, 2, 5, 8, 11, 13],
        vec![0, 1, 0, 1, 2, 1, 2, 3, 2, 3, 4, 3, 4],
    )
    .unwrap()
}

#[test]
fn cuthill_mckee_of_subgraphs() {
    let pattern = path_pattern();
    assert_eq!(cuthill_mckee_subgraph(&pattern, &[1, 2, 3]), vec![1, 2, 3]);
    assert_eq!(cuthill_mckee_subgraph(&pattern, &[3, 2, 1]), vec![1, 2, 3]);
    // No two of these vertices are adjacent
    assert_eq!(cuthill_mckee_subgraph(&pattern, &[4, 0, 2]), vec![0, 2, 4]);
    assert!(cuthill_mckee_subgraph(&pattern, &[]).is_empty());

    assert_eq!(cuthill_mckee_subgraph(&pattern, &all_vertices(&pattern)), vec![0, 1, 2, 3, 4]);
}

#[test]
fn cuthill_mckee_of_many_isolated_vertices() {
    // Every vertex is its own component, so each one starts a new breadth-first search
    let n = 200_000;
    let pattern = SparsityPattern::try_from_offsets_and_indices(n, n, vec![0; n + 1], Vec::new()).unwrap();
    let ordering = cuthill_mckee_subgraph(&pattern, &all_vertices(&pattern));
    assert_eq!(ordering, all_vertices(&pattern));

    let odd: Vec<usize> = (0..n).filter(|v| v % 2 == 1).rev().collect();
    let mut expected = odd.clone();
    expected.sort_unstable();
    assert_eq!(cuthill_mckee_subgraph(&pattern, &odd), expected);
}
