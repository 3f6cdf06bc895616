use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IndexError {
    #[error("cannot index zero-dimension vectors")]
    ZeroDimension,

    #[error("vector {index} has dimension {found}, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("query has dimension {found}, index expects {expected}")]
    QueryDimension { expected: usize, found: usize },
}

/// Exact Euclidean index: a brute-force scan over a flat row-major buffer.
///
/// Built once per match and dropped with it; there is no insert or delete.
#[derive(Debug, Clone)]
pub struct FlatIndex {
    dim: usize,
    data: Vec<f32>,
}

impl FlatIndex {
    pub fn build(embeddings: &[Vec<f32>]) -> Result<Self, IndexError> {
        let dim = embeddings.first().map(Vec::len).unwrap_or(0);
        if dim == 0 && !embeddings.is_empty() {
            return Err(IndexError::ZeroDimension);
        }

        let mut data = Vec::with_capacity(dim * embeddings.len());
        for (index, vector) in embeddings.iter().enumerate() {
            if vector.len() != dim {
                return Err(IndexError::DimensionMismatch {
                    index,
                    expected: dim,
                    found: vector.len(),
                });
            }
            data.extend_from_slice(vector);
        }
        Ok(Self { dim, data })
    }

    pub fn len(&self) -> usize {
        if self.dim == 0 {
            0
        } else {
            self.data.len() / self.dim
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns up to `top_k` `(row, distance)` pairs ordered by ascending
    /// Euclidean distance; equal distances keep the lower row first.
    pub fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<(usize, f32)>, IndexError> {
        if self.is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }
        if query.len() != self.dim {
            return Err(IndexError::QueryDimension {
                expected: self.dim,
                found: query.len(),
            });
        }

        let mut hits: Vec<(usize, f32)> = self
            .data
            .chunks_exact(self.dim)
            .enumerate()
            .map(|(row, vector)| (row, squared_l2(vector, query)))
            .collect();

        // NaN distances (from a misbehaving embedder) sort after every real one.
        hits.sort_by(|a, b| {
            a.1.is_nan()
                .cmp(&b.1.is_nan())
                .then(a.1.total_cmp(&b.1))
                .then(a.0.cmp(&b.0))
        });
        hits.truncate(top_k);

        Ok(hits.into_iter().map(|(row, d2)| (row, d2.sqrt())).collect())
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> FlatIndex {
        FlatIndex::build(&[vec![0.0, 0.0], vec![3.0, 4.0], vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap()
    }

    #[test]
    fn test_search_orders_by_distance() {
        let hits = index().search(&[3.0, 3.0], 2).unwrap();
        assert_eq!(hits[0].0, 1);
        assert!((hits[0].1 - 1.0).abs() < 1e-6);
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_ties_prefer_lower_row() {
        let hits = index().search(&[0.5, 0.5], 4).unwrap();
        // rows 0, 2 and 3 are all sqrt(0.5) away
        assert_eq!(hits.iter().map(|h| h.0).collect::<Vec<_>>(), vec![0, 2, 3, 1]);
    }

    #[test]
    fn test_nan_rows_rank_last_without_panicking() {
        let index = FlatIndex::build(&[
            vec![f32::NAN, 0.0],
            vec![1.0, 0.0],
            vec![f32::NAN, f32::NAN],
            vec![0.0, 0.0],
        ])
        .unwrap();
        let hits = index.search(&[0.0, 0.0], 4).unwrap();
        assert_eq!(hits.len(), 4);
        assert_eq!((hits[0].0, hits[1].0), (3, 1));
        assert!(hits[2].1.is_nan() && hits[3].1.is_nan());
    }

    #[test]
    fn test_top_k_larger_than_index() {
        let hits = index().search(&[0.0, 0.0], 10).unwrap();
        assert_eq!(hits.len(), 4);
        assert_eq!(hits[0], (0, 0.0));
    }

    #[test]
    fn test_reports_euclidean_not_squared() {
        let hits = index().search(&[0.0, 0.0], 4).unwrap();
        let far = hits.iter().find(|h| h.0 == 1).unwrap();
        assert!((far.1 - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_build_rejects_mixed_dimensions() {
        let err = FlatIndex::build(&[vec![1.0, 2.0], vec![1.0]]).unwrap_err();
        assert_eq!(
            err,
            IndexError::DimensionMismatch {
                index: 1,
                expected: 2,
                found: 1
            }
        );
        assert_eq!(FlatIndex::build(&[vec![]]).unwrap_err(), IndexError::ZeroDimension);
    }

    #[test]
    fn test_query_dimension_checked() {
        assert!(matches!(
            index().search(&[1.0, 2.0, 3.0], 1),
            Err(IndexError::QueryDimension { expected: 2, found: 3 })
        ));
    }

    #[test]
    fn test_empty_index_returns_nothing() {
        let empty = FlatIndex::build(&[]).unwrap();
        assert!(empty.is_empty());
        assert!(empty.search(&[1.0], 3).unwrap().is_empty());
    }
}
