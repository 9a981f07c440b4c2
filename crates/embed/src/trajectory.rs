//! Delay-coordinate vectors.

use crate::error::EmbedError;
use crate::series::check_finite;

/// An ordered sequence of `len()` points in `dim()`-dimensional space.
///
/// Stored flat and row-major. Built either by delay embedding
/// ([`embed`], [`TimeSeries::embed`](crate::TimeSeries::embed)) or directly
/// from an already reconstructed trajectory ([`EmbeddedTrajectory::from_points`]).
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedTrajectory {
    data: Vec<f64>,
    dim: usize,
}

impl EmbeddedTrajectory {
    /// Wraps a flat row-major buffer of `dim`-dimensional points.
    ///
    /// # Errors
    ///
    /// [`EmbedError::InvalidDimension`] for `dim == 0`,
    /// [`EmbedError::ShapeMismatch`] if the length is not a multiple of `dim`,
    /// [`EmbedError::EmptySeries`] for an empty buffer and
    /// [`EmbedError::NonFiniteInput`] for NaN or infinite coordinates.
    pub fn from_points(data: Vec<f64>, dim: usize) -> Result<Self, EmbedError> {
        if dim == 0 {
            return Err(EmbedError::InvalidDimension { dim });
        }
        if data.len() % dim != 0 {
            return Err(EmbedError::ShapeMismatch {
                len: data.len(),
                width: dim,
            });
        }
        if data.is_empty() {
            return Err(EmbedError::EmptySeries);
        }
        check_finite(&data)?;
        Ok(Self { data, dim })
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.data.len() / self.dim
    }

    /// Always `false`: construction rejects empty trajectories.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Coordinates per point.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Point `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= len()`.
    #[inline]
    pub fn point(&self, i: usize) -> &[f64] {
        &self.data[i * self.dim..(i + 1) * self.dim]
    }

    /// Iterates over the points in order.
    pub fn points(&self) -> std::slice::ChunksExact<'_, f64> {
        self.data.chunks_exact(self.dim)
    }

    /// The flat row-major coordinate buffer.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Consumes the trajectory and returns its flat buffer.
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Minimum and maximum of coordinate `c` over all points.
    ///
    /// # Panics
    ///
    /// Panics if `c >= dim()`.
    pub fn coordinate_range(&self, c: usize) -> (f64, f64) {
        assert!(c < self.dim, "coordinate {c} out of range for dimension {}", self.dim);
        self.points()
            .map(|p| p[c])
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            })
    }
}

/// Number of delay vectors a series of `len` samples yields, or `None` when
/// it is too short.
pub fn embedded_len(len: usize, tau: usize, dim: usize) -> Option<usize> {
    let span = dim.checked_sub(1)?.checked_mul(tau)?;
    len.checked_sub(span).filter(|&m| m > 0)
}

/// Delay-embeds a scalar series.
///
/// Point `i` is `(x[i], x[i + tau], ..., x[i + (dim - 1) * tau])`, and the
/// trajectory has `x.len() - (dim - 1) * tau` points.
///
/// # Errors
///
/// [`EmbedError::InvalidDelay`] for `tau == 0`,
/// [`EmbedError::InvalidDimension`] for `dim == 0`,
/// [`EmbedError::EmptySeries`], [`EmbedError::NonFiniteInput`], and
/// [`EmbedError::SeriesTooShort`] when `x.len() <= (dim - 1) * tau`.
///
/// # Example
///
/// ```
/// use chaoscope_embed::embed;
///
/// let traj = embed(&[1.0, 2.0, 3.0, 4.0, 5.0], 2, 2).unwrap();
/// assert_eq!(traj.len(), 3);
/// assert_eq!(traj.point(0), &[1.0, 3.0]);
/// ```
pub fn embed(x: &[f64], tau: usize, dim: usize) -> Result<EmbeddedTrajectory, EmbedError> {
    embed_rows(x, 1, tau, dim)
}

pub(crate) fn embed_rows(
    data: &[f64],
    width: usize,
    tau: usize,
    dim: usize,
) -> Result<EmbeddedTrajectory, EmbedError> {
    if tau == 0 {
        return Err(EmbedError::InvalidDelay { tau });
    }
    if dim == 0 {
        return Err(EmbedError::InvalidDimension { dim });
    }
    if data.is_empty() {
        return Err(EmbedError::EmptySeries);
    }
    check_finite(data)?;

    let len = data.len() / width;
    let m = embedded_len(len, tau, dim).ok_or(EmbedError::SeriesTooShort {
        len,
        required: (dim - 1).saturating_mul(tau).saturating_add(1),
    })?;

    let point_dim = width * dim;
    let mut out = Vec::with_capacity(m * point_dim);
    for i in 0..m {
        for j in 0..dim {
            let t = i + j * tau;
            out.extend_from_slice(&data[t * width..(t + 1) * width]);
        }
    }
    Ok(EmbeddedTrajectory {
        data: out,
        dim: point_dim,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_embedding_layout() {
        let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let traj = embed(&x, 3, 3).unwrap();
        assert_eq!(traj.len(), 4);
        assert_eq!(traj.dim(), 3);
        assert_eq!(traj.point(0), &[0.0, 3.0, 6.0]);
        assert_eq!(traj.point(3), &[3.0, 6.0, 9.0]);
    }

    #[test]
    fn dimension_one_is_identity() {
        let x = [4.0, 5.0, 6.0];
        let traj = embed(&x, 7, 1).unwrap();
        assert_eq!(traj.as_slice(), &x);
    }

    #[test]
    fn invalid_parameters() {
        let x = [1.0, 2.0, 3.0];
        assert_eq!(embed(&x, 0, 2), Err(EmbedError::InvalidDelay { tau: 0 }));
        assert_eq!(embed(&x, 1, 0), Err(EmbedError::InvalidDimension { dim: 0 }));
        assert_eq!(embed(&[], 1, 1), Err(EmbedError::EmptySeries));
        assert_eq!(
            embed(&x, 2, 3),
            Err(EmbedError::SeriesTooShort { len: 3, required: 5 })
        );
    }

    #[test]
    fn exactly_one_point() {
        let traj = embed(&[1.0, 2.0, 3.0, 4.0, 5.0], 2, 3).unwrap();
        assert_eq!(traj.len(), 1);
        assert_eq!(traj.point(0), &[1.0, 3.0, 5.0]);
    }

    #[test]
    fn embedded_len_edges() {
        assert_eq!(embedded_len(10, 3, 3), Some(4));
        assert_eq!(embedded_len(6, 3, 3), None);
        assert_eq!(embedded_len(7, 3, 3), Some(1));
        assert_eq!(embedded_len(5, 1, 0), None);
        assert_eq!(embedded_len(5, usize::MAX, 3), None);
    }

    #[test]
    fn from_points_validation() {
        let traj = EmbeddedTrajectory::from_points(vec![0.0, 1.0, 2.0, 3.0], 2).unwrap();
        assert_eq!(traj.len(), 2);
        assert_eq!(traj.point(1), &[2.0, 3.0]);
        assert_eq!(traj.coordinate_range(1), (1.0, 3.0));
        assert_eq!(
            EmbeddedTrajectory::from_points(vec![0.0; 3], 2),
            Err(EmbedError::ShapeMismatch { len: 3, width: 2 })
        );
        assert_eq!(
            EmbeddedTrajectory::from_points(vec![0.0, f64::INFINITY], 1),
            Err(EmbedError::NonFiniteInput { index: 1 })
        );
    }
}
