// Central finite differences of the layout cost with respect to the
// unknown vector. Each probe runs through `Layout::cost_with_offsets`, which
// restores the layout before the next unknown is touched.

use crate::error::Result;
use crate::placement::Layout;

/// Central-difference gradient, `4 x labels` cost evaluations.
pub fn gradient(layout: &mut Layout) -> Result<Vec<f64>> {
    let delta = layout.config().delta;
    let n = layout.unknown_count();
    let mut grad = Vec::with_capacity(n);
    for i in 0..n {
        let plus = layout.cost_with_offsets(&[(i, delta)])?;
        let minus = layout.cost_with_offsets(&[(i, -delta)])?;
        grad.push((plus - minus) / (2.0 * delta));
    }
    Ok(grad)
}

/// Symmetric finite-difference Hessian.
///
/// Diagnostic only; the solver never calls it. Costs `4 x n(n+1)/2` cost
/// evaluations. On the diagonal the two offsets land on the same unknown,
/// which gives the usual second difference with step `2 x delta`.
pub fn hessian(layout: &mut Layout) -> Result<Vec<Vec<f64>>> {
    let delta = layout.config().delta;
    let n = layout.unknown_count();
    let scale = 1.0 / (4.0 * delta * delta);
    let mut h = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in i..n {
            let pp = layout.cost_with_offsets(&[(i, delta), (j, delta)])?;
            let pm = layout.cost_with_offsets(&[(i, delta), (j, -delta)])?;
            let mp = layout.cost_with_offsets(&[(i, -delta), (j, delta)])?;
            let mm = layout.cost_with_offsets(&[(i, -delta), (j, -delta)])?;
            let value = scale * (pp - pm - mp + mm);
            h[i][j] = value;
            h[j][i] = value;
        }
    }
    Ok(h)
}

pub fn norm(v: &[f64]) -> f64 {
    dot(v, v).sqrt()
}

pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
