//! Kochanek-Bartels (TCB) spline over 3D points.
//!
//! Each keyframe channel (position, focal point, view-up) is fitted with one
//! of these. Components are interpolated independently, so a `KochanekSpline`
//! over `DVec3` behaves exactly like three scalar splines sharing their knots.
//!
//! Between knots `k` and `k + 1` the curve is the cubic Hermite segment
//! through both values, leaving `k` along its outgoing tangent and arriving
//! at `k + 1` along its incoming tangent. Tangents are expressed per segment
//! and rescaled for non-uniform knot spacing.

use glam::DVec3;

use crate::error::{FlythroughError, Result};
use crate::options::{EndConstraint, SplineOptions};

/// Upper bound on the number of points [`KochanekSpline::sample`] produces.
pub const MAX_SAMPLES: usize = 1 << 20;

/// A fitted interpolating spline `time -> DVec3`.
#[derive(Debug, Clone, PartialEq)]
pub struct KochanekSpline {
    times: Vec<f64>,
    values: Vec<DVec3>,
    outgoing: Vec<DVec3>,
    incoming: Vec<DVec3>,
}

impl KochanekSpline {
    /// Fits a spline through `knots`, which must be sorted by strictly
    /// increasing, finite time.
    ///
    /// A single knot yields a constant curve.
    pub fn fit(knots: &[(f64, DVec3)], options: &SplineOptions) -> Result<Self> {
        if knots.is_empty() {
            return Err(FlythroughError::InsufficientKeyFrames);
        }
        if knots.iter().any(|(t, _)| !t.is_finite())
            || knots.windows(2).any(|w| w[0].0 >= w[1].0)
        {
            return Err(FlythroughError::NonIncreasingKnots);
        }

        let times: Vec<f64> = knots.iter().map(|(t, _)| t + 0.0).collect();
        let values: Vec<DVec3> = knots.iter().map(|(_, v)| *v).collect();
        let n = values.len();
        let mut outgoing = vec![DVec3::ZERO; n];
        let mut incoming = vec![DVec3::ZERO; n];

        if n >= 2 {
            interior_tangents(&times, &values, options, &mut outgoing, &mut incoming);
            end_tangents(&values, options, &mut outgoing, &mut incoming);
        }

        Ok(Self {
            times,
            values,
            outgoing,
            incoming,
        })
    }

    /// Returns the number of knots.
    #[must_use]
    pub fn num_points(&self) -> usize {
        self.times.len()
    }

    /// Returns the `(min, max)` knot times.
    #[must_use]
    pub fn parametric_range(&self) -> (f64, f64) {
        // `fit` guarantees at least one knot.
        (self.times[0], self.times[self.times.len() - 1])
    }

    /// Returns the knots as `(time, value)` pairs.
    pub fn knots(&self) -> impl Iterator<Item = (f64, DVec3)> + '_ {
        self.times.iter().copied().zip(self.values.iter().copied())
    }

    /// Clamps `t` into the parametric range. NaN maps to the start and
    /// `-0.0` to `0.0`.
    #[must_use]
    pub fn clamp(&self, t: f64) -> f64 {
        let (min, max) = self.parametric_range();
        if t.is_nan() {
            min
        } else {
            t.clamp(min, max) + 0.0
        }
    }

    /// Evaluates the spline at `t`, clamped to the parametric range.
    ///
    /// Knot times return the knot value exactly.
    #[must_use]
    pub fn evaluate(&self, t: f64) -> DVec3 {
        let t = self.clamp(t);
        let i = self.times.partition_point(|&k| k < t);
        if self.times[i] == t {
            return self.values[i];
        }
        // `t` is clamped and not a knot, so `i` lies in `1..n`.
        let segment = i - 1;

        let t0 = self.times[segment];
        let t1 = self.times[segment + 1];
        let u = (t - t0) / (t1 - t0);
        hermite(
            u,
            self.values[segment],
            self.outgoing[segment],
            self.values[segment + 1],
            self.incoming[segment + 1],
        )
    }

    /// Samples the curve at `rate` samples per time unit, always ending on the
    /// last knot.
    ///
    /// Fails with [`FlythroughError::InvalidOption`] when that would take more
    /// than [`MAX_SAMPLES`] points.
    pub fn sample(&self, rate: u32) -> Result<Vec<DVec3>> {
        let (min, max) = self.parametric_range();
        let rate = f64::from(rate.max(1));
        let span = (rate * (max - min)).floor();
        if span >= MAX_SAMPLES as f64 {
            return Err(FlythroughError::InvalidOption(format!(
                "sampling [{min}, {max}] at {rate} per unit exceeds {MAX_SAMPLES} points"
            )));
        }
        let count = span as usize;

        let mut points: Vec<DVec3> = (0..count)
            .map(|i| self.evaluate(min + i as f64 / rate))
            .collect();
        points.push(self.values[self.values.len() - 1]);
        Ok(points)
    }
}

/// Computes TCB tangents at every knot that has two neighbours.
fn interior_tangents(
    times: &[f64],
    values: &[DVec3],
    options: &SplineOptions,
    outgoing: &mut [DVec3],
    incoming: &mut [DVec3],
) {
    let SplineOptions {
        tension: t,
        continuity: c,
        bias: b,
        ..
    } = *options;

    // Weights on the incoming chord (d0) and outgoing chord (d1).
    let out_d0 = (1.0 - t) * (1.0 + b) * (1.0 + c) / 2.0;
    let out_d1 = (1.0 - t) * (1.0 - b) * (1.0 - c) / 2.0;
    let in_d0 = (1.0 - t) * (1.0 + b) * (1.0 - c) / 2.0;
    let in_d1 = (1.0 - t) * (1.0 - b) * (1.0 + c) / 2.0;

    for i in 1..values.len() - 1 {
        let d0 = values[i] - values[i - 1];
        let d1 = values[i + 1] - values[i];
        let n0 = times[i] - times[i - 1];
        let n1 = times[i + 1] - times[i];

        outgoing[i] = (d0 * out_d0 + d1 * out_d1) * (2.0 * n1 / (n0 + n1));
        incoming[i] = (d0 * in_d0 + d1 * in_d1) * (2.0 * n0 / (n0 + n1));
    }
}

/// Applies the end constraints. Requires at least two knots.
///
/// Two knots are joined by a straight segment at constant speed and the end
/// constraints do not apply.
fn end_tangents(
    values: &[DVec3],
    options: &SplineOptions,
    outgoing: &mut [DVec3],
    incoming: &mut [DVec3],
) {
    let last = values.len() - 1;
    let first_chord = values[1] - values[0];
    let last_chord = values[last] - values[last - 1];

    if last == 1 {
        outgoing.fill(first_chord);
        incoming.fill(first_chord);
        return;
    }

    // Fixed derivatives first so second-derivative ends can read their
    // neighbouring tangent.
    if let EndConstraint::Derivative(v) = options.left {
        outgoing[0] = DVec3::splat(v);
        incoming[0] = outgoing[0];
    }
    if let EndConstraint::Derivative(v) = options.right {
        incoming[last] = DVec3::splat(v);
        outgoing[last] = incoming[last];
    }
    if let EndConstraint::SecondDerivative(a) = options.left {
        outgoing[0] = (first_chord * 6.0 - incoming[1] * 2.0 - DVec3::splat(a)) / 4.0;
        incoming[0] = outgoing[0];
    }
    if let EndConstraint::SecondDerivative(b) = options.right {
        incoming[last] = (last_chord * 6.0 - outgoing[last - 1] * 2.0 + DVec3::splat(b)) / 4.0;
        outgoing[last] = incoming[last];
    }
}

/// Cubic Hermite segment on `u` in `[0, 1]`.
fn hermite(u: f64, p0: DVec3, m0: DVec3, p1: DVec3, m1: DVec3) -> DVec3 {
    let u2 = u * u;
    let u3 = u2 * u;
    let h00 = 2.0 * u3 - 3.0 * u2 + 1.0;
    let h10 = u3 - 2.0 * u2 + u;
    let h01 = -2.0 * u3 + 3.0 * u2;
    let h11 = u3 - u2;
    p0 * h00 + m0 * h10 + p1 * h01 + m1 * h11
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fit(knots: &[(f64, DVec3)]) -> KochanekSpline {
        KochanekSpline::fit(knots, &SplineOptions::default()).unwrap()
    }

    #[test]
    fn test_empty_knots_rejected() {
        assert!(matches!(
            KochanekSpline::fit(&[], &SplineOptions::default()),
            Err(FlythroughError::InsufficientKeyFrames)
        ));
    }

    #[test]
    fn test_non_increasing_knots_rejected() {
        let knots = [(1.0, DVec3::ZERO), (1.0, DVec3::X)];
        assert!(matches!(
            KochanekSpline::fit(&knots, &SplineOptions::default()),
            Err(FlythroughError::NonIncreasingKnots)
        ));
        let knots = [(2.0, DVec3::ZERO), (1.0, DVec3::X)];
        assert!(KochanekSpline::fit(&knots, &SplineOptions::default()).is_err());
    }

    #[test]
    fn test_single_knot_is_constant() {
        let spline = fit(&[(5.0, DVec3::new(1.0, 2.0, 3.0))]);
        assert_eq!(spline.evaluate(-10.0), DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(spline.evaluate(5.0), DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(spline.evaluate(1e9), DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(spline.parametric_range(), (5.0, 5.0));
    }

    #[test]
    fn test_two_knots_are_linear() {
        let spline = fit(&[(0.0, DVec3::ZERO), (10.0, DVec3::splat(10.0))]);
        for t in [1.0, 2.5, 5.0, 7.5, 9.0] {
            assert!((spline.evaluate(t) - DVec3::splat(t)).length() < 1e-12);
        }
    }

    #[test]
    fn test_two_knots_ignore_end_constraints() {
        let options = SplineOptions {
            left: EndConstraint::SecondDerivative(3.0),
            right: EndConstraint::Derivative(-2.0),
            ..SplineOptions::default()
        };
        let spline =
            KochanekSpline::fit(&[(0.0, DVec3::ZERO), (4.0, DVec3::new(8.0, 0.0, 0.0))], &options)
                .unwrap();
        assert!((spline.evaluate(1.0).x - 2.0).abs() < 1e-12);
        assert!((spline.evaluate(3.0).x - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_flat_ends_ease_three_knots() {
        // Zero end derivatives: the first segment starts slower than its chord.
        let spline = fit(&[
            (0.0, DVec3::ZERO),
            (10.0, DVec3::splat(10.0)),
            (20.0, DVec3::splat(20.0)),
        ]);
        assert!(spline.evaluate(1.0).x < 1.0);
        assert!((spline.evaluate(10.0) - DVec3::splat(10.0)).length() < 1e-12);
    }

    #[test]
    fn test_natural_start_has_no_curvature() {
        let options = SplineOptions {
            left: EndConstraint::SecondDerivative(0.0),
            ..SplineOptions::default()
        };
        let spline = KochanekSpline::fit(
            &[(0.0, DVec3::ZERO), (1.0, DVec3::X), (2.0, DVec3::ZERO)],
            &options,
        )
        .unwrap();
        let h = 1e-4;
        let second = (spline.evaluate(2.0 * h).x - 2.0 * spline.evaluate(h).x
            + spline.evaluate(0.0).x)
            / (h * h);
        assert!(second.abs() < 1e-2, "second difference {second}");
    }

    #[test]
    fn test_negative_zero_time_does_not_panic() {
        let spline = fit(&[(0.0, DVec3::ZERO), (100.0, DVec3::X)]);
        assert_eq!(spline.evaluate(-0.0), DVec3::ZERO);

        let single = fit(&[(-0.0, DVec3::Y)]);
        assert_eq!(single.evaluate(0.0), DVec3::Y);
        assert!(single.parametric_range().0.is_sign_positive());
    }

    #[test]
    fn test_signed_zero_knots_rejected() {
        let knots = [(-0.0, DVec3::ZERO), (0.0, DVec3::X)];
        assert!(matches!(
            KochanekSpline::fit(&knots, &SplineOptions::default()),
            Err(FlythroughError::NonIncreasingKnots)
        ));
    }

    #[test]
    fn test_monotonic_first_segment() {
        let spline = fit(&[
            (0.0, DVec3::ZERO),
            (100.0, DVec3::new(10.0, 0.0, 0.0)),
            (200.0, DVec3::new(10.0, 10.0, 0.0)),
        ]);
        let mut previous = spline.evaluate(0.0).x;
        for t in 1..=100 {
            let x = spline.evaluate(f64::from(t)).x;
            assert!(x > previous, "x must increase at t = {t}");
            previous = x;
        }
    }

    #[test]
    fn test_nan_time_does_not_panic() {
        let spline = fit(&[(0.0, DVec3::ZERO), (1.0, DVec3::X)]);
        assert_eq!(spline.evaluate(f64::NAN), DVec3::ZERO);
    }

    #[test]
    fn test_sample_ends_on_last_knot() {
        let spline = fit(&[(0.0, DVec3::ZERO), (2.0, DVec3::X)]);
        let points = spline.sample(30).unwrap();
        assert_eq!(points.len(), 61);
        assert_eq!(points[0], DVec3::ZERO);
        assert_eq!(points[60], DVec3::X);
    }

    #[test]
    fn test_sample_wide_span_rejected() {
        let spline = fit(&[(0.0, DVec3::ZERO), (1e300, DVec3::X)]);
        assert!(matches!(
            spline.sample(30),
            Err(FlythroughError::InvalidOption(_))
        ));
        let spline = fit(&[(0.0, DVec3::ZERO), (1e5, DVec3::X)]);
        assert!(spline.sample(30).is_err());
        assert_eq!(spline.sample(1).unwrap().len(), 100_001);
    }

    #[test]
    fn test_tension_one_flattens_interior() {
        let options = SplineOptions {
            tension: 1.0,
            ..SplineOptions::default()
        };
        let spline = KochanekSpline::fit(
            &[(0.0, DVec3::ZERO), (1.0, DVec3::X), (2.0, DVec3::ZERO)],
            &options,
        )
        .unwrap();
        // With every tangent zero the segment is a pure smoothstep.
        assert!((spline.evaluate(0.5).x - 0.5).abs() < 1e-12);
    }

    fn increasing_knots() -> impl Strategy<Value = Vec<(f64, DVec3)>> {
        prop::collection::vec(
            (0.5f64..50.0, -100.0f64..100.0, -100.0f64..100.0, -100.0f64..100.0),
            1..8,
        )
        .prop_map(|steps| {
            let mut time = 0.0;
            steps
                .into_iter()
                .map(|(dt, x, y, z)| {
                    time += dt;
                    (time, DVec3::new(x, y, z))
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_passes_through_knots(knots in increasing_knots()) {
            let spline = fit(&knots);
            for (t, value) in &knots {
                prop_assert_eq!(spline.evaluate(*t), *value);
            }
        }

        #[test]
        fn prop_clamps_outside_range(knots in increasing_knots(), beyond in 0.0f64..1000.0) {
            let spline = fit(&knots);
            let (min, max) = spline.parametric_range();
            prop_assert_eq!(spline.evaluate(max + beyond), spline.evaluate(max));
            prop_assert_eq!(spline.evaluate(min - beyond), spline.evaluate(min));
        }
    }
}
