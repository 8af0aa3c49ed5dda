// src/grid/tests.rs

//! Unit tests for `TransformedGrid` and `GridCursor`: laziness, copy
//! independence, transform isolation and the bounds-aware construction path.

#[cfg(test)]
mod grid_tests {
    use crate::error::GridError;
    use crate::field::{FnField, RealCursor, RealField};
    use crate::grid::{DiscreteField, GridAccess, TransformedGrid};
    use crate::interval::{Interval, RealInterval};
    use crate::position::{Localizable, Positionable};
    use crate::raster::{rasterize_parallel, RenderOptions};
    use crate::transform::{
        AffineTransform, BoundedTransform, Identity, RealTransform, Scale, Translation,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    // --- Instrumented stubs ---

    /// Translation that counts how often it is applied. The counter is
    /// shared by all clones so tests can observe every copy.
    #[derive(Clone)]
    struct CountingTransform {
        inner: Translation,
        applies: Arc<AtomicUsize>,
    }

    impl CountingTransform {
        fn new(offset: &[f64]) -> Self {
            CountingTransform {
                inner: Translation::new(offset),
                applies: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl RealTransform for CountingTransform {
        fn num_source_dimensions(&self) -> usize {
            self.inner.num_source_dimensions()
        }

        fn num_target_dimensions(&self) -> usize {
            self.inner.num_target_dimensions()
        }

        fn apply(&self, source: &[f64], target: &mut [f64]) {
            self.applies.fetch_add(1, Ordering::SeqCst);
            self.inner.apply(source, target);
        }
    }

    impl BoundedTransform for CountingTransform {
        fn estimate_bounds(&self, interval: &RealInterval) -> RealInterval {
            self.inner.estimate_bounds(interval)
        }
    }

    /// `x + y` field that counts reads and records bounds hints.
    struct CountingField {
        reads: Arc<AtomicUsize>,
        hints: Arc<Mutex<Vec<RealInterval>>>,
    }

    impl CountingField {
        fn new() -> Self {
            CountingField {
                reads: Arc::new(AtomicUsize::new(0)),
                hints: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[derive(Clone)]
    struct CountingCursor {
        reads: Arc<AtomicUsize>,
        position: Vec<f64>,
    }

    impl RealCursor for CountingCursor {
        type Value = f64;

        fn num_dimensions(&self) -> usize {
            self.position.len()
        }

        fn position(&self) -> &[f64] {
            &self.position
        }

        fn position_mut(&mut self) -> &mut [f64] {
            &mut self.position
        }

        fn get(&mut self) -> f64 {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.position.iter().sum()
        }
    }

    impl RealField for CountingField {
        type Value = f64;
        type Cursor = CountingCursor;

        fn num_dimensions(&self) -> usize {
            2
        }

        fn real_cursor(&self) -> CountingCursor {
            CountingCursor {
                reads: Arc::clone(&self.reads),
                position: vec![0.0; 2],
            }
        }

        fn real_cursor_within(&self, bounds: &RealInterval) -> CountingCursor {
            self.hints.lock().unwrap().push(bounds.clone());
            self.real_cursor()
        }
    }

    fn sum_field() -> FnField<impl Fn(&[f64]) -> f64> {
        FnField::new(2, |p: &[f64]| p[0] + p[1])
    }

    // --- Scenarios ---

    #[test_log::test]
    fn test_identity_scenario() {
        let grid = TransformedGrid::new(sum_field(), Identity::new(2));
        let mut c = grid.cursor();
        c.set_position(&[3, 4]);
        assert_eq!(c.get(), 7.0);

        c.move_by_all(&[1, 0]);
        assert_eq!(c.get_long_position(0), 4);
        assert_eq!(c.get(), 8.0);
    }

    #[test_log::test]
    fn test_translation_scenario() {
        let grid = TransformedGrid::new(sum_field(), Translation::new(&[10.0, 0.0]));
        let mut c = grid.cursor();
        assert_eq!(c.get(), 10.0);
        assert_eq!(c.source_position(), &[10.0, 0.0]);
    }

    // --- Laziness ---

    #[test_log::test]
    fn test_moves_never_touch_transform_or_source() {
        let transform = CountingTransform::new(&[0.5, 0.5]);
        let applies = Arc::clone(&transform.applies);
        let field = CountingField::new();
        let reads = Arc::clone(&field.reads);
        let grid = TransformedGrid::new(field, transform);

        let mut c = grid.cursor();
        for _ in 0..100 {
            c.fwd(0);
            c.bck(1);
            c.move_by(3, 1);
            c.set_position_at(7, 0);
        }
        c.set_position(&[1, 2]);
        c.move_by_all(&[-1, -1]);
        assert_eq!(applies.load(Ordering::SeqCst), 0);
        assert_eq!(reads.load(Ordering::SeqCst), 0);

        assert_eq!(c.get(), 2.0);
        assert_eq!(applies.load(Ordering::SeqCst), 1);
        assert_eq!(reads.load(Ordering::SeqCst), 1);
    }

    #[test_log::test]
    fn test_repeated_get_recomputes_and_is_idempotent() {
        let transform = CountingTransform::new(&[1.0, 1.0]);
        let applies = Arc::clone(&transform.applies);
        let grid = TransformedGrid::new(CountingField::new(), transform);

        let mut c = grid.cursor();
        c.set_position(&[2, 5]);
        let first = c.get();
        let second = c.get();
        assert_eq!(first, second);
        assert_eq!(first, 9.0);
        assert_eq!(applies.load(Ordering::SeqCst), 2, "no caching of the last value");
    }

    // --- Independence ---

    #[test_log::test]
    fn test_copy_is_independent() {
        let grid = TransformedGrid::new(sum_field(), Identity::new(2));
        let mut c = grid.cursor();
        c.set_position(&[1, 1]);
        let mut c2 = c.copy();

        c.set_position(&[100, 100]);
        assert_eq!(c.get(), 200.0);
        assert_eq!(c2.get(), 2.0);
        assert_eq!(c2.get_long_position(0), 1);

        c2.move_by(5, 1);
        assert_eq!(c2.get(), 7.0);
        assert_eq!(c.get(), 200.0);
        assert_eq!(c.source_position(), &[100.0, 100.0]);
    }

    #[test_log::test]
    fn test_transform_mutation_only_affects_later_cursors() {
        let mut grid = TransformedGrid::new(sum_field(), AffineTransform::identity(2));
        let mut before = grid.cursor();

        grid.transform_mut().set(0, 2, 10.0);
        let mut after = grid.cursor();

        before.set_position(&[1, 1]);
        after.set_position(&[1, 1]);
        assert_eq!(before.get(), 2.0);
        assert_eq!(after.get(), 12.0);

        // A copy of the old cursor keeps the old transform too.
        let mut before_copy = before.copy();
        assert_eq!(before_copy.get(), 2.0);
        assert_eq!(before_copy.transform().get(0, 2), 0.0);
    }

    #[test_log::test]
    fn test_set_transform_isolation_and_check() {
        let mut grid = TransformedGrid::new(sum_field(), Translation::new(&[0.0, 0.0]));
        let mut old = grid.cursor();
        grid.set_transform(Translation::new(&[0.0, 3.0])).unwrap();
        let mut new = grid.cursor();
        assert_eq!(old.get(), 0.0);
        assert_eq!(new.get(), 3.0);

        let err = grid.set_transform(Translation::new(&[1.0])).unwrap_err();
        assert_eq!(
            err,
            GridError::DimensionMismatch {
                transform_target: 1,
                source_dims: 2
            }
        );
        assert_eq!(grid.transform().offset(), &[0.0, 3.0]);
    }

    // --- Dimensionality ---

    #[test_log::test]
    fn test_cursor_dimensionality_follows_transform() {
        // 3D grid projected onto a 2D field.
        let projection = AffineTransform::from_rows(&[
            vec![1.0, 0.0, 0.0, 0.0],
            vec![0.0, 1.0, 1.0, 0.0],
        ]);
        let grid = TransformedGrid::new(sum_field(), projection);
        assert_eq!(grid.num_dimensions(), 3);
        assert_eq!(grid.num_source_dimensions(), 2);

        let mut c = grid.cursor();
        assert_eq!(c.num_dimensions(), 3);
        c.set_position(&[1, 2, 3]);
        assert_eq!(c.get(), 6.0);
        assert_eq!(c.source_position().len(), 2);
    }

    #[test_log::test]
    fn test_dimension_mismatch_is_rejected() {
        let result = TransformedGrid::try_new(sum_field(), Identity::new(3));
        assert!(matches!(
            result,
            Err(GridError::DimensionMismatch {
                transform_target: 3,
                source_dims: 2
            })
        ));
    }

    #[test_log::test]
    #[should_panic(expected = "transform produces 1-dimensional positions but the source is 2-dimensional")]
    fn test_new_panics_on_mismatch() {
        TransformedGrid::new(sum_field(), Translation::new(&[1.0]));
    }

    // --- Bounds ---

    #[test_log::test]
    fn test_unbounded_grid_ignores_interval() {
        let field = CountingField::new();
        let hints = Arc::clone(&field.hints);
        let grid = TransformedGrid::new(field, CountingTransform::new(&[1.0, 0.0]));
        assert!(!grid.is_bounded());

        let mut c = grid.cursor_in(&Interval::new(&[0, 0], &[4, 4]));
        assert!(c.source_bounds().is_none());
        assert!(hints.lock().unwrap().is_empty());
        c.set_position(&[2, 2]);
        assert_eq!(c.get(), 5.0);
    }

    #[test_log::test]
    fn test_bounded_grid_forwards_estimate() {
        let field = CountingField::new();
        let hints = Arc::clone(&field.hints);
        let grid = TransformedGrid::bounded(field, CountingTransform::new(&[10.0, -1.0]));
        assert!(grid.is_bounded());

        let interval = Interval::new(&[0, 0], &[3, 2]);
        let mut bounded = grid.cursor_in(&interval);
        let expected = RealInterval::new(&[10.0, -1.0], &[13.0, 1.0]);
        assert_eq!(bounded.source_bounds(), Some(&expected));
        assert_eq!(hints.lock().unwrap().as_slice(), &[expected.clone()]);

        // Same values as a plain cursor.
        let mut plain = grid.cursor();
        for position in interval.positions() {
            bounded.set_position(&position);
            plain.set_position(&position);
            assert_eq!(bounded.get(), plain.get());
        }

        // Copies carry the estimate along.
        assert_eq!(bounded.copy().source_bounds(), Some(&expected));
    }

    #[test_log::test]
    fn test_bounded_grid_survives_infinite_scale() {
        // 0 * inf has no finite image; the estimate must widen, not panic.
        let field = FnField::new(1, |p: &[f64]| p[0]);
        let bounded = TransformedGrid::bounded(&field, Scale::new(&[f64::INFINITY]));
        let plain = TransformedGrid::new(&field, Scale::new(&[f64::INFINITY]));
        let origin = Interval::new(&[0], &[0]);

        let mut c = bounded.cursor_in(&origin);
        let unbounded = RealInterval::new(&[f64::NEG_INFINITY], &[f64::INFINITY]);
        assert_eq!(c.source_bounds(), Some(&unbounded));
        assert!(c.get().is_nan());
        assert!(plain.cursor_in(&origin).get().is_nan());

        // Single-slab stripes hit the same path in every worker.
        let out = rasterize_parallel(&bounded, &Interval::new(&[0], &[3]), RenderOptions::with_threads(4));
        assert!(out[0].is_nan());
        assert_eq!(&out[1..], &[f64::INFINITY; 3]);
    }

    #[test_log::test]
    fn test_discrete_field_trait_dispatch() {
        fn first_value<G: DiscreteField>(grid: &G, interval: &Interval) -> G::Value {
            let mut c = grid.cursor_in(interval);
            c.set_position(interval.min());
            GridAccess::get(&mut c)
        }

        let grid = TransformedGrid::bounded(sum_field(), AffineTransform::translation(&[1.0, 1.0]));
        assert_eq!(first_value(&grid, &Interval::new(&[2, 3], &[4, 4])), 7.0);
        assert_eq!(DiscreteField::num_dimensions(&grid), 2);
    }

    // --- In-place dimensionality changes ---

    /// Identity-like transform whose target dimensionality can be changed in
    /// place, which `transform_mut` cannot prevent.
    #[derive(Clone)]
    struct Reshapable {
        source: usize,
        target: usize,
    }

    impl RealTransform for Reshapable {
        fn num_source_dimensions(&self) -> usize {
            self.source
        }

        fn num_target_dimensions(&self) -> usize {
            self.target
        }

        fn apply(&self, source: &[f64], target: &mut [f64]) {
            for (t, s) in target.iter_mut().zip(source) {
                *t = *s;
            }
        }
    }

    #[cfg(debug_assertions)]
    #[test_log::test]
    #[should_panic(expected = "transform was changed in place to a different target dimensionality")]
    fn test_in_place_dimensionality_change_is_caught() {
        let mut grid = TransformedGrid::new(sum_field(), Reshapable { source: 2, target: 2 });
        let _ = grid.cursor();
        grid.transform_mut().target = 1;
        let _ = grid.cursor();
    }
}
