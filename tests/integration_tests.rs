//! Integration tests for de-nesting.

use de_nesting::{
    overlaps, DeConfig, DeProgress, DeRunner, Error, Layout, LayoutRenderer, NoopRenderer, Piece,
    Sheet,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::RefCell;

mod predicate_tests {
    use super::*;
    use de_nesting::in_bounds;

    #[test]
    fn test_close_circles_overlap() {
        // Centers 4 apart with radii 5 + 5.
        let a = Piece::circle("a", 5.0).with_position(5.0, 10.0);
        let b = Piece::circle("b", 5.0).with_position(9.0, 10.0);
        assert!(overlaps(&a, &b));
    }

    // Known gap, pinned: a rectangle and a circle that geometrically
    // intersect are not reported as overlapping.
    #[test]
    fn test_rect_circle_pair_reports_no_overlap() {
        let rect = Piece::rectangle("r", 20.0, 20.0).with_position(0.0, 0.0);
        let circle = Piece::circle("c", 5.0).with_position(10.0, 10.0);
        assert!(!overlaps(&rect, &circle));
    }

    #[test]
    fn test_bounds_follow_piece_extents() {
        let sheet = Sheet::new(50.0, 50.0);
        assert!(in_bounds(
            &Piece::rectangle("r", 10.0, 10.0).with_position(40.0, 40.0),
            &sheet
        ));
        assert!(!in_bounds(
            &Piece::circle("c", 10.0).with_position(45.0, 25.0),
            &sheet
        ));
    }
}

mod solver_tests {
    use super::*;

    fn small_catalog() -> Vec<Piece> {
        vec![
            Piece::rectangle("a", 20.0, 30.0).with_rotation_tracking(),
            Piece::rectangle("b", 40.0, 10.0),
            Piece::circle("c", 8.0),
        ]
    }

    #[test]
    fn test_returned_layout_is_feasible() {
        let sheet = Sheet::new(100.0, 100.0);
        let config = DeConfig::new()
            .with_population_size(16)
            .with_max_generations(25);
        let runner = DeRunner::new(config, sheet, small_catalog());

        let result = runner
            .run_with_rng(&mut StdRng::seed_from_u64(11))
            .expect("feasible instance must solve");

        let best = &result.best;
        assert!(best.is_feasible(&sheet));
        assert_eq!(best.len(), 3);

        // Pairwise non-overlap in stored order and bounds for every piece.
        let pieces = best.pieces();
        for (i, piece) in pieces.iter().enumerate() {
            assert!(de_nesting::in_bounds(piece, &sheet));
            for earlier in &pieces[..i] {
                assert!(!overlaps(piece, earlier));
            }
        }
    }

    #[test]
    fn test_catalog_order_and_kinds_are_preserved() {
        let sheet = Sheet::new(100.0, 100.0);
        let catalog = small_catalog();
        let runner = DeRunner::new(
            DeConfig::new()
                .with_population_size(8)
                .with_max_generations(10),
            sheet,
            catalog.clone(),
        );

        let result = runner
            .run_with_rng(&mut StdRng::seed_from_u64(12))
            .expect("feasible instance must solve");

        for (placed, template) in result.best.pieces().iter().zip(&catalog) {
            assert_eq!(placed.id, template.id);
            assert_eq!(placed.kind, template.kind);
            assert_eq!(placed.tracks_rotation(), template.tracks_rotation());
        }
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let sheet = Sheet::new(100.0, 100.0);
        let make_runner = || {
            DeRunner::new(
                DeConfig::new()
                    .with_population_size(10)
                    .with_max_generations(15),
                sheet,
                small_catalog(),
            )
        };

        let first = make_runner()
            .run_with_rng(&mut StdRng::seed_from_u64(99))
            .unwrap();
        let second = make_runner()
            .run_with_rng(&mut StdRng::seed_from_u64(99))
            .unwrap();

        assert_eq!(first.best, second.best);
        assert_eq!(first.history, second.history);
    }

    #[test]
    fn test_best_fitness_never_decreases() {
        let sheet = Sheet::new(80.0, 60.0);
        let runner = DeRunner::new(
            DeConfig::new()
                .with_population_size(12)
                .with_max_generations(50),
            sheet,
            vec![
                Piece::rectangle("a", 25.0, 25.0),
                Piece::rectangle("b", 30.0, 15.0).with_rotation_tracking(),
                Piece::circle("c", 10.0),
                Piece::circle("d", 6.0),
            ],
        );

        let result = runner
            .run_with_rng(&mut StdRng::seed_from_u64(13))
            .expect("feasible instance must solve");

        for window in result.history.windows(2) {
            assert!(window[1] >= window[0]);
        }
    }

    #[test]
    fn test_oversized_piece_fails_before_search() {
        let runner = DeRunner::new(
            DeConfig::default(),
            Sheet::new(10.0, 10.0),
            vec![Piece::rectangle("big", 20.0, 10.0)],
        );
        assert!(matches!(runner.run(), Err(Error::PieceTooLarge { .. })));
    }

    #[test]
    fn test_dense_catalog_fails_instead_of_hanging() {
        // Individually placeable circles that can never coexist.
        let runner = DeRunner::new(
            DeConfig::new().with_max_restarts(50),
            Sheet::new(10.0, 10.0),
            vec![Piece::circle("c1", 5.0), Piece::circle("c2", 5.0)],
        );
        assert!(matches!(
            runner.run_with_rng(&mut StdRng::seed_from_u64(14)),
            Err(Error::InfeasiblePopulation { attempts: 50 })
        ));
    }

    #[test]
    fn test_cancellation_stops_the_loop() {
        let sheet = Sheet::new(100.0, 100.0);
        let runner = DeRunner::new(
            DeConfig::new()
                .with_population_size(8)
                .with_max_generations(1000),
            sheet,
            small_catalog(),
        );
        runner.cancel_handle().store(true, std::sync::atomic::Ordering::Relaxed);

        let result = runner
            .run_with_rng(&mut StdRng::seed_from_u64(15))
            .expect("initialization still succeeds");

        assert_eq!(result.generations, 0);
        assert!(result.history.is_empty());
        // The best from initialization is still feasible.
        assert!(result.best.is_feasible(&sheet));
    }

    #[test]
    fn test_progress_callback_reports_completion() {
        let sheet = Sheet::new(100.0, 100.0);
        let runner = DeRunner::new(
            DeConfig::new()
                .with_population_size(8)
                .with_max_generations(5),
            sheet,
            small_catalog(),
        );

        let snapshots: RefCell<Vec<DeProgress>> = RefCell::new(Vec::new());
        runner
            .run_with_rng_and_progress(&mut StdRng::seed_from_u64(16), Some(|p: DeProgress| {
                snapshots.borrow_mut().push(p);
            }))
            .expect("feasible instance must solve");

        let snapshots = snapshots.into_inner();
        // One snapshot per generation plus the final "not running" one.
        assert_eq!(snapshots.len(), 6);
        assert!(snapshots[..5].iter().all(|p| p.running));
        let last = snapshots.last().unwrap();
        assert!(!last.running);
        assert_eq!(last.generation, 5);
    }
}

mod renderer_tests {
    use super::*;

    struct RecordingRenderer {
        calls: RefCell<Vec<(String, usize)>>,
    }

    impl LayoutRenderer for RecordingRenderer {
        fn render(&self, layout: &Layout, title: &str) {
            self.calls
                .borrow_mut()
                .push((title.to_string(), layout.len()));
        }
    }

    #[test]
    fn test_solve_and_render_shows_initial_and_optimized() {
        let sheet = Sheet::new(100.0, 100.0);
        let runner = DeRunner::new(
            DeConfig::new()
                .with_population_size(8)
                .with_max_generations(5),
            sheet,
            vec![
                Piece::rectangle("a", 20.0, 20.0),
                Piece::circle("c", 10.0),
            ],
        );

        let renderer = RecordingRenderer {
            calls: RefCell::new(Vec::new()),
        };
        runner
            .solve_and_render(&renderer)
            .expect("feasible instance must solve");

        let calls = renderer.calls.into_inner();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], ("Initial layout".to_string(), 2));
        assert_eq!(calls[1], ("Optimized layout".to_string(), 2));
    }

    #[test]
    fn test_noop_renderer_is_tolerated() {
        let sheet = Sheet::new(100.0, 100.0);
        let runner = DeRunner::new(
            DeConfig::new()
                .with_population_size(8)
                .with_max_generations(3),
            sheet,
            vec![Piece::rectangle("a", 10.0, 10.0)],
        );
        assert!(runner.solve_and_render(&NoopRenderer).is_ok());
    }
}
