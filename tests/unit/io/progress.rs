//! Tests for progress tracking

#[cfg(test)]
mod tests {
    use ndarray::Array3;
    use patchwork::algorithm::assembly::{
        Assembler, AssemblyConfig, AssemblyObserver, CollageSink, StepReport, StopCondition, StopReason,
    };
    use patchwork::Result;
    use patchwork::algorithm::placement::PlacementPolicy;
    use patchwork::io::progress::ProgressManager;
    use patchwork::spatial::canvas::Canvas;
    use patchwork::spatial::patch::{Patch, PatchPool};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::path::Path;

    struct Discard;

    impl CollageSink<u8> for Discard {
        fn deliver(&mut self, _attempt: usize, _canvas: &Canvas<u8>) -> Result<()> {
            Ok(())
        }
    }

    // Tests the extraction bar lifecycle without drawing
    #[test]
    fn test_extraction_lifecycle() {
        let mut manager = ProgressManager::hidden();
        manager.start_extraction(2);
        manager.image_extracted(Path::new("one.jpg"), 7);
        manager.image_extracted(Path::new("two.png"), 9);
        manager.finish_extraction();
        manager.finish_extraction();
        manager.finish();
    }

    // Tests step events before and after an attempt is started
    #[test]
    fn test_steps_without_attempt_are_ignored() {
        let mut manager = ProgressManager::hidden();
        let canvas = Canvas::<u8>::new(4, 4);
        let report = StepReport {
            patch_index: 0,
            target: [1, 1],
            center: [1, 1],
            newly_covered: 6,
            remaining: 20,
        };

        manager.step_completed(&report, &canvas);
        manager.attempt_started(1, &canvas);
        manager.step_completed(&report, &canvas);
        AssemblyObserver::<u8>::attempt_completed(&mut manager, 1, 1);
        manager.attempt_started(2, &canvas);
        manager.finish();
    }

    // Tests the manager as the observer of a full run
    #[test]
    fn test_observes_assembly_run() {
        let patch = Patch::new(Array3::from_elem((3, 3, 4), 200_u8), 0).expect("opaque patch");
        let pool = PatchPool::new(vec![patch]);
        let config = AssemblyConfig {
            rows: 8,
            cols: 8,
            policy: PlacementPolicy::Anchored,
        };
        let mut assembler = Assembler::new(&pool, config, StdRng::seed_from_u64(5)).expect("non-empty pool");
        let mut manager = ProgressManager::hidden();

        let report = assembler.run(&StopCondition::unbounded().with_max_attempts(3), &mut Discard, &mut manager);
        manager.finish();

        assert_eq!(report.stop_reason, StopReason::AttemptLimit);
        assert_eq!(report.completed_attempts, 3);
    }
}
