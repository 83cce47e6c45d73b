use evorun::{
    chromosome::{Bounds, RealVector},
    evolution::{
        run_collection, Engine, EngineKind, JayaEngine, Representation, RunConfig, RunTracker,
    },
    fitness::{evaluate_all, Direction, SumOfSquares},
    rng::RandomStream,
};

fn bounds() -> Bounds {
    Bounds::new(-1.0, 5.0).unwrap()
}

#[test]
fn test_jaya_converges_towards_zero() {
    let config = RunConfig::builder()
        .engine(EngineKind::Jaya)
        .population_size(20)
        .num_generations(100)
        .seeds(vec![5, 6, 7])
        .build()
        .unwrap();

    let result = run_collection(&config).unwrap();
    assert_eq!(result.runs.len(), 3);
    assert!(result.global_best.score.value < 0.5);

    for run in &result.runs {
        for pair in run.improvements.windows(2) {
            assert!(pair[1].score.value < pair[0].score.value);
        }
        let genes = run.best.chromosome.as_real().unwrap().genes();
        assert!(genes.iter().all(|&g| bounds().contains(g)));
    }
}

#[test]
fn test_jaya_generation_averages_never_increase() {
    let engine = JayaEngine::new(Box::new(SumOfSquares), bounds(), Direction::Minimize);
    let tracker = RunTracker::new(&engine, 12, 15, 30, 1);
    let result = tracker
        .run(|rng| RealVector::random(3, bounds(), rng))
        .unwrap();

    assert_eq!(result.snapshots.len(), 31);
    for pair in result.snapshots.windows(2) {
        assert!(pair[1].average <= pair[0].average + 1e-12);
        assert!(pair[1].low <= pair[0].low);
    }
}

#[test]
fn test_jaya_maximize_pushes_to_bounds() {
    let engine = JayaEngine::new(Box::new(SumOfSquares), bounds(), Direction::Maximize);
    let mut rng = RandomStream::from_seed(31);
    let mut generation: Vec<RealVector> = (0..15)
        .map(|_| RealVector::random(2, bounds(), &mut rng))
        .collect();

    let first = evaluate_all(engine.evaluator(), &generation).unwrap();
    for _ in 0..50 {
        let scores = evaluate_all(engine.evaluator(), &generation).unwrap();
        engine.step(&mut generation, &scores, &mut rng).unwrap();
    }
    let last = evaluate_all(engine.evaluator(), &generation).unwrap();

    for (before, after) in first.iter().zip(&last) {
        assert!(after.value >= before.value);
    }
}

#[test]
fn test_jaya_rejects_packed_chromosomes() {
    let config = RunConfig::builder()
        .engine(EngineKind::Jaya)
        .representation(Representation::PackedBits {
            bit_lengths: vec![4, 4],
        })
        .build();
    assert!(config.is_err());
}
