use strum::IntoEnumIterator;

use sudoku_genalg::{
    evolution::options::parse_strategy,
    individual::initialize,
    selection::TournamentSelection,
    solve, CacheType, ConflictScope, CrossoverMethod, EvolutionLauncher, EvolutionOptions,
    EvolutionState, FitnessMethod, GeneticError, LogLevel, MutationMethod, Puzzle,
    RandomNumberGenerator, SelectionMethod,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn reference_options() -> EvolutionOptions {
    EvolutionOptions::builder()
        .population_size(50)
        .max_generations(200)
        .crossover_probability(0.9)
        .mutation_probability(0.3)
        .elitism_fraction(0.1)
        .crossover_method(CrossoverMethod::RowWise)
        .mutation_method(MutationMethod::Swap)
        .fitness_method(FitnessMethod::Simple)
        .build()
}

#[test]
fn test_reference_run_terminates_with_valid_grid() {
    init_tracing();
    let puzzle = Puzzle::reference();
    let mut rng = RandomNumberGenerator::from_seed(42);
    let result = solve(&puzzle, &reference_options(), &mut rng).unwrap();

    assert!(result.individual.is_consistent_with(&puzzle));
    assert!(result.generations <= 200);
    match result.state {
        EvolutionState::Converged => {
            assert_eq!(result.score, 0.0);
            assert!(result.individual.grid().is_solved());
        }
        EvolutionState::Exhausted => {
            assert_eq!(result.generations, 200);
            assert!(result.score > 0.0);
        }
        EvolutionState::Running => panic!("a finished run cannot be running"),
    }
}

#[test]
fn test_every_strategy_combination_runs() {
    let puzzle = Puzzle::reference();
    for selection in SelectionMethod::iter() {
        for crossover in CrossoverMethod::iter() {
            for mutation in MutationMethod::iter() {
                let options = EvolutionOptions::builder()
                    .population_size(16)
                    .max_generations(3)
                    .selection_method(selection)
                    .crossover_method(crossover)
                    .mutation_method(mutation)
                    .fitness_method(FitnessMethod::Weighted)
                    .build();
                let mut rng = RandomNumberGenerator::from_seed(3);
                let result = solve(&puzzle, &options, &mut rng).unwrap();
                assert!(
                    result.individual.is_consistent_with(&puzzle),
                    "{}/{}/{} broke an invariant",
                    selection,
                    crossover,
                    mutation
                );
            }
        }
    }
}

#[test]
fn test_elites_survive_unchanged() {
    let options = EvolutionOptions::builder()
        .population_size(30)
        .elitism_fraction(0.2)
        .mutation_probability(1.0)
        .mutation_method(MutationMethod::Regeneration)
        .build();
    let launcher = EvolutionLauncher::new(options.clone()).unwrap();
    let puzzle = Puzzle::reference();
    let mut rng = RandomNumberGenerator::from_seed(17);

    let population = initialize(&puzzle, 30, &mut rng).unwrap();
    let (ranked, scores) = launcher.evaluate(population).unwrap();
    let elites = options.elite_count();
    assert_eq!(elites, 6);

    let next = launcher
        .next_generation(&ranked, &scores, puzzle.fixed_mask(), &mut rng)
        .unwrap();
    assert_eq!(next.len(), 30);
    for elite in &ranked[..elites] {
        assert!(next.contains(elite));
    }
}

#[test]
fn test_tournament_winner_is_best_sampled() {
    let lookup: Vec<f64> = (0..40).map(|i| ((i * 37) % 41) as f64).collect();
    let selection = TournamentSelection::new(4).unwrap();
    let mut rng = RandomNumberGenerator::from_seed(10_000);

    for _ in 0..10_000 {
        let contest = selection.contest(&lookup, &mut rng).unwrap();
        let winner = lookup[contest.winner];
        for &idx in &contest.participants {
            assert!(winner <= lookup[idx]);
        }
    }
}

#[test]
fn test_parallel_and_sequential_runs_match() {
    let puzzle = Puzzle::reference();
    let build = |threshold: usize| {
        EvolutionOptions::builder()
            .population_size(40)
            .max_generations(15)
            .crossover_method(CrossoverMethod::Pmx)
            .parallel_threshold(threshold)
            .build()
    };

    let sequential = solve(
        &puzzle,
        &build(usize::MAX),
        &mut RandomNumberGenerator::from_seed(8),
    )
    .unwrap();
    let parallel = solve(&puzzle, &build(1), &mut RandomNumberGenerator::from_seed(8)).unwrap();
    assert_eq!(sequential, parallel);
}

#[test]
fn test_caching_does_not_change_result() {
    let puzzle = Puzzle::reference();
    let base = EvolutionOptions::builder()
        .population_size(30)
        .max_generations(10)
        .fitness_method(FitnessMethod::Weighted)
        .build();
    let plain = solve(&puzzle, &base, &mut RandomNumberGenerator::from_seed(4)).unwrap();

    for cache_type in [CacheType::Global, CacheType::ThreadLocal] {
        let mut options = base.clone();
        options.set_cache_type(Some(cache_type));
        let cached = solve(&puzzle, &options, &mut RandomNumberGenerator::from_seed(4)).unwrap();
        assert_eq!(plain, cached, "{} cache changed the run", cache_type);
    }
}

#[test]
fn test_verbose_logging_run() {
    init_tracing();
    let options = EvolutionOptions::builder()
        .population_size(10)
        .max_generations(2)
        .log_level(LogLevel::Verbose)
        .build();
    let mut rng = RandomNumberGenerator::from_seed(1);
    let result = solve(&Puzzle::reference(), &options, &mut rng).unwrap();
    assert!(result.individual.is_consistent_with(&Puzzle::reference()));
}

#[test]
fn test_conflict_scope_reported_mask() {
    let puzzle = Puzzle::reference();
    let mut options = EvolutionOptions::builder()
        .population_size(10)
        .max_generations(1)
        .build();
    let narrow = solve(&puzzle, &options, &mut RandomNumberGenerator::from_seed(2)).unwrap();
    options.set_conflict_scope(ConflictScope::WithBoxes);
    let wide = solve(&puzzle, &options, &mut RandomNumberGenerator::from_seed(2)).unwrap();

    assert_eq!(narrow.individual, wide.individual);
    assert_eq!(narrow.conflicts, sudoku_genalg::validate(narrow.individual.grid()));
    assert_eq!(
        wide.conflicts,
        sudoku_genalg::validate_with_boxes(wide.individual.grid())
    );
    assert!(wide.conflicts.count() >= narrow.conflicts.count());
}

#[test]
fn test_invalid_configuration_rejected_before_run() {
    let puzzle = Puzzle::reference();
    let mut rng = RandomNumberGenerator::from_seed(0);
    let cases = [
        EvolutionOptions::builder().population_size(0).build(),
        EvolutionOptions::builder().crossover_probability(1.2).build(),
        EvolutionOptions::builder().mutation_probability(f64::NAN).build(),
        EvolutionOptions::builder().elitism_fraction(-0.5).build(),
    ];
    for options in cases {
        assert!(matches!(
            solve(&puzzle, &options, &mut rng),
            Err(GeneticError::Configuration(_))
        ));
    }
}

#[test]
fn test_unknown_strategy_names_are_errors() {
    assert!(matches!(
        parse_strategy::<CrossoverMethod>("crossover", "uniform"),
        Err(GeneticError::UnsupportedStrategy { kind: "crossover", .. })
    ));
    assert!(matches!(
        parse_strategy::<FitnessMethod>("fitness", ""),
        Err(GeneticError::UnsupportedStrategy { .. })
    ));
    assert_eq!(
        parse_strategy::<SelectionMethod>("selection", "Roulette").unwrap(),
        SelectionMethod::Roulette
    );
}

#[test]
fn test_invalid_puzzle_rejected_at_boundary() {
    let text = "11.......\n".to_string() + &".........\n".repeat(8);
    assert!(matches!(
        text.parse::<Puzzle>(),
        Err(GeneticError::InvalidPuzzle(_))
    ));
    assert!(matches!(
        "123".parse::<Puzzle>(),
        Err(GeneticError::InvalidPuzzle(_))
    ));
}

#[cfg(feature = "serde")]
#[test]
fn test_options_and_result_serialize() {
    let options = reference_options();
    let json = serde_json::to_string(&options).unwrap();
    let back: EvolutionOptions = serde_json::from_str(&json).unwrap();
    assert_eq!(options, back);

    let small = EvolutionOptions::builder()
        .population_size(10)
        .max_generations(1)
        .build();
    let mut rng = RandomNumberGenerator::from_seed(6);
    let result = solve(&Puzzle::reference(), &small, &mut rng).unwrap();
    let json = serde_json::to_string(&result).unwrap();
    let back: sudoku_genalg::EvolutionResult = serde_json::from_str(&json).unwrap();
    assert_eq!(result, back);
}

#[cfg(feature = "serde")]
#[test]
fn test_puzzle_deserialization_validates_clues() {
    let puzzle = Puzzle::reference();
    let json = serde_json::to_string(&puzzle).unwrap();
    let back: Puzzle = serde_json::from_str(&json).unwrap();
    assert_eq!(back, puzzle);
    assert_eq!(back.fixed_mask().clue_count(), 30);

    let mut rows: Vec<Vec<u8>> = serde_json::from_str(&json).unwrap();
    rows[0][0] = 12;
    let out_of_range = serde_json::to_string(&rows).unwrap();
    assert!(serde_json::from_str::<Puzzle>(&out_of_range).is_err());

    // 6 is already a clue at (0, 1)
    rows[0][0] = 6;
    let duplicate = serde_json::to_string(&rows).unwrap();
    assert!(serde_json::from_str::<Puzzle>(&duplicate).is_err());

    assert!(serde_json::from_str::<Puzzle>("[[1, 2, 3]]").is_err());
}
