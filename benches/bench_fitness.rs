use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rayon::prelude::*;

use sudoku_genalg::{
    caching::CachedChallenge, individual::initialize, Challenge, FitnessMethod, Individual, Puzzle,
    RandomNumberGenerator,
};

fn evaluate_sequential(population: &[Individual], challenge: &dyn Challenge) -> Vec<f64> {
    population.iter().map(|ind| challenge.score(ind.grid())).collect()
}

fn evaluate_parallel(population: &[Individual], challenge: &dyn Challenge) -> Vec<f64> {
    population.par_iter().map(|ind| challenge.score(ind.grid())).collect()
}

fn bench_fitness_methods(c: &mut Criterion) {
    let puzzle = Puzzle::reference();
    let mut rng = RandomNumberGenerator::from_seed(1);
    let individual = Individual::random(&puzzle, &mut rng);

    let mut group = c.benchmark_group("fitness_single");
    for method in [FitnessMethod::Simple, FitnessMethod::Weighted] {
        group.bench_function(method.to_string(), |b| {
            b.iter(|| method.score(black_box(individual.grid())))
        });
    }
    group.finish();
}

fn bench_population_scoring(c: &mut Criterion) {
    let puzzle = Puzzle::reference();
    let mut rng = RandomNumberGenerator::from_seed(2);
    let challenge = FitnessMethod::Weighted;

    let mut group = c.benchmark_group("fitness_population");
    for size in [100, 1000, 10000].iter() {
        let population = match initialize(&puzzle, *size, &mut rng) {
            Ok(population) => population,
            Err(e) => panic!("failed to build population: {}", e),
        };

        group.bench_with_input(BenchmarkId::new("sequential", size), &population, |b, population| {
            b.iter(|| evaluate_sequential(black_box(population), &challenge))
        });

        group.bench_with_input(BenchmarkId::new("parallel", size), &population, |b, population| {
            b.iter(|| evaluate_parallel(black_box(population), &challenge))
        });

        let cached = CachedChallenge::new(challenge);
        evaluate_sequential(&population, &cached);
        group.bench_with_input(BenchmarkId::new("cached", size), &population, |b, population| {
            b.iter(|| evaluate_sequential(black_box(population), &cached))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_fitness_methods, bench_population_scoring);
criterion_main!(benches);
