//! Criterion benchmarks for u-timetable.
//!
//! Uses a synthetic evening cohort (twelve subjects, six teachers) to
//! measure scoring cost per genome and short end-to-end runs per
//! representation.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use u_timetable::catalog::{Catalog, Cohort, Day, Room, Slot, Subject, Teacher};
use u_timetable::demand::LessonDemand;
use u_timetable::ga::{create_rng, GaConfig, GaProblem};
use u_timetable::scoring::{PenaltyPolicy, RewardPolicy, ScoringPolicy};
use u_timetable::timetable::{schedule, Representation, ScheduleConfig, TimetableProblem};

// ===========================================================================
// Fixture
// ===========================================================================

fn catalog() -> Catalog {
    let lessons = [2u32, 1, 2, 1, 2, 1, 2, 1, 2, 2, 1, 2];
    let subjects: Vec<Subject> = lessons
        .iter()
        .enumerate()
        .map(|(i, &n)| Subject::new(format!("S{i:02}"), format!("Subject {i}"), n, "EV1"))
        .collect();

    let teachers: Vec<Teacher> = (0..6)
        .map(|t| {
            let mut teacher = Teacher::new(format!("T{t}"), format!("Teacher {t}"))
                .with_subject(format!("S{:02}", 2 * t))
                .with_subject(format!("S{:02}", 2 * t + 1));
            if t % 2 == 0 {
                teacher = teacher.with_availability(
                    Day::ALL
                        .into_iter()
                        .skip(t % 3)
                        .flat_map(|d| Slot::ALL.map(|s| (d, s))),
                );
            }
            teacher
        })
        .collect();

    Catalog::new(
        subjects,
        teachers,
        vec![Room::new("R1", 30), Room::new("R2", 45)],
        vec![Cohort::new("EV1", 38, "evening")],
    )
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_scoring(c: &mut Criterion) {
    let mut group = c.benchmark_group("scoring");
    let cat = catalog();

    for representation in [Representation::List, Representation::Grid] {
        let config = ScheduleConfig::default().with_representation(representation);
        let problem = TimetableProblem::new(&cat, LessonDemand::build(&cat), &config);
        let mut rng = create_rng(42);
        let genome = problem.random_genome(&mut rng);
        let ctx = problem.context();

        group.bench_with_input(
            BenchmarkId::new("penalty", format!("{representation:?}")),
            &genome,
            |b, g| b.iter(|| PenaltyPolicy::default().score(black_box(g), &ctx)),
        );
        group.bench_with_input(
            BenchmarkId::new("reward", format!("{representation:?}")),
            &genome,
            |b, g| b.iter(|| RewardPolicy::default().score(black_box(g), &ctx)),
        );
    }
    group.finish();
}

fn bench_variation(c: &mut Criterion) {
    let mut group = c.benchmark_group("variation");
    let cat = catalog();

    for representation in [Representation::List, Representation::Grid] {
        let config = ScheduleConfig::default().with_representation(representation);
        let problem = TimetableProblem::new(&cat, LessonDemand::build(&cat), &config);
        let mut rng = create_rng(7);
        let p1 = problem.create_individual(&mut rng);
        let p2 = problem.create_individual(&mut rng);

        group.bench_function(format!("crossover_mutate_{representation:?}"), |b| {
            b.iter(|| {
                let (mut c1, _) = problem.crossover(black_box(&p1), black_box(&p2), &mut rng);
                problem.mutate(&mut c1, 0.15, &mut rng);
                black_box(c1)
            })
        });
    }
    group.finish();
}

fn bench_schedule(c: &mut Criterion) {
    let mut group = c.benchmark_group("schedule");
    group.sample_size(10);
    let cat = catalog();

    for (representation, pop, gen) in [
        (Representation::List, 30usize, 50usize),
        (Representation::Grid, 30, 50),
        (Representation::Grid, 60, 100),
    ] {
        let config = ScheduleConfig::default()
            .with_representation(representation)
            .with_ga(GaConfig {
                population_size: pop,
                max_generations: gen,
                stagnation_limit: 0,
                seed: Some(42),
                ..GaConfig::default()
            });
        group.bench_with_input(
            BenchmarkId::new(format!("{representation:?}_p{pop}_g{gen}"), pop),
            &config,
            |b, config| {
                b.iter(|| {
                    let outcome = schedule(black_box(&cat), black_box(config));
                    black_box(outcome)
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_scoring, bench_variation, bench_schedule);
criterion_main!(benches);
