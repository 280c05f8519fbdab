//! Cross-module scenarios.

use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::automaton::seeder::{CountRange, RadiusRange};
use crate::automaton::stepping::step_generation_serial;
use crate::automaton::{
    count_live_neighbors, seed_lattice, step_generation, valid_neighbors_of, Coord,
    DeadZoneSphere, Lattice, NeighborCache, Neighborhood, RuleSet, SchedulerState, Simulation,
};
use crate::config::{RunMode, SimulationConfig};

fn step(lattice: &mut Lattice, rule: &str) -> u64 {
    let rules: RuleSet = rule.parse().unwrap();
    let cache = NeighborCache::build(lattice.side(), Neighborhood::Moore);
    step_generation(lattice, &rules, &cache).unwrap()
}

fn noisy_lattice(side: i16, seed: u64) -> Lattice {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let alive: Vec<bool> = (0..(side as usize).pow(3)).map(|_| rng.gen_bool(0.5)).collect();
    let probe = Lattice::filled(side, false).unwrap();
    Lattice::initialize(side, |c| alive[probe.index_of(c)]).unwrap()
}

fn bounded_config(side: i16, generations: u32, seed: u64) -> SimulationConfig {
    SimulationConfig {
        side_length: side,
        run: RunMode::Bounded { generations },
        seed: Some(seed),
        dead_zone_count: CountRange { min: 2, max: 4 },
        dead_zone_radius: RadiusRange { min: 1.5, max: 3.5 },
        ..SimulationConfig::default()
    }
}

#[test]
fn test_solid_cube_keeps_only_center() {
    let mut lattice = Lattice::filled(3, true).unwrap();
    assert_eq!(step(&mut lattice, "26/"), 1);

    assert_eq!(lattice.alive_count(), 1);
    assert!(lattice.get(1, 1, 1).unwrap());
}

#[test]
fn test_lone_center_fills_cube() {
    let mut lattice = Lattice::initialize(3, |c| c == Coord::new(1, 1, 1)).unwrap();
    step(&mut lattice, "0/1");

    // Every neighbor sees exactly one live cell and the center sees none
    assert_eq!(lattice.alive_count(), 27);
}

#[test]
fn test_generation_reads_only_pre_commit_snapshot() {
    let rules: RuleSet = "2-5/3-4".parse().unwrap();
    let before = noisy_lattice(3, 77);

    let expected: Vec<bool> = before
        .coords()
        .map(|c| {
            let live = count_live_neighbors(&before, c, Neighborhood::Moore);
            rules.next_state(before.get(c.x, c.y, c.z).unwrap(), live)
        })
        .collect();

    let mut after = before.clone();
    let cache = NeighborCache::build(3, Neighborhood::Moore);
    step_generation(&mut after, &rules, &cache).unwrap();

    for (idx, c) in before.coords().enumerate() {
        assert_eq!(after.get(c.x, c.y, c.z).unwrap(), expected[idx], "cell {c:?}");
    }
}

#[test]
fn test_cached_and_serial_paths_agree_over_generations() {
    let rules = RuleSet::cavern();
    let cache = NeighborCache::build(9, Neighborhood::Moore);
    let mut fast = noisy_lattice(9, 3);
    let mut slow = fast.clone();

    for _ in 0..6 {
        step_generation(&mut fast, &rules, &cache).unwrap();
        step_generation_serial(&mut slow, &rules).unwrap();
        assert_eq!(fast.cells(), slow.cells());
    }
    assert_eq!(fast.generation(), 6);
}

#[test]
fn test_neighbor_counts_stay_in_lattice() {
    let lattice = noisy_lattice(5, 12);
    let solid = Lattice::filled(5, true).unwrap();

    for c in lattice.coords() {
        let live = count_live_neighbors(&lattice, c, Neighborhood::Moore);
        assert!(live <= 26);

        let valid = valid_neighbors_of(c, 5, Neighborhood::Moore);
        assert!(valid.iter().all(|n| lattice.in_bounds(n.x, n.y, n.z)));
        assert_eq!(
            count_live_neighbors(&solid, c, Neighborhood::Moore) as usize,
            valid.iter().count()
        );
    }

    assert_eq!(count_live_neighbors(&solid, Coord::new(0, 0, 0), Neighborhood::Moore), 7);
    assert_eq!(count_live_neighbors(&solid, Coord::new(2, 2, 2), Neighborhood::Moore), 26);
}

#[test]
fn test_dead_zone_boundary_is_inclusive() {
    let sphere = DeadZoneSphere {
        center: glam::Vec3::new(2.0, 2.0, 2.0),
        radius: 1.0,
    };
    let lattice = seed_lattice(5, &[sphere]).unwrap();

    assert!(!lattice.get(2, 2, 2).unwrap());
    assert!(!lattice.get(3, 2, 2).unwrap());
    assert!(!lattice.get(2, 1, 2).unwrap());
    // Diagonal is sqrt(2) away
    assert!(lattice.get(3, 3, 2).unwrap());
    assert_eq!(lattice.alive_count(), 125 - 7);
}

#[test]
fn test_same_seed_same_run() {
    let run = || {
        let mut sim = Simulation::new(bounded_config(14, 5, 99)).unwrap();
        sim.seed().unwrap();
        let seeded = sim.lattice().unwrap().cells().to_vec();
        sim.run_to_completion().unwrap();
        (seeded, sim.lattice().unwrap().cells().to_vec(), sim.rewards().to_vec())
    };

    let (seed_a, final_a, rewards_a) = run();
    let (seed_b, final_b, rewards_b) = run();
    assert_eq!(seed_a, seed_b);
    assert_eq!(final_a, final_b);
    assert_eq!(rewards_a, rewards_b);
}

#[test]
fn test_thread_count_does_not_change_result() {
    let run = |threads: u8| {
        let mut cfg = bounded_config(12, 4, 8);
        cfg.threads = threads;
        let mut sim = Simulation::new(cfg).unwrap();
        sim.seed().unwrap();
        sim.run_to_completion().unwrap();
        sim.lattice().unwrap().cells().to_vec()
    };

    assert_eq!(run(1), run(4));
}

#[test]
fn test_reward_count_is_min_of_request_and_pool() {
    for requested in [0usize, 1, 5, 40, 500] {
        let mut cfg = bounded_config(6, 2, 31);
        cfg.reward_count = requested;
        let mut sim = Simulation::new(cfg).unwrap();
        sim.seed().unwrap();
        let outcome = sim.run_to_completion().unwrap().clone();

        let lattice = sim.lattice().unwrap();
        let pool = lattice.len() - lattice.alive_count();
        assert_eq!(outcome.rewards.len(), requested.min(pool));
        assert_eq!(outcome.missing_rewards, requested - outcome.rewards.len());

        let mut unique = outcome.rewards.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), outcome.rewards.len());
        for c in &outcome.rewards {
            assert!(!lattice.get(c.x, c.y, c.z).unwrap());
        }
    }
}

#[test]
fn test_render_mask_matches_single_queries() {
    let mut sim = Simulation::new(bounded_config(8, 3, 4)).unwrap();
    sim.seed().unwrap();
    sim.run_to_completion().unwrap();
    assert_eq!(sim.state(), SchedulerState::Completed);

    let lattice = sim.lattice().unwrap();
    for c in lattice.coords() {
        let expected = crate::automaton::is_render_eligible(lattice, c).unwrap();
        assert_eq!(sim.is_render_eligible(c.x, c.y, c.z).unwrap(), expected);
    }
}

#[test]
fn test_default_run_completes() {
    let mut cfg = SimulationConfig::default();
    cfg.seed = Some(2024);
    let mut sim = Simulation::new(cfg).unwrap();
    sim.seed().unwrap();
    let outcome = sim.run_to_completion().unwrap();

    assert_eq!(outcome.generation, 15);
    assert_eq!(outcome.render_mask.len(), 70 * 70 * 70);
    assert_eq!(outcome.rewards.len() + outcome.missing_rewards, 10);
}

#[test]
fn benchmark_cavern_64_4steps() {
    let mut cfg = bounded_config(64, 4, 9999);
    cfg.threads = 4;
    cfg.dead_zone_count = CountRange { min: 10, max: 16 };
    cfg.dead_zone_radius = RadiusRange { min: 4.0, max: 12.0 };
    let mut sim = Simulation::new(cfg).unwrap();
    sim.seed().unwrap();
    sim.start().unwrap();

    let start = Instant::now();

    while sim.state() == SchedulerState::Running {
        sim.tick().unwrap();
    }

    let elapsed = start.elapsed();

    eprintln!(
        "[BENCHMARK] Cavern 64³ (4 steps): {} ms ({:.2} ms/step)",
        elapsed.as_millis(),
        elapsed.as_millis() as f64 / 4.0
    );

    assert!(
        elapsed.as_secs_f64() < 15.0,
        "Performance regression: took {:.2}s",
        elapsed.as_secs_f64()
    );
}
