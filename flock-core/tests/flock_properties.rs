use flock_core::{
    behavior, Agent, AgentId, Boundary, Flock, FlockConfig, FlockView, Radii, Seed, Steering,
    Vector2D, Weights,
};
use proptest::prelude::*;

const EPSILON: f32 = 1e-4;

fn scenario_config() -> FlockConfig {
    FlockConfig {
        max_speed: 3.0,
        max_force: 0.1,
        radii: Radii {
            alignment: 50.0,
            cohesion: 50.0,
            separation: 50.0,
        },
        weights: Weights {
            alignment: 1.0,
            cohesion: 1.0,
            separation: 1.0,
        },
        boundary: Boundary::new(100.0, 100.0),
    }
}

#[test]
fn two_agents_approaching_push_apart() {
    let a = Agent::new(Vector2D::new(10.0, 10.0), Vector2D::new(1.0, 0.0));
    let b = Agent::new(Vector2D::new(12.0, 10.0), Vector2D::new(-1.0, 0.0));
    let config = scenario_config();
    let mut flock = Flock::<2>::from_agents([a, b], config).unwrap();

    let steering = a.steering(AgentId(0), flock.view(), &config);
    assert!(steering.separation.x < 0.0);
    assert_eq!(steering.separation.y, 0.0);

    flock.advance();

    for agent in flock.population() {
        assert!(agent.velocity.magnitude() <= 3.0 + EPSILON);
    }
}

#[test]
fn symmetric_pair_separates_along_connecting_line() {
    let config = scenario_config();
    let half_gap = config.radii.separation / 4.0;
    let agents = [
        Agent::new(Vector2D::new(-half_gap, 0.0), Vector2D::zero()),
        Agent::new(Vector2D::new(half_gap, 0.0), Vector2D::zero()),
    ];
    let view = FlockView::new(&agents);

    for (index, agent) in agents.iter().enumerate() {
        let other = &agents[1 - index];
        let separation = behavior::separation(agent, view.others(AgentId(index)), &config);
        let away = (agent.position - other.position).try_normalize().unwrap();
        let direction = separation.try_normalize().unwrap();

        assert!((direction.x - away.x).abs() < EPSILON);
        assert!((direction.y - away.y).abs() < EPSILON);
        assert!((separation.magnitude() - config.max_speed).abs() < EPSILON);
    }
}

#[test]
fn lonely_agent_moves_in_a_straight_line() {
    let config = scenario_config();
    let start = Vector2D::new(50.0, 50.0);
    let velocity = Vector2D::new(1.0, 0.5);
    let mut flock = Flock::<1>::from_agents([Agent::new(start, velocity)], config).unwrap();

    for tick in 1..=60u32 {
        let agent = flock.population()[0];
        assert_eq!(
            agent.steering(AgentId(0), flock.view(), &config),
            Steering::default()
        );

        flock.advance();
        let agent = flock.population()[0];
        let expected = start + velocity * tick as f32;
        assert_eq!(agent.velocity, velocity);
        assert!(agent.position.distance(&expected) < EPSILON);
    }

    // 60 ticks in, x sits right on the far margin; two more ticks wrap it.
    flock.advance();
    flock.advance();
    let agent = flock.population()[0];
    assert_eq!(agent.velocity, velocity);
    assert!((agent.position.x - -9.0).abs() < EPSILON);
}

#[test]
fn clamped_force_keeps_direction() {
    let raw = Vector2D::new(-3.0, 4.0);
    let clamped = raw.limit(0.1);

    assert!((clamped.magnitude() - 0.1).abs() < 1e-6);
    let unit_raw = raw.try_normalize().unwrap();
    let unit_clamped = clamped.try_normalize().unwrap();
    assert!((unit_raw.x - unit_clamped.x).abs() < 1e-6);
    assert!((unit_raw.y - unit_clamped.y).abs() < 1e-6);
}

#[test]
fn rule_forces_are_clamped_before_integration() {
    let config = scenario_config();
    let a = Agent::new(Vector2D::new(10.0, 10.0), Vector2D::new(1.0, 0.0));
    let b = Agent::new(Vector2D::new(12.0, 10.0), Vector2D::new(-1.0, 0.0));
    let agents = [a, b];
    let view = FlockView::new(&agents);

    let raw = a.steering(AgentId(0), view, &config);
    assert!(raw.separation.magnitude() > config.max_force);

    let next = a.update(AgentId(0), view, &config);
    let change = next.velocity - a.velocity;
    // Three rules, each capped at max_force.
    assert!(change.magnitude() <= 3.0 * config.max_force + EPSILON);
}

#[test]
fn huge_max_speed_is_still_enforced() {
    let config = FlockConfig {
        max_speed: 2e19,
        max_force: 1e19,
        ..FlockConfig::default()
    };
    assert!(config.validate().is_ok());
    let mut flock = Flock::<32>::seeded(32, config, Seed(5)).unwrap();

    for _ in 0..5 {
        flock.advance();
        for agent in flock.population() {
            let speed = agent.velocity.magnitude();
            assert!(speed.is_finite());
            assert!(speed <= config.max_speed * (1.0 + 1e-6), "speed = {}", speed);
        }
    }
}

#[test]
fn seeded_runs_replay_bit_for_bit() {
    let config = FlockConfig::default().with_boundary(400.0, 300.0);
    let mut first = Flock::<128>::seeded(120, config, Seed(0xB01D)).unwrap();
    let mut second = Flock::<128>::seeded(120, config, Seed(0xB01D)).unwrap();

    for _ in 0..200 {
        first.advance();
        second.advance();
    }

    for (a, b) in first.population().iter().zip(second.population()) {
        assert_eq!(a.position.x.to_bits(), b.position.x.to_bits());
        assert_eq!(a.position.y.to_bits(), b.position.y.to_bits());
        assert_eq!(a.velocity.x.to_bits(), b.velocity.x.to_bits());
        assert_eq!(a.velocity.y.to_bits(), b.velocity.y.to_bits());
    }
}

#[test]
fn different_seeds_diverge() {
    let config = FlockConfig::default();
    let first = Flock::<16>::seeded(16, config, Seed(1)).unwrap();
    let second = Flock::<16>::seeded(16, config, Seed(2)).unwrap();
    let same = first
        .population()
        .iter()
        .zip(second.population())
        .all(|(a, b)| a.position == b.position);
    assert!(!same);
}

#[test]
fn processing_order_does_not_change_outcome() {
    let config = FlockConfig::default().with_boundary(300.0, 300.0);
    let seeded = Flock::<40>::seeded(40, config, Seed(77)).unwrap();
    let agents: Vec<Agent> = seeded.population().to_vec();
    let reversed: Vec<Agent> = agents.iter().rev().copied().collect();

    let mut forward = Flock::<40>::from_agents(agents, config).unwrap();
    let mut backward = Flock::<40>::from_agents(reversed, config).unwrap();
    for _ in 0..5 {
        forward.advance();
        backward.advance();
    }

    for (a, b) in forward
        .population()
        .iter()
        .zip(backward.population().iter().rev())
    {
        assert!(a.position.distance(&b.position) < 1e-2);
        assert!(a.velocity.distance(&b.velocity) < 1e-2);
    }
}

fn arb_config() -> impl Strategy<Value = FlockConfig> {
    (
        0.5f32..8.0,
        0.0f32..1.0,
        0.0f32..120.0,
        0.0f32..300.0,
        0.0f32..120.0,
        (0.0f32..3.0, 0.0f32..3.0, 0.0f32..3.0),
        (50.0f32..600.0, 50.0f32..600.0),
    )
        .prop_map(
            |(max_speed, max_force, align, cohesion, separation, weights, (width, height))| {
                FlockConfig {
                    max_speed,
                    max_force,
                    radii: Radii {
                        alignment: align,
                        cohesion,
                        separation,
                    },
                    weights: Weights {
                        alignment: weights.0,
                        cohesion: weights.1,
                        separation: weights.2,
                    },
                    boundary: Boundary::new(width, height),
                }
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn speed_never_exceeds_max(seed in any::<u64>(), count in 1usize..48, config in arb_config()) {
        let mut flock = Flock::<48>::seeded(count, config, Seed(seed)).unwrap();
        for _ in 0..40 {
            flock.advance();
            for agent in flock.population() {
                prop_assert!(agent.velocity.magnitude() <= config.max_speed + EPSILON);
            }
        }
    }

    #[test]
    fn positions_stay_near_boundary(
        seed in any::<u64>(),
        count in 1usize..48,
        config in arb_config()
    ) {
        let mut flock = Flock::<48>::seeded(count, config, Seed(seed)).unwrap();
        let Boundary { width, height, margin } = config.boundary;
        let slack = margin + config.max_speed + EPSILON;
        for _ in 0..200 {
            flock.advance();
            for agent in flock.population() {
                prop_assert!(agent.position.is_finite());
                prop_assert!(agent.position.x >= -slack && agent.position.x <= width + slack);
                prop_assert!(agent.position.y >= -slack && agent.position.y <= height + slack);
            }
        }
    }
}
