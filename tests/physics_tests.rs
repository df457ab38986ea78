#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use flappy_evo::Error;
use flappy_evo::simulation::bird::Bird;
use flappy_evo::simulation::brain::Brain;
use flappy_evo::simulation::features::{self, FEATURE_COUNT};
use flappy_evo::simulation::gate::Gate;
use flappy_evo::simulation::locatable::Locatable;
use flappy_evo::simulation::params::Params;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-4,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn test_bird_falls_under_gravity() {
    let params = Params::default();
    let mut bird = Bird::new(0, 100.0, 300.0, &params);

    assert!(bird.tick());

    assert_close(bird.velocity, 0.8);
    assert_close(bird.y, 300.8);
}

#[test]
fn test_jump_replaces_velocity() {
    let params = Params::default();
    let mut bird = Bird::new(0, 100.0, 300.0, &params);
    bird.velocity = 7.0;

    bird.jump();
    assert_eq!(bird.velocity, -10.0);

    bird.tick();
    assert_close(bird.velocity, -9.2);
    assert_close(bird.y, 290.8);
}

#[test]
fn test_ceiling_clamps_position_and_velocity() {
    let params = Params::default();
    let mut bird = Bird::new(0, 100.0, 5.0, &params);
    bird.jump();

    assert!(bird.tick());

    assert_eq!(bird.y, 0.0);
    assert_eq!(bird.velocity, 0.0);
}

#[test]
fn test_ground_limit_ends_flight() {
    let params = Params::default();
    let mut bird = Bird::new(0, 100.0, 399.5, &params);

    assert!(!bird.tick());
}

#[test]
fn test_bird_locatable() {
    let params = Params::default();
    let mut bird = Bird::new(0, 100.0, 300.0, &params);

    assert_eq!(bird.pos(), (100.0, 300.0));
    assert!(bird.update());
    assert_close(bird.pos().1, 300.8);
}

#[test]
fn test_gate_geometry() {
    let params = Params::default();
    let gate = Gate::with_gap(400.0, 300.0, &params);

    assert_eq!(gate.gap_top(), 215.0);
    assert_eq!(gate.gap_bottom(), 385.0);
    assert_eq!(gate.trailing_edge(), 460.0);
    assert_eq!(gate.pos(), (400.0, 300.0));
}

#[test]
fn test_random_gap_stays_in_range() {
    let params = Params::default();
    let mut rng = ChaCha8Rng::seed_from_u64(21);

    for _ in 0..200 {
        let gate = Gate::new(800.0, &params, &mut rng);
        assert!((180.0..=320.0).contains(&gate.gap_y));
        assert_eq!(gate.gap_y.fract(), 0.0);
    }
}

#[test]
fn test_gate_leaves_screen_after_287_ticks() {
    let params = Params::default();
    let mut gate = Gate::with_gap(800.0, 300.0, &params);

    for tick in 1..287 {
        assert!(gate.update(), "gate left the screen early at tick {tick}");
    }
    assert!(!gate.update());
    assert_eq!(gate.x, 800.0 - 3.0 * 287.0);
}

#[test]
fn test_collision_with_upper_pipe() {
    let params = Params::default();
    let gate = Gate::with_gap(100.0, 300.0, &params);
    let bird = Bird::new(0, 100.0, 200.0, &params);

    assert!(bird.collides_with(&gate));
}

#[test]
fn test_collision_with_lower_pipe() {
    let params = Params::default();
    let gate = Gate::with_gap(100.0, 300.0, &params);
    // bottom edge at 394 is past the gap bottom at 385
    let bird = Bird::new(0, 100.0, 370.0, &params);

    assert!(bird.collides_with(&gate));
}

#[test]
fn test_no_collision_inside_gap() {
    let params = Params::default();
    let gate = Gate::with_gap(100.0, 300.0, &params);
    let bird = Bird::new(0, 100.0, 250.0, &params);

    assert!(!bird.collides_with(&gate));
}

#[test]
fn test_no_collision_without_horizontal_overlap() {
    let params = Params::default();
    let bird = Bird::new(0, 100.0, 10.0, &params);

    let ahead = Gate::with_gap(134.0, 300.0, &params);
    let behind = Gate::with_gap(40.0, 300.0, &params);

    assert!(!bird.collides_with(&ahead));
    assert!(!bird.collides_with(&behind));
}

#[test]
fn test_pass_is_reported_once_per_gate() {
    let params = Params::default();
    let mut gate = Gate::with_gap(30.0, 300.0, &params);
    let first = Bird::new(0, 100.0, 300.0, &params);
    let second = Bird::new(1, 100.0, 300.0, &params);

    assert!(!gate.passed);
    assert!(gate.is_passed_by(&first));
    assert!(gate.passed);

    assert!(!gate.is_passed_by(&first));
    assert!(!gate.is_passed_by(&second));
}

#[test]
fn test_pass_requires_clearing_the_trailing_edge() {
    let params = Params::default();
    let mut gate = Gate::with_gap(40.0, 300.0, &params);
    let bird = Bird::new(0, 100.0, 300.0, &params);

    // trailing edge at exactly 100
    assert!(!gate.is_passed_by(&bird));

    gate.update();
    assert!(gate.is_passed_by(&bird));
}

#[test]
fn test_features_for_single_gate() {
    let params = Params::default();
    let bird = Bird::new(0, 100.0, 300.0, &params);
    let gates = vec![Gate::with_gap(400.0, 300.0, &params)];

    let inputs = features::extract(&bird, &gates).expect("gate ahead");

    assert_eq!(inputs.len(), FEATURE_COUNT);
    let expected = [0.75, 0.0, 0.75, 0.0, 0.425, 0.425, 1.0, 0.0];
    for (actual, expected) in inputs.iter().zip(expected) {
        assert_close(*actual, expected);
    }
}

#[test]
fn test_features_skip_passed_gates_and_read_second_gate() {
    let params = Params::default();
    let mut bird = Bird::new(0, 100.0, 250.0, &params);
    bird.velocity = -5.0;
    let gates = vec![
        Gate::with_gap(20.0, 200.0, &params),
        Gate::with_gap(300.0, 250.0, &params),
        Gate::with_gap(500.0, 350.0, &params),
    ];

    let inputs = features::extract(&bird, &gates).expect("gate ahead");

    assert_close(inputs[1], -0.5);
    assert_close(inputs[2], 0.5);
    assert_close(inputs[3], 0.0);
    assert_close(inputs[6], 1.0);
    assert_close(inputs[7], -0.5);
}

#[test]
fn test_features_without_gate_ahead() {
    let params = Params::default();
    let bird = Bird::new(0, 100.0, 300.0, &params);

    assert!(features::extract(&bird, &[]).is_none());
    assert!(features::extract(&bird, &[Gate::with_gap(10.0, 300.0, &params)]).is_none());
}

#[test]
fn test_brain_with_wrong_input_size_is_rejected() {
    let params = Params::default();
    let mut rng = ChaCha8Rng::seed_from_u64(22);
    let brain = Brain::new(5, 4, 1, 0.1, &mut rng);

    let result = Bird::with_brain(0, 100.0, 300.0, brain, &params);

    assert!(matches!(
        result,
        Err(Error::InvalidInputSize {
            expected: 8,
            actual: 5
        })
    ));
}

#[test]
fn test_brainless_bird_never_decides_to_jump() {
    let params = Params::default();
    let mut bird = Bird::new(0, 100.0, 300.0, &params);
    let gates = vec![Gate::with_gap(400.0, 300.0, &params)];

    assert!(!bird.decide(&gates));
    assert_eq!(bird.velocity, 0.0);
}

#[test]
fn test_decide_without_gate_is_a_no_op() {
    let params = Params::default();
    let mut rng = ChaCha8Rng::seed_from_u64(23);
    let brain = Brain::new(8, 4, 1, 0.1, &mut rng);
    let mut bird = Bird::with_brain(0, 100.0, 300.0, brain, &params).expect("valid brain");

    assert!(!bird.decide(&[]));
    assert_eq!(bird.velocity, 0.0);
}
