#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use flappy_evo::Error;
use flappy_evo::simulation::brain::Brain;
use ndarray::Array1;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::fs;
use std::path::PathBuf;

fn test_brain(seed: u64) -> Brain {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    Brain::new(8, 24, 1, 0.5, &mut rng)
}

fn sample_inputs() -> Array1<f32> {
    Array1::from_vec(vec![0.75, -0.3, 0.5, 0.1, 0.4, 0.45, 1.0, 0.0])
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("flappy_evo_{}_{}", std::process::id(), name))
}

#[test]
fn test_brain_dimensions() {
    let brain = test_brain(1);

    assert_eq!(brain.input_size(), 8);
    assert_eq!(brain.hidden_size(), 24);
    assert_eq!(brain.output_size(), 1);
    assert_eq!(brain.hidden_layer().weights.shape(), &[24, 8]);
    assert_eq!(brain.output_layer().weights.shape(), &[1, 24]);
    assert_eq!(brain.hidden_layer().input_size(), 8);
    assert_eq!(brain.hidden_layer().output_size(), 24);
    assert_eq!(brain.output_layer().input_size(), 24);
    assert_eq!(brain.output_layer().output_size(), 1);
    assert_eq!(brain.to_flat_vector().len(), 24 * 8 + 24 + 24 + 1);
}

#[test]
fn test_new_brain_has_zero_biases() {
    let brain = test_brain(2);

    assert!(brain.hidden_layer().biases.iter().all(|&b| b == 0.0));
    assert!(brain.output_layer().biases.iter().all(|&b| b == 0.0));
}

#[test]
fn test_predict_is_within_unit_interval() {
    let brain = test_brain(3);

    for scale in [-100.0_f32, -1.0, 0.0, 1.0, 100.0] {
        let inputs = sample_inputs() * scale;
        let output = brain.predict(&inputs);
        assert!((0.0..=1.0).contains(&output), "output {output} out of range");
    }
}

#[test]
fn test_think_returns_output_size_values() {
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let brain = Brain::new(8, 6, 3, 0.5, &mut rng);

    let output = brain.think(&sample_inputs());
    assert_eq!(output.len(), 3);
    assert_eq!(output[0], brain.predict(&sample_inputs()));
}

#[test]
fn test_clone_is_independent() {
    let original = test_brain(5);
    let before = original.to_flat_vector();

    let mut clone = original.clone();
    let mut rng = ChaCha8Rng::seed_from_u64(6);
    clone.mutate(1.0, 1.0, &mut rng);

    assert_eq!(original.to_flat_vector(), before);
    assert_ne!(clone.to_flat_vector(), before);
}

#[test]
fn test_mutate_with_zero_rate_changes_nothing() {
    let mut brain = test_brain(7);
    let before = brain.clone();
    let mut rng = ChaCha8Rng::seed_from_u64(8);

    brain.mutate(0.0, 5.0, &mut rng);

    assert_eq!(brain, before);
}

#[test]
fn test_mutate_with_zero_amount_changes_nothing() {
    let mut brain = test_brain(9);
    let before = brain.clone();
    let mut rng = ChaCha8Rng::seed_from_u64(10);

    brain.mutate(1.0, 0.0, &mut rng);

    assert_eq!(brain.to_flat_vector(), before.to_flat_vector());
}

#[test]
fn test_full_mutation_touches_every_parameter() {
    let mut brain = test_brain(11);
    let before = brain.to_flat_vector();
    let mut rng = ChaCha8Rng::seed_from_u64(12);

    brain.mutate(1.0, 0.5, &mut rng);

    let changed = brain
        .to_flat_vector()
        .iter()
        .zip(&before)
        .filter(|(a, b)| a != b)
        .count();
    assert_eq!(changed, before.len());
}

#[test]
fn test_crossover_takes_each_parameter_from_a_parent() {
    let parent1 = test_brain(13);
    let parent2 = test_brain(14);
    let mut rng = ChaCha8Rng::seed_from_u64(15);

    let child = Brain::crossover(&parent1, &parent2, &mut rng);

    let p1 = parent1.to_flat_vector();
    let p2 = parent2.to_flat_vector();
    for (i, value) in child.to_flat_vector().iter().enumerate() {
        assert!(*value == p1[i] || *value == p2[i]);
    }
    assert_eq!(child.input_size(), 8);
}

#[test]
fn test_json_round_trip_preserves_predictions() {
    let brain = test_brain(16);

    let json = brain.to_json().expect("serialize");
    let restored = Brain::from_json(&json).expect("deserialize");

    assert_eq!(restored.predict(&sample_inputs()), brain.predict(&sample_inputs()));
    assert_eq!(restored, brain);
}

#[test]
fn test_save_and_load_file() {
    let brain = test_brain(17);
    let path = temp_path("brain_roundtrip.json");

    brain.save_to_file(&path).expect("save");
    let loaded = Brain::load_from_file(&path).expect("load");

    assert_eq!(loaded.predict(&sample_inputs()), brain.predict(&sample_inputs()));

    fs::remove_file(&path).ok();
}

#[test]
fn test_load_rejects_mismatched_dimensions() {
    let brain = test_brain(18);
    let mut value: serde_json::Value =
        serde_json::from_str(&brain.to_json().expect("serialize")).expect("parse");
    value["hidden_size"] = serde_json::json!(12);

    let result = Brain::from_json(&value.to_string());

    assert!(matches!(result, Err(Error::ModelLoad(_))));
}

#[test]
fn test_load_rejects_garbage() {
    let result = Brain::from_json("{\"not\": \"a brain\"}");
    assert!(matches!(result, Err(Error::ModelLoad(_))));
}

#[test]
fn test_load_missing_file_fails() {
    let result = Brain::load_from_file(temp_path("does_not_exist.json"));
    assert!(matches!(result, Err(Error::ModelLoad(_))));
}

#[test]
fn test_load_rejects_unchained_layers() {
    let brain = test_brain(19);
    let mut value: serde_json::Value =
        serde_json::from_str(&brain.to_json().expect("serialize")).expect("parse");
    let narrow = Brain::new(8, 12, 1, 0.5, &mut ChaCha8Rng::seed_from_u64(20));
    value["output"] = serde_json::to_value(narrow.output_layer()).expect("layer");

    let result = Brain::from_json(&value.to_string());

    assert!(matches!(result, Err(Error::ModelLoad(_))));
}
