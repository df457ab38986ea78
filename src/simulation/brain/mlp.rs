//! Single dense layer with sigmoid activation.

use ndarray::{Array1, Array2, Zip};
use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

/// A single layer of a multi-layer perceptron.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mlp {
    /// Weight matrix (`output_size` × `input_size`), row-major.
    pub weights: Array2<f32>,
    /// Bias vector (`output_size`).
    pub biases: Array1<f32>,
}

impl Mlp {
    /// Creates a layer with Gaussian weights of standard deviation `scale` and zero biases.
    pub fn new_random<R: Rng>(
        input_size: usize,
        output_size: usize,
        scale: f32,
        rng: &mut R,
    ) -> Self {
        Self {
            weights: Array2::from_shape_simple_fn((output_size, input_size), || {
                rng.sample::<f32, _>(StandardNormal) * scale
            }),
            biases: Array1::zeros(output_size),
        }
    }

    /// Number of inputs the layer consumes.
    pub fn input_size(&self) -> usize {
        self.weights.ncols()
    }

    /// Number of outputs the layer produces.
    pub fn output_size(&self) -> usize {
        self.weights.nrows()
    }

    /// Performs forward pass with sigmoid activation.
    #[inline]
    pub fn forward(&self, inputs: &Array1<f32>) -> Array1<f32> {
        let mut output = self.weights.dot(inputs);
        output += &self.biases;
        output.mapv_inplace(sigmoid);
        output
    }

    /// Adds `amount`-scaled Gaussian noise to each parameter with probability `rate`.
    pub fn mutate<R: Rng>(&mut self, rate: f32, amount: f32, rng: &mut R) {
        mutate_elements(self.weights.iter_mut(), rate, amount, rng);
        mutate_elements(self.biases.iter_mut(), rate, amount, rng);
    }

    /// Builds a child layer taking each parameter from either parent with equal odds.
    pub fn crossover<R: Rng>(parent1: &Mlp, parent2: &Mlp, rng: &mut R) -> Self {
        let mut child = parent1.clone();
        Zip::from(&mut child.weights)
            .and(&parent2.weights)
            .for_each(|w, &other| {
                if rng.random::<f32>() >= 0.5 {
                    *w = other;
                }
            });
        Zip::from(&mut child.biases)
            .and(&parent2.biases)
            .for_each(|b, &other| {
                if rng.random::<f32>() >= 0.5 {
                    *b = other;
                }
            });
        child
    }
}

fn mutate_elements<'a, R: Rng>(
    values: impl Iterator<Item = &'a mut f32>,
    rate: f32,
    amount: f32,
    rng: &mut R,
) {
    for value in values {
        if rng.random::<f32>() < rate {
            *value += rng.sample::<f32, _>(StandardNormal) * amount;
        }
    }
}

#[inline]
fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sigmoid_is_centred_at_half() {
        assert!((sigmoid(0.0) - 0.5).abs() < f32::EPSILON);
        assert!(sigmoid(10.0) > 0.99);
        assert!(sigmoid(-10.0) < 0.01);
    }

    #[test]
    fn zero_layer_outputs_half() {
        let layer = Mlp {
            weights: Array2::zeros((3, 2)),
            biases: Array1::zeros(3),
        };
        let out = layer.forward(&Array1::from_vec(vec![4.0, -2.0]));
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|&v| (v - 0.5).abs() < f32::EPSILON));
    }
}
