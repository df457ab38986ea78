//! Neural network implementation for bird brains.
//!
//! A fixed single-hidden-layer perceptron with sigmoid activations, evolved
//! purely through mutation. Brains persist as JSON holding the architecture
//! and the four parameter tensors.

use ndarray::Array1;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::{Error, Result};

pub mod mlp;

pub use mlp::Mlp;

/// Feed-forward brain: inputs → hidden (sigmoid) → output (sigmoid).
///
/// Cloning produces a fully independent deep copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brain {
    input_size: usize,
    hidden_size: usize,
    output_size: usize,
    /// Input → hidden layer.
    hidden: Mlp,
    /// Hidden → output layer.
    output: Mlp,
}

impl Brain {
    /// Creates a new brain with Gaussian weights of standard deviation `scale` and zero biases.
    pub fn new<R: Rng>(
        input_size: usize,
        hidden_size: usize,
        output_size: usize,
        scale: f32,
        rng: &mut R,
    ) -> Self {
        Self {
            input_size,
            hidden_size,
            output_size,
            hidden: Mlp::new_random(input_size, hidden_size, scale, rng),
            output: Mlp::new_random(hidden_size, output_size, scale, rng),
        }
    }

    /// Number of inputs expected by [`Brain::predict`].
    pub fn input_size(&self) -> usize {
        self.input_size
    }

    /// Width of the hidden layer.
    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    /// Number of outputs of the network.
    pub fn output_size(&self) -> usize {
        self.output_size
    }

    /// Input → hidden layer.
    pub fn hidden_layer(&self) -> &Mlp {
        &self.hidden
    }

    /// Hidden → output layer.
    pub fn output_layer(&self) -> &Mlp {
        &self.output
    }

    /// Runs a forward pass through both layers.
    #[inline]
    pub fn think(&self, inputs: &Array1<f32>) -> Array1<f32> {
        self.output.forward(&self.hidden.forward(inputs))
    }

    /// Returns the first output, a value in [0, 1].
    ///
    /// `inputs` must have exactly [`Brain::input_size`] elements; the width is
    /// checked once when the brain is attached to a bird, not here.
    #[inline]
    pub fn predict(&self, inputs: &Array1<f32>) -> f32 {
        self.think(inputs)[0]
    }

    /// Mutates every parameter independently with probability `rate` by adding
    /// zero-mean Gaussian noise scaled by `amount`.
    pub fn mutate<R: Rng>(&mut self, rate: f32, amount: f32, rng: &mut R) {
        self.hidden.mutate(rate, amount, rng);
        self.output.mutate(rate, amount, rng);
    }

    /// Creates a child whose parameters are drawn element-wise from either parent.
    ///
    /// Both parents must share an architecture.
    pub fn crossover<R: Rng>(parent1: &Brain, parent2: &Brain, rng: &mut R) -> Self {
        Self {
            input_size: parent1.input_size,
            hidden_size: parent1.hidden_size,
            output_size: parent1.output_size,
            hidden: Mlp::crossover(&parent1.hidden, &parent2.hidden, rng),
            output: Mlp::crossover(&parent1.output, &parent2.output, rng),
        }
    }

    /// Flattens all weights and biases into a single vector.
    pub fn to_flat_vector(&self) -> Vec<f32> {
        let mut flat = Vec::new();
        for layer in [&self.hidden, &self.output] {
            flat.extend(layer.weights.iter().copied());
            flat.extend(layer.biases.iter().copied());
        }
        flat
    }

    /// Checks that the stored dimensions agree with the tensors.
    fn check_shapes(&self) -> Result<()> {
        if self.hidden.output_size() != self.output.input_size() {
            return Err(Error::ModelLoad(format!(
                "hidden layer yields {} values, output layer takes {}",
                self.hidden.output_size(),
                self.output.input_size()
            )));
        }
        expect_shape(
            "input→hidden weights",
            self.hidden.weights.shape(),
            &[self.hidden_size, self.input_size],
        )?;
        expect_shape(
            "hidden biases",
            self.hidden.biases.shape(),
            &[self.hidden_size],
        )?;
        expect_shape(
            "hidden→output weights",
            self.output.weights.shape(),
            &[self.output_size, self.hidden_size],
        )?;
        expect_shape(
            "output biases",
            self.output.biases.shape(),
            &[self.output_size],
        )?;
        if self.input_size == 0 || self.hidden_size == 0 || self.output_size == 0 {
            return Err(Error::ModelLoad("layer sizes must be non-zero".into()));
        }
        Ok(())
    }

    /// Serializes the brain to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Restores a brain from JSON, rejecting tensors that disagree with the stored architecture.
    pub fn from_json(json: &str) -> Result<Self> {
        let brain: Self =
            serde_json::from_str(json).map_err(|e| Error::ModelLoad(e.to_string()))?;
        brain.check_shapes()?;
        Ok(brain)
    }

    /// Saves the brain to a JSON file.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Loads a brain from a JSON file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::ModelLoad(format!("{}: {e}", path.display())))?;
        Self::from_json(&json)
    }
}

fn expect_shape(what: &str, actual: &[usize], expected: &[usize]) -> Result<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(Error::ModelLoad(format!(
            "{what} has shape {actual:?}, architecture requires {expected:?}"
        )))
    }
}
