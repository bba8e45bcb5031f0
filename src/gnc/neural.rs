use std::path::Path;

use nalgebra::{DMatrix, DVector};
use tracing::debug;

use crate::error::{Result, SimError};
use crate::vehicle::presets::{
    RAPTOR_LEFT, RAPTOR_RIGHT, RCS_BOTTOM_LEFT, RCS_BOTTOM_RIGHT, RCS_TOP_LEFT, RCS_TOP_RIGHT,
};
use super::command::ActuatorCommand;
use super::controller::ControlStep;
use super::sensor::SensorView;

/// Layer widths, input to output.
pub const LAYER_SIZES: [usize; 5] = [9, 64, 32, 16, 8];

const INPUTS: usize = LAYER_SIZES[0];
const OUTPUTS: usize = LAYER_SIZES[LAYER_SIZES.len() - 1];

#[derive(Debug, Clone, PartialEq)]
struct Dense {
    weight: DMatrix<f64>, // outputs x inputs
    bias: DVector<f64>,
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

// ---------------------------------------------------------------------------
// Neural landing: feed-forward policy over the sensor feature vector
// ---------------------------------------------------------------------------

/// Learned landing policy.
///
/// A fully connected network (ReLU hidden layers, linear output) reads
/// [`SensorView::to_features`]. Its eight outputs drive the Starship preset:
///
/// | output | actuator | mapping |
/// |---|---|---|
/// | 0..4 | RCS TL, TR, BL, BR | on when `sigmoid >= 0.5` |
/// | 4, 5 | Raptor 1, Raptor 2 power | `min + (max - min) * sigmoid` |
/// | 6, 7 | Raptor 2, Raptor 1 gimbal | `tanh * max_gimbal` |
///
/// Holds no state between ticks, so `reset` is a no-op.
#[derive(Debug, Clone, PartialEq)]
pub struct NeuralLanding {
    layers: Vec<Dense>,
    pub min_power: f64,
    pub max_power: f64,
    pub max_gimbal: f64, // rad
}

impl NeuralLanding {
    /// Number of weights and biases the network carries.
    pub fn parameter_count() -> usize {
        LAYER_SIZES.windows(2).map(|w| w[0] * w[1] + w[1]).sum()
    }

    /// Build from a flat parameter vector. For each layer in turn: the
    /// weight matrix one output row at a time, then that layer's bias.
    pub fn from_flat_weights(params: &[f64]) -> Result<Self> {
        let expected = Self::parameter_count();
        if params.len() != expected {
            return Err(SimError::WeightCount {
                expected,
                got: params.len(),
            });
        }

        let mut layers = Vec::with_capacity(LAYER_SIZES.len() - 1);
        let mut rest = params;
        for w in LAYER_SIZES.windows(2) {
            let (inputs, outputs) = (w[0], w[1]);
            let (weight, tail) = rest.split_at(inputs * outputs);
            let (bias, tail) = tail.split_at(outputs);
            layers.push(Dense {
                weight: DMatrix::from_row_slice(outputs, inputs, weight),
                bias: DVector::from_column_slice(bias),
            });
            rest = tail;
        }
        debug!(parameters = expected, "neural controller built");

        Ok(Self {
            layers,
            min_power: 0.4,
            max_power: 1.0,
            max_gimbal: 15.0_f64.to_radians(),
        })
    }

    /// Load a JSON array of parameters in `from_flat_weights` order.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let params: Vec<f64> = serde_json::from_str(&text)?;
        Self::from_flat_weights(&params)
    }

    /// Parameters in the order `from_flat_weights` reads them.
    pub fn flat_weights(&self) -> Vec<f64> {
        let mut params = Vec::with_capacity(Self::parameter_count());
        for layer in &self.layers {
            // Column-major storage of the transpose is the row-major weight
            params.extend(layer.weight.transpose().iter());
            params.extend(layer.bias.iter());
        }
        params
    }

    /// Raw network outputs, before any squashing.
    pub fn forward(&self, features: &[f64; INPUTS]) -> [f64; OUTPUTS] {
        let mut x = DVector::from_column_slice(features);
        let hidden = self.layers.len().saturating_sub(1);
        for (i, layer) in self.layers.iter().enumerate() {
            x = &layer.weight * x + &layer.bias;
            if i < hidden {
                x = x.map(|v| v.max(0.0));
            }
        }
        let mut out = [0.0; OUTPUTS];
        out.copy_from_slice(x.as_slice());
        out
    }

    fn throttle(&self, raw: f64) -> f64 {
        (self.min_power + (self.max_power - self.min_power) * sigmoid(raw)).clamp(self.min_power, self.max_power)
    }

    fn gimbal(&self, raw: f64) -> f64 {
        raw.tanh() * self.max_gimbal
    }
}

impl ControlStep for NeuralLanding {
    fn compute(&mut self, sensors: &SensorView, cmd: &mut ActuatorCommand, _fuel_remaining: f64, _dt: f64) {
        let out = self.forward(&sensors.to_features());

        let rcs = [RCS_TOP_LEFT, RCS_TOP_RIGHT, RCS_BOTTOM_LEFT, RCS_BOTTOM_RIGHT];
        for (name, raw) in rcs.into_iter().zip(&out[..4]) {
            cmd.set_power(name, if sigmoid(*raw) >= 0.5 { 1.0 } else { 0.0 });
        }
        cmd.set(RAPTOR_LEFT, self.throttle(out[4]), self.gimbal(out[7]));
        cmd.set(RAPTOR_RIGHT, self.throttle(out[5]), self.gimbal(out[6]));
    }

    fn reset(&mut self) {}

    fn name(&self) -> &str {
        "NeuralLanding"
    }
}
