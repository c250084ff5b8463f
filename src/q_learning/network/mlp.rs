//! Two-hidden-layer ReLU regression network trained with RMSprop.

use ndarray::{Array, Array1, Array2, ArrayView1, Axis, Dimension, Zip};
use rand::{Rng, SeedableRng, rngs::StdRng};

use super::OptimizerConfig;

/// Feed-forward regressor: `input → relu(h1) → relu(h2) → linear scalar`.
///
/// Hidden layers use LeCun-uniform initialisation; the output layer starts
/// at zero so an untrained network predicts exactly `0.0`.
#[derive(Debug, Clone)]
pub struct Mlp {
    /// [h1, input]
    w1: Array2<f64>,
    b1: Array1<f64>,
    /// [h2, h1]
    w2: Array2<f64>,
    b2: Array1<f64>,
    /// [h2]
    w3: Array1<f64>,
    b3: f64,
    optimizer: OptimizerConfig,
    cache: RmsCache,
}

/// Running mean of squared gradients, one entry per parameter.
#[derive(Debug, Clone)]
struct RmsCache {
    w1: Array2<f64>,
    b1: Array1<f64>,
    w2: Array2<f64>,
    b2: Array1<f64>,
    w3: Array1<f64>,
    b3: f64,
}

struct Activations {
    z1: Array1<f64>,
    a1: Array1<f64>,
    z2: Array1<f64>,
    a2: Array1<f64>,
    output: f64,
}

fn relu(x: f64) -> f64 {
    x.max(0.0)
}

fn relu_grad(x: f64) -> f64 {
    if x > 0.0 { 1.0 } else { 0.0 }
}

fn lecun_uniform(rng: &mut StdRng, fan_out: usize, fan_in: usize) -> Array2<f64> {
    let limit = (3.0 / fan_in.max(1) as f64).sqrt();
    Array2::from_shape_fn((fan_out, fan_in), |_| rng.random_range(-limit..limit))
}

impl Mlp {
    /// Build a network for `input_width` inputs.
    pub fn new(
        input_width: usize,
        hidden: (usize, usize),
        optimizer: OptimizerConfig,
        seed: Option<u64>,
    ) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        let (h1, h2) = hidden;
        let w1 = lecun_uniform(&mut rng, h1, input_width);
        let w2 = lecun_uniform(&mut rng, h2, h1);

        Self {
            cache: RmsCache {
                w1: Array2::zeros(w1.raw_dim()),
                b1: Array1::zeros(h1),
                w2: Array2::zeros(w2.raw_dim()),
                b2: Array1::zeros(h2),
                w3: Array1::zeros(h2),
                b3: 0.0,
            },
            w1,
            b1: Array1::zeros(h1),
            w2,
            b2: Array1::zeros(h2),
            w3: Array1::zeros(h2),
            b3: 0.0,
            optimizer,
        }
    }

    pub fn input_width(&self) -> usize {
        self.w1.ncols()
    }

    pub fn num_parameters(&self) -> usize {
        self.w1.len() + self.b1.len() + self.w2.len() + self.b2.len() + self.w3.len() + 1
    }

    fn forward(&self, input: ArrayView1<'_, f64>) -> Activations {
        let z1 = self.w1.dot(&input) + &self.b1;
        let a1 = z1.mapv(relu);
        let z2 = self.w2.dot(&a1) + &self.b2;
        let a2 = z2.mapv(relu);
        let output = self.w3.dot(&a2) + self.b3;
        Activations {
            z1,
            a1,
            z2,
            a2,
            output,
        }
    }

    /// One forward pass.
    pub fn predict(&self, input: ArrayView1<'_, f64>) -> f64 {
        self.forward(input).output
    }

    /// One RMSprop step on the squared error `(ŷ - target)²`.
    ///
    /// Returns the loss measured before the step.
    pub fn train_step(&mut self, input: ArrayView1<'_, f64>, target: f64) -> f64 {
        let act = self.forward(input);
        let error = act.output - target;
        let d_out = 2.0 * error;

        let grad_w3 = &act.a2 * d_out;
        let grad_b3 = d_out;

        let dz2 = (&self.w3 * d_out) * act.z2.mapv(relu_grad);
        let grad_w2 = outer(&dz2, &act.a1);
        let grad_b2 = dz2.clone();

        let dz1 = self.w2.t().dot(&dz2) * act.z1.mapv(relu_grad);
        let grad_w1 = outer(&dz1, &input.to_owned());
        let grad_b1 = dz1;

        let opt = self.optimizer;
        rmsprop(&mut self.w1, &mut self.cache.w1, &grad_w1, opt);
        rmsprop(&mut self.b1, &mut self.cache.b1, &grad_b1, opt);
        rmsprop(&mut self.w2, &mut self.cache.w2, &grad_w2, opt);
        rmsprop(&mut self.b2, &mut self.cache.b2, &grad_b2, opt);
        rmsprop(&mut self.w3, &mut self.cache.w3, &grad_w3, opt);

        self.cache.b3 = opt.rho * self.cache.b3 + (1.0 - opt.rho) * grad_b3 * grad_b3;
        self.b3 -= opt.learning_rate * grad_b3 / (self.cache.b3.sqrt() + opt.epsilon);

        error * error
    }
}

fn outer(column: &Array1<f64>, row: &Array1<f64>) -> Array2<f64> {
    column
        .view()
        .insert_axis(Axis(1))
        .dot(&row.view().insert_axis(Axis(0)))
}

fn rmsprop<D: Dimension>(
    param: &mut Array<f64, D>,
    cache: &mut Array<f64, D>,
    grad: &Array<f64, D>,
    opt: OptimizerConfig,
) {
    Zip::from(param)
        .and(cache)
        .and(grad)
        .for_each(|p, c, &g| {
            *c = opt.rho * *c + (1.0 - opt.rho) * g * g;
            *p -= opt.learning_rate * g / (c.sqrt() + opt.epsilon);
        });
}
