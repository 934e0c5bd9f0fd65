//! fountain/sampler.rs
//! Walker/Vose alias sampler for the part degree distribution.

use crate::fountain::xoshiro::Xoshiro256;

#[derive(Debug, Clone)]
pub struct AliasSampler {
    probs: Vec<f64>,
    aliases: Vec<usize>,
}

impl AliasSampler {
    /// `weights` must be non-empty and positive.
    pub fn new(weights: &[f64]) -> Self {
        let n = weights.len();
        let sum: f64 = weights.iter().sum();
        let mut scaled: Vec<f64> = weights.iter().map(|w| w * n as f64 / sum).collect();

        let mut small = Vec::with_capacity(n);
        let mut large = Vec::with_capacity(n);
        for j in (0..n).rev() {
            if scaled[j] < 1.0 {
                small.push(j);
            } else {
                large.push(j);
            }
        }

        let mut probs = vec![0.0; n];
        let mut aliases = vec![0usize; n];

        while !small.is_empty() && !large.is_empty() {
            let (Some(a), Some(g)) = (small.pop(), large.pop()) else { break };
            probs[a] = scaled[a];
            aliases[a] = g;
            scaled[g] += scaled[a] - 1.0;
            if scaled[g] < 1.0 {
                small.push(g);
            } else {
                large.push(g);
            }
        }
        while let Some(g) = large.pop() {
            probs[g] = 1.0;
        }
        while let Some(a) = small.pop() {
            probs[a] = 1.0;
        }

        Self { probs, aliases }
    }

    /// Draws two doubles: column, then coin.
    pub fn next(&self, rng: &mut Xoshiro256) -> usize {
        let r1 = rng.next_double();
        let r2 = rng.next_double();
        let i = (self.probs.len() as f64 * r1) as usize;
        if r2 < self.probs[i] {
            i
        } else {
            self.aliases[i]
        }
    }
}

/// Degree in `1..=seq_len`, weighted `1/k`.
pub fn choose_degree(seq_len: usize, rng: &mut Xoshiro256) -> usize {
    let weights: Vec<f64> = (1..=seq_len).map(|k| 1.0 / k as f64).collect();
    AliasSampler::new(&weights).next(rng) + 1
}

/// Seeded removal-order shuffle.
pub fn shuffled<T>(mut items: Vec<T>, rng: &mut Xoshiro256) -> Vec<T> {
    let mut result = Vec::with_capacity(items.len());
    while !items.is_empty() {
        let index = rng.next_int(0, items.len() as u64 - 1) as usize;
        result.push(items.remove(index));
    }
    result
}
