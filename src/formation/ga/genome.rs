//! Random-key genome for grouping.
//!
//! # Encoding
//!
//! One real gene in `[0, 1]` per individual, in matrix order. Decoding
//! scans the genes left to right and closes the current group when the
//! gene exceeds [`SPLIT_THRESHOLD`] or the group is full, provided the
//! group has reached the minimum size. Otherwise its members roll into
//! the next group.
//!
//! # Reference
//! Bean (1994), "Genetic Algorithms and Random Keys for Sequencing and
//! Optimization"

use rand::Rng;

use super::runner::Candidate;

/// Genes above this value request a split after their individual.
pub const SPLIT_THRESHOLD: f64 = 0.5;

/// Random-key grouping genome.
#[derive(Debug, Clone, PartialEq)]
pub struct Genome {
    /// One key per individual.
    pub genes: Vec<f64>,
    fitness: Option<f64>,
}

impl Candidate for Genome {
    fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = Some(fitness);
    }

    fn invalidate(&mut self) {
        self.fitness = None;
    }
}

impl Genome {
    /// Uniform random genes.
    pub fn random<R: Rng>(len: usize, rng: &mut R) -> Self {
        Self::from_genes((0..len).map(|_| rng.random::<f64>()).collect())
    }

    /// Wraps explicit genes with stale fitness.
    pub fn from_genes(genes: Vec<f64>) -> Self {
        Self {
            genes,
            fitness: None,
        }
    }

    /// Number of genes.
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// Whether the genome has no genes.
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Decodes into index groups under the given bounds.
    pub fn decode(&self, min_size: usize, max_size: usize) -> Vec<Vec<usize>> {
        decode(&self.genes, min_size, max_size)
    }
}

/// Decodes genes into index groups.
///
/// A trailing group below `min_size` merges into the smallest emitted
/// group (first on ties). With nothing emitted it is kept as its own,
/// undersized group.
pub fn decode(genes: &[f64], min_size: usize, max_size: usize) -> Vec<Vec<usize>> {
    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut current: Vec<usize> = Vec::new();

    for (i, &gene) in genes.iter().enumerate() {
        current.push(i);
        if (gene > SPLIT_THRESHOLD || current.len() >= max_size) && current.len() >= min_size {
            groups.push(std::mem::take(&mut current));
        }
    }

    if !current.is_empty() {
        if current.len() >= min_size {
            groups.push(current);
        } else if let Some(smallest) = groups.iter_mut().min_by_key(|g| g.len()) {
            smallest.append(&mut current);
        } else {
            groups.push(current);
        }
    }

    groups
}

/// Two-point crossover: swaps the gene segment between two cut points.
///
/// Returns whether any swapped gene differed. Genomes shorter than two
/// genes are left untouched.
pub fn two_point_crossover<R: Rng>(first: &mut Genome, second: &mut Genome, rng: &mut R) -> bool {
    let size = first.len().min(second.len());
    if size < 2 {
        return false;
    }
    let a = rng.random_range(1..=size);
    let mut b = rng.random_range(1..size);
    let (lo, hi) = if b >= a {
        b += 1;
        (a, b)
    } else {
        (b, a)
    };
    let hi = hi.min(size);

    let mut changed = false;
    for i in lo..hi {
        if first.genes[i] != second.genes[i] {
            std::mem::swap(&mut first.genes[i], &mut second.genes[i]);
            changed = true;
        }
    }
    changed
}

/// Flip mutation: each gene flips across the split threshold
/// (`g → 1 - g`) with probability `gene_rate`.
///
/// Splits can be added as well as removed. A gene of exactly
/// [`SPLIT_THRESHOLD`] maps to itself.
///
/// Returns whether any gene changed.
pub fn flip_mutation<R: Rng>(genome: &mut Genome, gene_rate: f64, rng: &mut R) -> bool {
    let mut changed = false;
    for gene in &mut genome.genes {
        if rng.random_bool(gene_rate) {
            let flipped = 1.0 - *gene;
            if flipped != *gene {
                *gene = flipped;
                changed = true;
            }
        }
    }
    changed
}
