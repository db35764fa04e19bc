//! Colour clustering for colour-histogram comparisons
//!
//! Valid pixel colours are quantized into `k` clusters with k-means. Each
//! pixel stores the index of its nearest cluster centre, so the colour
//! histogram of any region is a simple count over that membership image.

use std::fmt;

use ndarray::Array2;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rstar::RTree;
use rstar::primitives::GeomWithData;

use crate::math::histogram::Histogram;
use crate::spatial::{Mask, Patch, Raster, Region};

/// Cluster centre stored in the spatial index together with its bin number
type IndexedCenter = GeomWithData<[f64; 3], usize>;

/// K-means colour quantization with a nearest-centre index
#[derive(Clone)]
pub struct ColorClusters {
    centers: Vec<[f64; 3]>,
    tree: RTree<IndexedCenter>,
    membership: Array2<usize>,
}

impl ColorClusters {
    /// Cluster the valid pixel colours of `raster` into at most `bins` groups
    ///
    /// Initial centres are distinct valid pixels drawn with a seeded
    /// generator, so the same input always gives the same clusters.
    pub fn new(
        raster: &Raster,
        mask: &Mask,
        bins: usize,
        max_iterations: usize,
        seed: u64,
    ) -> Self {
        let samples: Vec<[f64; 3]> = mask
            .full_region()
            .indices()
            .filter(|&p| mask.is_valid(p))
            .map(|p| raster.color3(p))
            .collect();

        let mut rng = StdRng::seed_from_u64(seed);
        let centers = kmeans(&samples, bins.max(1), max_iterations, &mut rng);
        let tree = RTree::bulk_load(
            centers
                .iter()
                .enumerate()
                .map(|(bin, &center)| GeomWithData::new(center, bin))
                .collect(),
        );

        let mut clusters = Self {
            centers,
            tree,
            membership: Array2::zeros(raster.dim()),
        };
        clusters.update_membership(raster, &raster.full_region());
        clusters
    }

    /// Index of the cluster centre nearest to `color`
    pub fn nearest_bin(&self, color: [f64; 3]) -> usize {
        self.tree
            .nearest_neighbor(&color)
            .map_or(0, |center| center.data)
    }

    /// Re-bin the pixels of `region` after they changed
    pub fn update_membership(&mut self, raster: &Raster, region: &Region) {
        for pixel in region.crop(&raster.full_region()).indices() {
            let bin = self.nearest_bin(raster.color3(pixel));
            if let Some(entry) = self.membership.get_mut(pixel) {
                *entry = bin;
            }
        }
    }

    /// Normalized bin histogram over the valid pixels of `target`, read at
    /// `offset`
    ///
    /// With a zero offset this is the target's own histogram; with the
    /// target-to-source offset it counts the source pixels at exactly the
    /// positions that are known in the target.
    pub fn masked_histogram(&self, mask: &Mask, target: &Patch, offset: [i32; 2]) -> Histogram {
        let mut histogram = Histogram::zeros(self.centers.len());
        for pixel in target.region.crop(&mask.full_region()).indices() {
            if !mask.is_valid(pixel) {
                continue;
            }
            let row = pixel[0] as i64 + offset[0] as i64;
            let col = pixel[1] as i64 + offset[1] as i64;
            if row < 0 || col < 0 {
                continue;
            }
            if let Some(&bin) = self.membership.get([row as usize, col as usize]) {
                histogram.increment(bin);
            }
        }
        histogram.normalized()
    }

    /// L1 distance between the masked histograms of target and source
    pub fn difference(&self, mask: &Mask, target: &Patch, source: &Patch) -> f64 {
        let own = self.masked_histogram(mask, target, [0, 0]);
        let other = self.masked_histogram(mask, target, target.offset_to(source));
        own.difference(&other)
    }

    /// Number of clusters
    pub fn bins(&self) -> usize {
        self.centers.len()
    }

    /// Cluster centres as RGB triples
    pub fn centers(&self) -> &[[f64; 3]] {
        &self.centers
    }

    /// Cluster index of every pixel
    pub const fn membership(&self) -> &Array2<usize> {
        &self.membership
    }
}

impl fmt::Debug for ColorClusters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColorClusters")
            .field("centers", &self.centers)
            .field("dim", &self.membership.dim())
            .finish_non_exhaustive()
    }
}

fn squared_distance(a: [f64; 3], b: [f64; 3]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

fn nearest_center(centers: &[[f64; 3]], color: [f64; 3]) -> usize {
    centers
        .iter()
        .enumerate()
        .map(|(i, &center)| (i, squared_distance(center, color)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map_or(0, |(i, _)| i)
}

/// Lloyd's k-means, stopping early once assignments no longer change
fn kmeans(samples: &[[f64; 3]], k: usize, max_iterations: usize, rng: &mut StdRng) -> Vec<[f64; 3]> {
    if samples.is_empty() {
        return vec![[0.0; 3]];
    }
    let k = k.min(samples.len());
    let mut centers: Vec<[f64; 3]> = rand::seq::index::sample(rng, samples.len(), k)
        .into_iter()
        .filter_map(|i| samples.get(i).copied())
        .collect();

    let mut assignment = vec![usize::MAX; samples.len()];
    for _ in 0..max_iterations {
        let mut changed = false;
        for (slot, &color) in assignment.iter_mut().zip(samples) {
            let nearest = nearest_center(&centers, color);
            if *slot != nearest {
                *slot = nearest;
                changed = true;
            }
        }
        if !changed {
            break;
        }

        let mut sums = vec![[0.0; 3]; centers.len()];
        let mut counts = vec![0usize; centers.len()];
        for (&cluster, &color) in assignment.iter().zip(samples) {
            if let (Some(sum), Some(count)) = (sums.get_mut(cluster), counts.get_mut(cluster)) {
                for (s, c) in sum.iter_mut().zip(color) {
                    *s += c;
                }
                *count += 1;
            }
        }
        // Empty clusters keep their previous centre
        for ((center, sum), &count) in centers.iter_mut().zip(&sums).zip(&counts) {
            if count > 0 {
                *center = sum.map(|s| s / count as f64);
            }
        }
    }
    centers
}
