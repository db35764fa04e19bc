//! Gradient-magnitude texture histograms
//!
//! Texture is summarized per channel by the histogram of masked gradient
//! magnitudes. The target histogram spans the range of its own known
//! samples; candidate sources are binned over that same range so the two are
//! directly comparable.

use ndarray::Array2;
use rayon::prelude::{IntoParallelRefIterator, ParallelIterator};

use crate::algorithm::cache::{RegionSampleCache, RegionSamples};
use crate::analysis::isophotes::{masked_gradient_magnitude, masked_gradient_magnitude_at};
use crate::math::histogram::Histogram;
use crate::spatial::{Mask, Patch, Raster, Region};

/// Per-channel value range of a target histogram
pub type ChannelRange = (f64, f64);

/// Histogram of a target patch plus the ranges it was built over
#[derive(Debug, Clone, PartialEq)]
pub struct TargetHistogram {
    /// Per-channel histograms, normalized and appended
    pub histogram: Histogram,
    /// Per-channel `(min, max)` of the target samples
    pub ranges: Vec<ChannelRange>,
}

/// Gradient magnitude images of every channel of the working image
#[derive(Debug, Clone)]
pub struct TextureGradients {
    bins: usize,
    channels: Vec<Array2<f64>>,
    magnitudes: Vec<Array2<f64>>,
}

impl TextureGradients {
    /// Compute magnitudes for every channel of `raster`
    pub fn new(raster: &Raster, mask: &Mask, bins: usize) -> Self {
        let channels: Vec<Array2<f64>> = (0..raster.channels()).map(|c| raster.channel(c)).collect();
        let magnitudes = channels
            .iter()
            .map(|channel| masked_gradient_magnitude(channel, mask))
            .collect();
        Self {
            bins: bins.max(1),
            channels,
            magnitudes,
        }
    }

    /// Bins per channel
    pub const fn bins(&self) -> usize {
        self.bins
    }

    /// Magnitude image of one channel
    pub fn magnitudes(&self, channel: usize) -> Option<&Array2<f64>> {
        self.magnitudes.get(channel)
    }

    /// Refresh magnitudes after `region` was filled
    ///
    /// Derivatives read direct neighbours, so the region grown by one pixel
    /// is recomputed and every cached sample set overlapping it is dropped.
    pub fn update(
        &mut self,
        raster: &Raster,
        mask: &Mask,
        region: &Region,
        cache: &mut RegionSampleCache,
    ) {
        let filled = region.crop(&raster.full_region());
        let affected = region.expand(1).crop(&raster.full_region());
        for (c, (channel, magnitude)) in self
            .channels
            .iter_mut()
            .zip(self.magnitudes.iter_mut())
            .enumerate()
        {
            for pixel in filled.indices() {
                if let Some(value) = channel.get_mut(pixel) {
                    *value = raster.sample(pixel, c);
                }
            }
            for pixel in affected.indices() {
                let value = masked_gradient_magnitude_at(channel, mask, pixel);
                if let Some(entry) = magnitude.get_mut(pixel) {
                    *entry = value;
                }
            }
        }
        cache.invalidate_intersecting(&affected);
    }

    /// Magnitudes of every pixel of `region`, per channel
    pub fn region_samples(&self, region: &Region) -> RegionSamples {
        self.magnitudes
            .iter()
            .map(|magnitude| {
                region
                    .indices()
                    .filter_map(|p| magnitude.get(p).copied())
                    .collect()
            })
            .collect()
    }

    /// Magnitudes of the valid pixels of the (cropped) target, per channel
    pub fn target_samples(&self, mask: &Mask, target: &Patch) -> RegionSamples {
        let pixels: Vec<[usize; 2]> = target
            .region
            .crop(&mask.full_region())
            .indices()
            .filter(|&p| mask.is_valid(p))
            .collect();
        self.magnitudes
            .iter()
            .map(|magnitude| {
                pixels
                    .iter()
                    .filter_map(|&p| magnitude.get(p).copied())
                    .collect()
            })
            .collect()
    }

    /// Histogram of the target's known samples over their own range
    ///
    /// Each channel is normalized separately before appending.
    pub fn target_histogram(&self, samples: &RegionSamples) -> TargetHistogram {
        let mut histogram = Histogram::default();
        let mut ranges = Vec::with_capacity(samples.len());
        for channel in samples {
            let (min, max) = channel
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                    (lo.min(v), hi.max(v))
                });
            let range = if min.is_finite() && max.is_finite() {
                (min, max)
            } else {
                (0.0, 0.0)
            };
            histogram.append(
                &Histogram::from_samples(channel, self.bins, range.0, range.1, false).normalized(),
            );
            ranges.push(range);
        }
        TargetHistogram { histogram, ranges }
    }

    /// Histogram of source samples over the target's ranges
    ///
    /// Samples outside a range are clamped into the end bins.
    pub fn source_histogram(&self, samples: &RegionSamples, ranges: &[ChannelRange]) -> Histogram {
        let mut histogram = Histogram::default();
        for (channel, &(min, max)) in samples.iter().zip(ranges) {
            histogram.append(&Histogram::from_samples(channel, self.bins, min, max, true).normalized());
        }
        histogram
    }

    /// Histogram distance between `target` and every source
    ///
    /// Missing source samples are computed in parallel and merged into the
    /// cache before scoring against it.
    pub fn differences(
        &self,
        mask: &Mask,
        target: &Patch,
        sources: &[Patch],
        cache: &mut RegionSampleCache,
    ) -> Vec<f64> {
        let reference = self.target_histogram(&self.target_samples(mask, target));

        let regions: Vec<Region> = sources.iter().map(|source| source.region).collect();
        let missing = cache.missing(&regions);
        let computed: Vec<(Region, RegionSamples)> = missing
            .par_iter()
            .map(|region| (*region, self.region_samples(region)))
            .collect();
        cache.extend(computed);

        let cached: &RegionSampleCache = cache;
        sources
            .par_iter()
            .map(|source| {
                let histogram = cached.get(&source.region).map_or_else(
                    || self.source_histogram(&self.region_samples(&source.region), &reference.ranges),
                    |samples| self.source_histogram(samples, &reference.ranges),
                );
                reference.histogram.difference(&histogram)
            })
            .collect()
    }
}
