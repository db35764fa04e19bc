//! Index of fully known source patches
//!
//! A source patch is usable when it lies entirely inside the image and
//! contains no hole pixel. Holes only ever turn valid, so once a patch is
//! indexed it stays usable for the rest of the run and the index can grow
//! incrementally around each filled region.

use bitvec::prelude::*;

use crate::spatial::{Mask, Patch, Region};

/// Row-major list of usable source patches with a membership bit per centre
#[derive(Clone, Debug)]
pub struct SourcePatchIndex {
    radius: usize,
    cols: usize,
    indexed: BitVec,
    patches: Vec<Patch>,
}

impl SourcePatchIndex {
    /// Index without any patch for a `rows x cols` image
    pub fn empty(rows: usize, cols: usize, radius: usize) -> Self {
        Self {
            radius,
            cols,
            indexed: bitvec![0; rows * cols],
            patches: Vec::new(),
        }
    }

    /// Scan every possible centre once
    pub fn build(mask: &Mask, radius: usize) -> Self {
        let (rows, cols) = mask.dim();
        let mut index = Self::empty(rows, cols, radius);
        index.scan(mask, &mask.full_region());
        index
    }

    /// Index the patches exposed by filling `region`
    ///
    /// Only centres within `radius` of the region can have changed. Returns
    /// the number of patches added.
    pub fn add_new_in_region(&mut self, mask: &Mask, region: &Region) -> usize {
        let affected = region.expand(self.radius).crop(&mask.full_region());
        let added = self.scan(mask, &affected);
        if added > 0 {
            self.patches.sort_by_key(|patch| patch.center);
        }
        added
    }

    fn scan(&mut self, mask: &Mask, region: &Region) -> usize {
        let mut added = 0;
        for center in region.indices() {
            if self.contains(center) {
                continue;
            }
            let patch = Patch::new(center, self.radius);
            if mask.is_region_valid(&patch.region) {
                let bit = self.bit(center);
                self.indexed.set(bit, true);
                self.patches.push(patch);
                added += 1;
            }
        }
        added
    }

    const fn bit(&self, center: [usize; 2]) -> usize {
        center[0] * self.cols + center[1]
    }

    /// True when a patch centred on `center` is indexed
    pub fn contains(&self, center: [usize; 2]) -> bool {
        center[1] < self.cols && self.indexed.get(self.bit(center)).as_deref() == Some(&true)
    }

    /// Patch radius of every indexed patch
    pub const fn radius(&self) -> usize {
        self.radius
    }

    /// Number of indexed patches
    pub fn len(&self) -> usize {
        self.patches.len()
    }

    /// True when no usable source patch exists
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    /// All indexed patches in row-major centre order
    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    /// Source candidates for a target
    ///
    /// With a search radius only centres inside the square window of that
    /// half size around the target centre are returned.
    pub fn candidates_for(&self, target: &Patch, search_radius: Option<usize>) -> Vec<Patch> {
        match search_radius {
            None => self.patches.clone(),
            Some(window) => {
                let area = Region::centered(target.center, window);
                self.patches
                    .iter()
                    .filter(|patch| area.contains(patch.center))
                    .copied()
                    .collect()
            }
        }
    }
}
