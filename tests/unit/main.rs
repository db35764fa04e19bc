//! Unit test harness mirroring the `src` module tree

mod analysis;
mod spatial;
