//! Sequence algorithms backing the child reconciler.

mod lis;

pub use lis::{LisScratch, longest_increasing_run};
