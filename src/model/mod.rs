//! # Model Module
//!
//! The primality algorithm. Only naive trial division is implemented; the
//! benchmark measures raw per-core arithmetic throughput, so sieves and
//! probabilistic tests are out of scope.

pub mod primality;

pub use primality::{count_primes, is_prime, scan_range};
