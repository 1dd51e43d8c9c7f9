//! Getting sampled audio out of the program.

pub mod wav;
