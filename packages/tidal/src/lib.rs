#![no_std]

#[cfg(any(test, feature = "testutils"))]
extern crate std;

pub mod constants;
pub mod error;
pub mod interfaces;
pub mod macros;
pub mod math;
pub mod roles;
pub mod types;

#[cfg(any(test, feature = "testutils"))]
pub mod testutils;
