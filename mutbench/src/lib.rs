#[cfg(feature = "core")]
#[doc(inline)]
pub use mutbench_core as core;

#[cfg(feature = "simulate")]
#[doc(inline)]
pub use mutbench_simulate as simulate;

#[cfg(feature = "eval")]
#[doc(inline)]
pub use mutbench_eval as eval;
