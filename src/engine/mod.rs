/// The DRI computation pipeline.
///
/// Every function in this tree is pure, synchronous, and free of shared
/// mutable state: a call is a function of its arguments and nothing else, so
/// any number of sites can be scored concurrently without coordination.
/// The only inputs are the validated `EngineConfig` tables and the caller's
/// readings; the only suspension points in the wider service live in the
/// ingest and storage collaborators, never here.
///
/// Pipeline order (each stage feeds the next, last three are independent):
///   normalize → score → classify ∥ debris ∥ composition → assemble

pub mod assemble;
pub mod classify;
pub mod composition;
pub mod debris;
pub mod normalize;
pub mod score;

pub use assemble::{assemble, assemble_at};
pub use classify::classify;
pub use composition::predict_composition;
pub use debris::estimate_debris;
pub use normalize::{normalize, normalize_reading};
pub use score::compute_dri;
