pub mod dispatch;
pub mod naming;
pub mod normalizer;
pub mod types;

pub use dispatch::Dispatcher;
pub use normalizer::OutcomeNormalizer;
