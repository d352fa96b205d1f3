mod normalizer;
mod reconciler;
mod statement;
#[cfg(test)]
mod tests;

pub use normalizer::normalize;
pub use reconciler::reconcile;
pub use statement::ClientStatement;
