/// Result alias used by the application and adapter layers.
/// The pure reachability core returns its own typed errors instead.
pub type Result<T> = std::result::Result<T, anyhow::Error>;
