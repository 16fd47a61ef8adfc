/// Use cases module containing application business logic orchestration
mod analyze_reachability;

pub use analyze_reachability::AnalyzeReachabilityUseCase;
