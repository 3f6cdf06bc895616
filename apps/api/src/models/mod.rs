pub mod chunk;
pub mod match_result;

pub use chunk::{Chunk, DocumentKind, RetrievalHit, ScoredPair};
pub use match_result::{
    AlignmentSnippet, CandidateDocument, FailedCandidate, Leaderboard, MatchResult, RankedCandidate,
};
