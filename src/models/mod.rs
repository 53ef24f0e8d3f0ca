pub mod media;
pub mod recommend;

pub use media::{
    CastMember, Credits, MediaType, PagedResults, PersonCreditEntry, PersonCredits, SavedItem,
    TmdbWork,
};
pub use recommend::{
    ActorDebug, CandidateWork, RecommendationDebug, RecommendationRequest, RecommendationResponse,
};
