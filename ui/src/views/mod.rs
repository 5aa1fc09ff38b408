mod scorecard;
pub use scorecard::ScoreCardScreen;
