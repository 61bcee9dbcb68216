pub mod candidate;
pub mod decision;
pub mod report;
pub mod request;
pub mod unit;

pub use candidate::{Candidate, CandidateSets, RawCandidate};
pub use decision::{Confidence, Decision, MatchStatus};
pub use report::{ItemReport, MatchOutcome, RunReport, RunSummary};
pub use request::NormalizedRequest;
pub use unit::{MeasurementDomain, ParsedQuantity, Size, Unit};
