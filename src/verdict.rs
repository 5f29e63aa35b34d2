use serde::{Deserialize, Serialize};

/// Submission-level status.
///
/// A submission moves `InQueue -> Processing -> <terminal>` and never
/// backwards; every bracketed state in the judging pipeline is terminal.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    InQueue,
    Processing,
    Accepted,
    WrongAnswer,
    TimeLimitExceeded,
    RuntimeError,
    InternalError,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InQueue => "InQueue",
            Self::Processing => "Processing",
            Self::Accepted => "Accepted",
            Self::WrongAnswer => "WrongAnswer",
            Self::TimeLimitExceeded => "TimeLimitExceeded",
            Self::RuntimeError => "RuntimeError",
            Self::InternalError => "InternalError",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "InQueue" => Some(Self::InQueue),
            "Processing" => Some(Self::Processing),
            "Accepted" => Some(Self::Accepted),
            "WrongAnswer" => Some(Self::WrongAnswer),
            "TimeLimitExceeded" => Some(Self::TimeLimitExceeded),
            "RuntimeError" => Some(Self::RuntimeError),
            "InternalError" => Some(Self::InternalError),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::InQueue | Self::Processing)
    }
}

/// Classification of a single test case's outcome.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseVerdict {
    Accepted,
    WrongAnswer,
    TimeLimitExceeded,
    RuntimeError,
}

impl CaseVerdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accepted => "Accepted",
            Self::WrongAnswer => "WrongAnswer",
            Self::TimeLimitExceeded => "TimeLimitExceeded",
            Self::RuntimeError => "RuntimeError",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Accepted" => Some(Self::Accepted),
            "WrongAnswer" => Some(Self::WrongAnswer),
            "TimeLimitExceeded" => Some(Self::TimeLimitExceeded),
            "RuntimeError" => Some(Self::RuntimeError),
            _ => None,
        }
    }
}

impl From<CaseVerdict> for Status {
    fn from(verdict: CaseVerdict) -> Self {
        match verdict {
            CaseVerdict::Accepted => Self::Accepted,
            CaseVerdict::WrongAnswer => Self::WrongAnswer,
            CaseVerdict::TimeLimitExceeded => Self::TimeLimitExceeded,
            CaseVerdict::RuntimeError => Self::RuntimeError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_text_round_trip() {
        for status in [
            Status::InQueue,
            Status::Processing,
            Status::Accepted,
            Status::WrongAnswer,
            Status::TimeLimitExceeded,
            Status::RuntimeError,
            Status::InternalError,
        ] {
            assert_eq!(Status::parse(status.as_str()), Some(status));
        }
        assert_eq!(Status::parse("Finished"), None);
    }

    #[test]
    fn terminal_states() {
        assert!(!Status::InQueue.is_terminal());
        assert!(!Status::Processing.is_terminal());
        assert!(Status::Accepted.is_terminal());
        assert!(Status::WrongAnswer.is_terminal());
        assert!(Status::TimeLimitExceeded.is_terminal());
        assert!(Status::RuntimeError.is_terminal());
        assert!(Status::InternalError.is_terminal());
    }

    #[test]
    fn case_verdict_maps_onto_status() {
        assert_eq!(Status::from(CaseVerdict::Accepted), Status::Accepted);
        assert_eq!(
            Status::from(CaseVerdict::TimeLimitExceeded),
            Status::TimeLimitExceeded
        );
    }

    #[test]
    fn serde_uses_the_wire_names() {
        let json = serde_json::to_string(&Status::TimeLimitExceeded).unwrap();
        assert_eq!(json, "\"TimeLimitExceeded\"");
        let verdict: CaseVerdict = serde_json::from_str("\"WrongAnswer\"").unwrap();
        assert_eq!(verdict, CaseVerdict::WrongAnswer);
    }
}
