//! Role-specific prompt templates for case summaries

use std::fmt;

/// Instruction for a general reader
pub const PUBLIC_PROMPT: &str =
    "Explain the following legal text in **simple terms** so a general person can understand:";

/// Instruction for law-student notes
pub const STUDENT_PROMPT: &str = "Summarize the following legal text like a **law student's notes**. \
Include constitutional provisions, case laws (if any), and legal doctrines:";

/// Instruction for a lawyer's case brief
pub const LAWYER_PROMPT: &str = "Summarize the following legal text as a **professional case brief for a lawyer**. \
Use structured sections: Facts, Issues, Arguments, Court Reasoning, Judgment, and Key Takeaways:";

/// Instruction used when no known role was given
pub const CONCISE_PROMPT: &str = "Summarize this legal text concisely:";

/// Audience a summary is written for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    Public,
    Student,
    Lawyer,
    /// Anything else, including an empty string
    #[default]
    Unspecified,
}

impl Role {
    /// Parse a free-form role string. Unknown values map to `Unspecified`.
    pub fn parse(role: &str) -> Self {
        match role.trim().to_lowercase().as_str() {
            "public" => Self::Public,
            "student" => Self::Student,
            "lawyer" => Self::Lawyer,
            _ => Self::Unspecified,
        }
    }

    /// Instruction text for this role
    pub fn instruction(&self) -> &'static str {
        match self {
            Self::Public => PUBLIC_PROMPT,
            Self::Student => STUDENT_PROMPT,
            Self::Lawyer => LAWYER_PROMPT,
            Self::Unspecified => CONCISE_PROMPT,
        }
    }

    /// Build the request prompt for one chunk
    pub fn prompt(&self, chunk: &str) -> String {
        format!("{}\n\n{}", self.instruction(), chunk)
    }
}

impl From<&str> for Role {
    fn from(role: &str) -> Self {
        Self::parse(role)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Public => "public",
            Self::Student => "student",
            Self::Lawyer => "lawyer",
            Self::Unspecified => "unspecified",
        };
        f.write_str(name)
    }
}

/// Prompt for one chunk given a free-form role string
pub fn build_prompt(role: &str, chunk: &str) -> String {
    Role::parse(role).prompt(chunk)
}
