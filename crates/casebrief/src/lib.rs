//! casebrief: fetch a case, summarize it chunk by chunk for a chosen audience

pub mod pipeline;
