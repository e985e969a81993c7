//! Backend commands queued from UI to backend worker.

/// Network work requested by the UI. Draft edits and dialog toggles are
/// applied directly to the form controller and never go through the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendCommand {
    Revalidate,
    SubmitDraft,
}

impl BackendCommand {
    pub fn name(self) -> &'static str {
        match self {
            BackendCommand::Revalidate => "revalidate",
            BackendCommand::SubmitDraft => "submit_draft",
        }
    }
}
