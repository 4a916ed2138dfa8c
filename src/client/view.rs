use super::controller::{FormState, SubmissionPhase};

pub const SUBMITTING_MESSAGE: &str = "Generating...";
pub const SUCCESS_MESSAGE: &str = "Document generated successfully!";

/// The single status line under the form, if there is one to show.
pub fn status_line(state: &FormState) -> Option<String> {
    if state.phase == SubmissionPhase::Submitting {
        return Some(SUBMITTING_MESSAGE.to_string());
    }
    match (&state.error, state.success) {
        (Some(error), _) => Some(error.clone()),
        (None, true) => Some(SUCCESS_MESSAGE.to_string()),
        (None, false) => None,
    }
}
