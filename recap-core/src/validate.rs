//! Pure input validation, independent of any transport. Each function
//! returns a typed result so the rules are unit-testable without spinning up
//! a router.

use crate::error::RecapError;
use crate::models::meeting::{CreateMeetingInput, UpdateMeetingInput};

pub fn validate_create(input: &CreateMeetingInput) -> Result<(), RecapError> {
    if input.title.trim().is_empty() {
        return Err(RecapError::Validation("Title is required".to_string()));
    }
    Ok(())
}

pub fn validate_update(input: &UpdateMeetingInput) -> Result<(), RecapError> {
    if let Some(title) = &input.title {
        if title.trim().is_empty() {
            return Err(RecapError::Validation(
                "Title must not be empty".to_string(),
            ));
        }
    }
    if let crate::patch::Patch::Set(duration) = &input.duration {
        if *duration < 0 {
            return Err(RecapError::Validation(
                "Duration must be non-negative".to_string(),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::Patch;

    #[test]
    fn create_rejects_empty_title() {
        let input = CreateMeetingInput {
            title: "   ".to_string(),
            description: None,
            audio_file_path: None,
        };
        assert!(matches!(
            validate_create(&input),
            Err(RecapError::Validation(_))
        ));
    }

    #[test]
    fn create_accepts_plain_title() {
        let input = CreateMeetingInput {
            title: "Weekly sync".to_string(),
            description: Some("agenda".to_string()),
            audio_file_path: None,
        };
        assert!(validate_create(&input).is_ok());
    }

    #[test]
    fn update_rejects_blank_title_and_negative_duration() {
        let mut input = UpdateMeetingInput {
            id: 1,
            ..Default::default()
        };
        input.title = Some("".to_string());
        assert!(validate_update(&input).is_err());

        input.title = None;
        input.duration = Patch::Set(-5);
        assert!(validate_update(&input).is_err());

        input.duration = Patch::Set(0);
        assert!(validate_update(&input).is_ok());
    }
}
