use validator::ValidationErrors;

/// Flattens `validator` errors into a single user-presentable message.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().filter_map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .or_else(|| Some(format!("{} is invalid", field)))
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Probe {
        #[validate(email)]
        email: String,
        #[validate(length(min = 1, message = "password must not be empty"))]
        password: String,
    }

    #[test]
    fn test_custom_message_wins() {
        let probe = Probe {
            email: "a@b.com".to_string(),
            password: String::new(),
        };
        let errors = probe.validate().unwrap_err();
        assert_eq!(format_validation_errors(&errors), "password must not be empty");
    }

    #[test]
    fn test_fallback_names_the_field() {
        let probe = Probe {
            email: "not-an-email".to_string(),
            password: "x".to_string(),
        };
        let errors = probe.validate().unwrap_err();
        assert!(format_validation_errors(&errors).contains("email"));
    }
}
