//! Form presentation metadata
//!
//! Describes how the account forms are rendered: CSS class, input type,
//! read-only and autofocus flags. No validation happens here.

use serde::Serialize;

use crate::domain::user::{
    MAX_EMAIL_LENGTH, MAX_NAME_LENGTH, MAX_USERNAME_LENGTH, MIN_NAME_LENGTH, MIN_USERNAME_LENGTH,
};

pub const FORM_CONTROL_CLASS: &str = "form-control";

/// HTML input type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputType {
    Text,
    Email,
    Password,
}

/// Rendering hints for one form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldPresentation {
    pub name: &'static str,
    pub label: &'static str,
    pub input_type: InputType,
    pub css_class: &'static str,
    pub readonly: bool,
    pub autofocus: bool,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
}

impl FieldPresentation {
    /// Required `form-control` text input
    pub fn new(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            input_type: InputType::Text,
            css_class: FORM_CONTROL_CLASS,
            readonly: false,
            autofocus: false,
            required: true,
            min_length: None,
            max_length: None,
        }
    }

    pub fn input_type(mut self, input_type: InputType) -> Self {
        self.input_type = input_type;
        self
    }

    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }

    pub fn autofocus(mut self) -> Self {
        self.autofocus = true;
        self
    }

    pub fn length(mut self, min: Option<u64>, max: Option<u64>) -> Self {
        self.min_length = min;
        self.max_length = max;
        self
    }
}

/// Rendering hints for a whole form, fields in display order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormPresentation {
    pub fields: Vec<FieldPresentation>,
}

impl FormPresentation {
    pub fn field(&self, name: &str) -> Option<&FieldPresentation> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Name of the field that receives initial focus, if any
    pub fn focused_field(&self) -> Option<&'static str> {
        self.fields.iter().find(|f| f.autofocus).map(|f| f.name)
    }
}

/// Login form
///
/// The identifier is pre-filled and read-only without autofocus, so focus
/// goes to the password.
pub fn login_form() -> FormPresentation {
    FormPresentation {
        fields: vec![
            FieldPresentation::new("username", "Username")
                .length(None, Some(MAX_USERNAME_LENGTH))
                .readonly(),
            FieldPresentation::new("password", "Password")
                .input_type(InputType::Password)
                .autofocus(),
        ],
    }
}

/// Sign-up form; `email_phone` is filled in from a contact form
pub fn signup_form() -> FormPresentation {
    FormPresentation {
        fields: vec![
            FieldPresentation::new("first_name", "First Name")
                .length(Some(MIN_NAME_LENGTH), Some(MAX_NAME_LENGTH)),
            FieldPresentation::new("last_name", "Last Name")
                .length(Some(MIN_NAME_LENGTH), Some(MAX_NAME_LENGTH)),
            FieldPresentation::new("username", "Username")
                .length(Some(MIN_USERNAME_LENGTH), Some(MAX_USERNAME_LENGTH)),
            FieldPresentation::new("email_phone", "Email or Phone")
                .length(None, Some(MAX_EMAIL_LENGTH))
                .readonly(),
            FieldPresentation::new("password", "Password").input_type(InputType::Password),
            FieldPresentation::new("password_confirmation", "Password Confirmation")
                .input_type(InputType::Password),
        ],
    }
}

pub fn email_form() -> FormPresentation {
    FormPresentation {
        fields: vec![FieldPresentation::new("email", "Email")
            .input_type(InputType::Email)
            .length(None, Some(MAX_EMAIL_LENGTH))],
    }
}

pub fn phone_form() -> FormPresentation {
    FormPresentation {
        fields: vec![FieldPresentation::new("phone", "Phone")],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_focus_goes_to_password() {
        let form = login_form();

        let username = form.field("username").unwrap();
        assert!(username.readonly);
        assert!(!username.autofocus);

        let password = form.field("password").unwrap();
        assert!(password.autofocus);
        assert!(!password.readonly);
        assert_eq!(password.input_type, InputType::Password);

        assert_eq!(form.focused_field(), Some("password"));
    }

    #[test]
    fn test_all_fields_use_form_control() {
        for form in [login_form(), signup_form(), email_form(), phone_form()] {
            assert!(form.fields.iter().all(|f| f.css_class == FORM_CONTROL_CLASS));
        }
    }

    #[test]
    fn test_signup_email_phone_is_readonly() {
        let form = signup_form();

        let readonly: Vec<_> = form
            .fields
            .iter()
            .filter(|f| f.readonly)
            .map(|f| f.name)
            .collect();
        assert_eq!(readonly, vec!["email_phone"]);
        assert_eq!(form.focused_field(), None);
        assert_eq!(
            form.field("password_confirmation").unwrap().input_type,
            InputType::Password
        );
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_value(login_form()).unwrap();

        assert_eq!(json["fields"][0]["name"], "username");
        assert_eq!(json["fields"][0]["readonly"], true);
        assert_eq!(json["fields"][1]["input_type"], "password");
        assert!(json["fields"][1].get("max_length").is_none());
    }
}
